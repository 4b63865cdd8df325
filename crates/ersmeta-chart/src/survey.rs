//! Box-plot panels for survey answers and composite scores

use ersmeta_analysis::{
    AnalysisError,
    polarity::{Polarity, PolarityMap},
    table::ResponseTable,
};

use crate::{
    Descriptions, color, describe,
    layout::{
        Annotation, Background, Band, BoxPlotChart, BoxRow, GroupingMode, RowGroup, ValueAxis,
    },
    wrap,
};

/// Row label wrap width, in characters.
pub const ROW_LABEL_WIDTH: usize = 60;
/// Row labels are cut after this many lines.
pub const ROW_LABEL_LINES: usize = 5;

/// Upper bounds of the SUS "not acceptable" and "marginal" bands.
pub const SUS_NOT_ACCEPTABLE: f64 = 50.0;
pub const SUS_MARGINAL: f64 = 70.0;

/// One agreement-scale box-plot per column, first column on top.
///
/// A title, when given, gets the number of rows that answered at least one
/// of the columns. Rows are shaded by polarity; columns without an entry in
/// `polarities` are shaded as favorable-high.
pub fn likert_boxplots<S>(
    table: &ResponseTable,
    columns: &[S],
    descriptions: &Descriptions,
    title: Option<&str>,
    polarities: Option<&PolarityMap>,
    groups: Vec<RowGroup>,
) -> Result<BoxPlotChart, AnalysisError>
where
    S: AsRef<str>,
{
    table.require_columns(columns.iter().map(AsRef::as_ref))?;
    let answered = table.count_answered(columns.iter().map(AsRef::as_ref))?;

    let rows = columns
        .iter()
        .map(|column| {
            let column = column.as_ref();
            let label = wrap::wrap_limited(
                describe(descriptions, column),
                ROW_LABEL_WIDTH,
                ROW_LABEL_LINES,
            )
            .join("\n");
            Ok(BoxRow::new(column, label, table.samples(column)?))
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    let mut chart = BoxPlotChart::new(ValueAxis::Likert, rows)
        .background(Background::Polarity(
            polarities.cloned().unwrap_or_default(),
        ))
        .annotation(Annotation::MeanVariance)
        .groups(groups, GroupingMode::Partial)
        .size(400.0, 70.0, 600.0);
    if let Some(title) = title {
        chart = chart.title(format!("{title} (n={answered})"));
    }
    Ok(chart)
}

/// A single box-plot of a composite score on the agreement scale.
///
/// `NaN` scores count as missing. Descriptions of two characters or fewer
/// are not shown.
#[must_use]
pub fn score_boxplot(
    scores: &[f64],
    description: &str,
    title: &str,
    polarity: Polarity,
) -> BoxPlotChart {
    let answered = scores.iter().filter(|v| !v.is_nan()).count();
    let key = "score";
    let chart = BoxPlotChart::new(
        ValueAxis::Likert,
        vec![BoxRow::new(key, description, scores.to_vec())],
    )
    .title(format!("{title} (n={answered})"))
    .background(Background::Polarity(PolarityMap::from_iter([(
        key, polarity,
    )])))
    .annotation(Annotation::MeanVariance)
    .size(700.0, 150.0, 150.0);
    if description.chars().count() > 2 {
        chart
    } else {
        chart.hide_row_labels()
    }
}

/// The fixed SUS acceptability bands, lowest first.
#[must_use]
pub fn sus_bands() -> Vec<Band> {
    vec![
        Band {
            from: 0.0,
            to: SUS_NOT_ACCEPTABLE,
            color: color::UNFAVORABLE,
            label: Some("Not acceptable (0-50)".to_owned()),
        },
        Band {
            from: SUS_NOT_ACCEPTABLE,
            to: SUS_MARGINAL,
            color: color::MARGINAL,
            label: Some("Marginal (50-70)".to_owned()),
        },
        Band {
            from: SUS_MARGINAL,
            to: 100.0,
            color: color::FAVORABLE,
            label: Some("Acceptable (70-100)".to_owned()),
        },
    ]
}

/// Box-plots of one or more usability-score series on a 0–100 axis.
///
/// Each row is labelled `label (n=k)` with its non-missing count. With more
/// than one series a title gets `(total n=m)`, `m` being the largest count.
#[must_use]
pub fn sus_boxplots(series: &[(String, Vec<f64>)], title: Option<&str>) -> BoxPlotChart {
    let mut max_answered = 0;
    let rows = series
        .iter()
        .map(|(label, scores)| {
            let clean = scores
                .iter()
                .copied()
                .filter(|v| !v.is_nan())
                .collect::<Vec<_>>();
            max_answered = max_answered.max(clean.len());
            BoxRow::new(label.clone(), format!("{label} (n={})", clean.len()), clean)
        })
        .collect::<Vec<_>>();

    let mut chart = BoxPlotChart::new(
        ValueAxis::Score {
            min: 0.0,
            max: 100.0,
            step: 20.0,
        },
        rows,
    )
    .background(Background::Bands(sus_bands()))
    .annotation(Annotation::Mean)
    .size(700.0, 70.0, 300.0);
    chart.x_label = Some("SUS Score".to_owned());
    chart.title = title.map(|title| {
        if series.len() > 1 {
            format!("{title} (total n={max_answered})")
        } else {
            title.to_owned()
        }
    });
    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptions() -> Descriptions {
        Descriptions::from([("q1".to_owned(), "First question".to_owned())])
    }

    #[test]
    fn test_likert_title_counts_any_answer() {
        let table = ResponseTable::from_raw(
            ["q1", "q2"],
            [["Agree", ""], ["", "Neutral"], ["", ""]],
        );
        let chart =
            likert_boxplots(&table, &["q1", "q2"], &descriptions(), Some("Usability"), None, vec![])
                .unwrap();
        assert_eq!(chart.title.as_deref(), Some("Usability (n=2)"));
        assert_eq!(chart.rows[0].label, "First question");
        assert_eq!(chart.rows[1].label, "q2");
    }

    #[test]
    fn test_likert_empty_column_still_a_row() {
        let table = ResponseTable::from_raw(["q1", "q2"], [["Agree", ""], ["Disagree", "x"]]);
        let chart =
            likert_boxplots(&table, &["q1", "q2"], &descriptions(), None, None, vec![]).unwrap();
        assert_eq!(chart.rows.len(), 2);
        assert!(chart.rows[1].summary().is_none());
        let page = chart.render();
        assert_eq!(page.markup().matches(r#"<g class="row">"#).count(), 2);
    }

    #[test]
    fn test_likert_unknown_column() {
        let table = ResponseTable::from_raw(["q1"], [["Agree"]]);
        let err = likert_boxplots(&table, &["q1", "nope"], &descriptions(), None, None, vec![])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownColumn { .. }));
    }

    #[test]
    fn test_long_labels_are_cut() {
        let long = "word ".repeat(100);
        let descriptions = Descriptions::from([("q1".to_owned(), long)]);
        let table = ResponseTable::from_raw(["q1"], [["Agree"]]);
        let chart = likert_boxplots(&table, &["q1"], &descriptions, None, None, vec![]).unwrap();
        let label = &chart.rows[0].label;
        assert_eq!(label.lines().count(), ROW_LABEL_LINES);
        assert!(label.ends_with("..."));
    }

    #[test]
    fn test_sus_titles_and_labels() {
        let series = vec![
            ("All".to_owned(), vec![80.0, 70.0, f64::NAN]),
            ("Experienced".to_owned(), vec![90.0]),
        ];
        let chart = sus_boxplots(&series, Some("SUS"));
        assert_eq!(chart.title.as_deref(), Some("SUS (total n=2)"));
        assert_eq!(chart.rows[0].label, "All (n=2)");
        assert_eq!(chart.rows[1].label, "Experienced (n=1)");

        let single = sus_boxplots(&series[..1], Some("SUS"));
        assert_eq!(single.title.as_deref(), Some("SUS"));
        assert!(sus_boxplots(&series, None).title.is_none());
    }

    #[test]
    fn test_score_boxplot_hides_short_label() {
        let chart = score_boxplot(&[3.0, f64::NAN], "", "Ease", Polarity::FavorableHigh);
        assert!(!chart.show_row_labels);
        assert_eq!(chart.title.as_deref(), Some("Ease (n=1)"));
    }
}
