//! Charts over metadata elements

use ersmeta_analysis::{element::ElementOccurrence, schema::Priority};

use crate::{
    color,
    layout::{Annotation, BoxPlotChart, BoxRow, LegendEntry, ValueAxis, draw_legend, integer_ticks},
    page::SvgPage,
    svg::{self, Anchor, Canvas, Style, TextStyle, VAlign},
};

/// Width drawn for an element that never occurs, so it stays visible.
pub const ZERO_BAR: f64 = 0.1;

const FONT: f64 = 10.0;

/// Horizontal bar per schema element with its occurrence count.
///
/// Entries are drawn in the given order from the bottom up, so a list sorted
/// by descending count puts the most frequent element at the bottom. Bars
/// are tinted by priority and schema position and annotated with the
/// position.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn element_histogram(occurrences: &[ElementOccurrence], max_position: usize) -> SvgPage {
    let n = occurrences.len().max(1) as f64;
    let label_width = occurrences
        .iter()
        .map(|o| svg::text_width(&o.property, FONT))
        .fold(0.0, f64::max);
    let max_count = occurrences.iter().map(|o| o.count).max().unwrap_or(0) as f64;
    let upper = f64::max(1.0, max_count * 1.15);

    let left = 16.0 + 20.0 + label_width + 8.0;
    let top = 48.0;
    let plot_width = 1000.0 - left - 32.0;
    let plot_height = f64::max(300.0, 25.0 * n);
    let bottom = top + plot_height;
    let x_of = |v: f64| left + v / upper * plot_width;
    let y_of = |i: usize| bottom - (i as f64 + 0.5) / n * plot_height;
    let bar_height = plot_height / n * 0.8;

    let mut canvas = Canvas::new(1000.0, bottom + 90.0);
    canvas.text(
        left + plot_width / 2.0,
        16.0,
        "Number of Occurrences of Elements over Metadata Sets",
        &TextStyle::sized(14.0).anchor(Anchor::Middle).valign(VAlign::Top),
    );

    for (i, occurrence) in occurrences.iter().enumerate() {
        let yc = y_of(i);
        let count = if occurrence.count == 0 {
            ZERO_BAR
        } else {
            occurrence.count as f64
        };
        let fill =
            color::priority_tint(occurrence.priority, occurrence.position, max_position).to_hex();
        canvas.begin_group("bar");
        canvas.rect(
            left,
            yc - bar_height / 2.0,
            x_of(count) - left,
            bar_height,
            &Style::fill(fill),
        );
        canvas.text(
            left - 6.0,
            yc,
            &occurrence.property,
            &TextStyle::sized(FONT).anchor(Anchor::End),
        );
        canvas.text(
            x_of(count) + 4.0,
            yc,
            &format!("Pos: {}", occurrence.position),
            &TextStyle::sized(8.0).color(color::ANNOTATION),
        );
        canvas.end_group();
    }

    canvas.rect(left, top, plot_width, plot_height, &Style::stroke("black", 1.0));
    for tick in integer_ticks(upper, 10) {
        let x = x_of(tick);
        canvas.line(x, bottom, x, bottom + 4.0, &Style::stroke("black", 1.0));
        canvas.text(
            x,
            bottom + 6.0,
            &format!("{tick:.0}"),
            &TextStyle::sized(FONT).anchor(Anchor::Middle).valign(VAlign::Top),
        );
    }
    canvas.text(
        left + plot_width / 2.0,
        bottom + 24.0,
        "Count",
        &TextStyle::sized(11.0).anchor(Anchor::Middle).valign(VAlign::Top),
    );
    canvas.text(
        24.0,
        top + plot_height / 2.0,
        "Element",
        &TextStyle::sized(11.0).anchor(Anchor::Middle).rotate(-90.0),
    );

    let legend = Priority::ALL
        .iter()
        .map(|&priority| LegendEntry::Patch {
            label: capitalize(priority.as_str()),
            color: color::priority_color(priority).to_hex(),
        })
        .collect::<Vec<_>>();
    draw_legend(&mut canvas, left + plot_width / 2.0, bottom + 46.0, &legend);

    canvas.finish()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// One row of an element-count chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CountSeries {
    pub label: String,
    pub counts: Vec<f64>,
    /// Largest possible count, drawn as a dashed marker.
    pub max_possible: Option<f64>,
}

/// Box-plots of per-record element counts on an integer axis.
///
/// The axis reaches 10% past the largest count or marker. Rows are
/// annotated with lower-case `mean:`/`var:`.
#[must_use]
pub fn element_count_boxplots(
    series: Vec<CountSeries>,
    title: Option<&str>,
    x_label: &str,
    y_label: &str,
) -> BoxPlotChart {
    let x_max = series
        .iter()
        .flat_map(|s| s.counts.iter().copied().chain(s.max_possible))
        .filter(|v| !v.is_nan())
        .fold(0.0, f64::max);
    let rows = series
        .into_iter()
        .map(|s| {
            let row = BoxRow::new(s.label.clone(), s.label, s.counts);
            match s.max_possible {
                Some(max) => row.with_max_marker(max),
                None => row,
            }
        })
        .collect();
    let chart = BoxPlotChart::new(ValueAxis::Count { max_value: x_max }, rows)
        .annotation(Annotation::LowerMeanVariance)
        .axis_labels(x_label, y_label)
        .size(500.0, 40.0, 160.0);
    match title {
        Some(title) => chart.title(title),
        None => chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence(property: &str, count: usize, priority: Priority, position: usize) -> ElementOccurrence {
        ElementOccurrence {
            property: property.to_owned(),
            count,
            priority,
            position,
        }
    }

    #[test]
    fn test_histogram_zero_count_has_stub() {
        let page = element_histogram(
            &[
                occurrence("name", 3, Priority::Required, 0),
                occurrence("license", 0, Priority::Optional, 2),
            ],
            2,
        );
        let markup = page.markup();
        assert_eq!(markup.matches(r#"<g class="bar">"#).count(), 2);
        assert!(markup.contains("Pos: 2"));
        // required element at position 0 is the lightest tint
        assert!(markup.contains(&color::priority_tint(Priority::Required, 0, 2).to_hex()));
        assert!(markup.contains(">Optional<"));
    }

    #[test]
    fn test_count_axis_includes_marker() {
        let chart = element_count_boxplots(
            vec![
                CountSeries {
                    label: "required".to_owned(),
                    counts: vec![1.0, 2.0],
                    max_possible: Some(5.0),
                },
                CountSeries {
                    label: "bonus".to_owned(),
                    counts: vec![3.0],
                    max_possible: None,
                },
            ],
            Some("Element types"),
            "Element Count",
            "Element Type",
        );
        assert_eq!(chart.axis, ValueAxis::Count { max_value: 5.0 });
        assert_eq!(chart.rows[0].max_marker, Some(5.0));
        assert!(chart.render().markup().contains("Max value"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("required"), "Required");
        assert_eq!(capitalize(""), "");
    }
}
