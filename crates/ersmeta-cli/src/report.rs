//! Report writers shared by the pipelines

use std::path::Path;

use anyhow::Context as _;
use ersmeta_analysis::{
    element::{self, ElementGroup, MetadataRecord},
    polarity::Polarity,
    scoring,
    table::ResponseTable,
};
use ersmeta_chart::{
    Descriptions,
    category::{self, PieChart, YesCountChart},
    element::CountSeries,
    survey, text,
};

use crate::{
    config::{BarReport, LikertPanel, ParticipationReport, PieReport, TextReport},
    util,
};

/// Box-plots of a panel's items, written as `name`.
pub fn write_likert_panel(
    table: &ResponseTable,
    panel: &LikertPanel,
    output_dir: &Path,
    name: &str,
) -> anyhow::Result<()> {
    let shading = panel.shading();
    let chart = survey::likert_boxplots(
        table,
        &panel.columns(),
        &panel.descriptions(),
        panel.title.as_deref(),
        shading.as_ref(),
        panel.row_groups(),
    )
    .with_context(|| format!("Failed to build panel {}", panel.file_name))?;
    util::write_page(&chart.render(), output_dir, name)
}

/// Single box-plot of the panel's mean-value score, written as `name`.
pub fn write_mean_value_panel(
    table: &ResponseTable,
    panel: &LikertPanel,
    output_dir: &Path,
    name: &str,
) -> anyhow::Result<()> {
    let polarities = panel.scoring_polarities()?;
    let scores = scoring::mean_value_score(table, &polarities)
        .with_context(|| format!("Failed to score panel {}", panel.file_name))?;
    let title = panel.title.as_deref().unwrap_or(&panel.file_name);
    let chart = survey::score_boxplot(&scores, "", title, Polarity::FavorableHigh);
    util::write_page(&chart.render(), output_dir, name)
}

pub fn write_column_pie(
    table: &ResponseTable,
    report: &PieReport,
    title_suffix: &str,
    output_dir: &Path,
    name: &str,
) -> anyhow::Result<()> {
    let descriptions = Descriptions::from([(
        report.column.clone(),
        format!("{}{title_suffix}", report.description),
    )]);
    let pie = category::column_pie(table, &report.column, &descriptions)
        .with_context(|| format!("Failed to count answers of {}", report.column))?;
    util::write_page(&pie.render(), output_dir, name)
}

pub fn write_yes_counts(
    table: &ResponseTable,
    report: &BarReport,
    title_suffix: &str,
    output_dir: &Path,
    name: &str,
) -> anyhow::Result<()> {
    let chart = YesCountChart::from_table(
        table,
        &report.columns(),
        &report.descriptions(),
        &format!("{}{title_suffix}", report.title),
    )
    .with_context(|| format!("Failed to count answers for {}", report.file_name))?;
    util::write_page(&chart.render(), output_dir, name)
}

/// Writes `name.txt` and the numbered `name-NNN` pages.
pub fn write_free_text(
    table: &ResponseTable,
    report: &TextReport,
    title_suffix: &str,
    output_dir: &Path,
    name: &str,
) -> anyhow::Result<()> {
    let columns = report.columns();
    let descriptions = report.descriptions(title_suffix);
    let text_path = output_dir.join(format!("{name}.txt"));
    text::write_text(table, &columns, &descriptions, &text_path)
        .with_context(|| format!("Failed to export free text to {}", text_path.display()))?;

    let lines = text::free_text_lines(table, &columns, &descriptions, text::PAGE_TEXT_WIDTH)?;
    util::write_pages(&text::text_document(&lines), output_dir, name)
}

/// Completion and dropout pie, in configured state order.
pub fn write_participation(
    table: &ResponseTable,
    progress_column: &str,
    report: &ParticipationReport,
    output_dir: &Path,
    name: &str,
) -> anyhow::Result<()> {
    let summary = ersmeta_analysis::participation::classify_participation(
        table,
        progress_column,
        &report.states,
    )
    .context("Failed to classify participation")?;
    if let Some(warning) = &summary.warning {
        tracing::warn!(%warning, "participation states are inconsistent");
    }
    let pie = PieChart::from_counts(report.title.clone(), &summary.counts, &Descriptions::new());
    util::write_page(&pie.render(), output_dir, name)
}

/// Per-record presence counts of each group, with the group size as the
/// largest possible value.
#[expect(clippy::cast_precision_loss)]
pub fn presence_series(groups: &[ElementGroup], records: &[MetadataRecord]) -> Vec<CountSeries> {
    groups
        .iter()
        .map(|group| CountSeries {
            label: group.name.clone(),
            counts: element::presence_counts(&group.elements, records, group.name.clone())
                .samples(),
            max_possible: Some(group.len() as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;
    use crate::config::Item;

    fn item(column: &str, polarity: Option<Polarity>) -> Item {
        Item {
            column: column.to_owned(),
            description: format!("About {column}"),
            polarity,
        }
    }

    fn panel() -> LikertPanel {
        LikertPanel {
            file_name: "Q12_Intention".to_owned(),
            title: Some("Intention".to_owned()),
            items: vec![
                item("a", Some(Polarity::FavorableHigh)),
                item("b", Some(Polarity::FavorableLow)),
            ],
            groups: vec![],
            aggregate: true,
        }
    }

    fn table() -> ResponseTable {
        ResponseTable::from_raw(
            ["a", "b", "note"],
            [
                ["Agree", "Disagree", "fine"],
                ["Neutral", "", ""],
            ],
        )
    }

    #[test]
    fn test_panels_are_written() {
        let dir = tempfile::tempdir().unwrap();
        write_likert_panel(&table(), &panel(), dir.path(), "Q12_stats").unwrap();
        write_mean_value_panel(&table(), &panel(), dir.path(), "Q12_aggregated").unwrap();
        let stats = fs::read_to_string(dir.path().join("Q12_stats.svg")).unwrap();
        assert!(stats.contains("Intention (n=2)"));
        let aggregated = fs::read_to_string(dir.path().join("Q12_aggregated.svg")).unwrap();
        assert!(aggregated.contains("Intention (n=2)"));
    }

    #[test]
    fn test_mean_value_needs_polarities() {
        let mut panel = panel();
        panel.items.push(item("note", None));
        let dir = tempfile::tempdir().unwrap();
        assert!(write_mean_value_panel(&table(), &panel, dir.path(), "x").is_err());
    }

    #[test]
    fn test_free_text_writes_both_forms() {
        let dir = tempfile::tempdir().unwrap();
        let report = TextReport {
            file_name: "notes".to_owned(),
            items: vec![item("note", None)],
        };
        write_free_text(&table(), &report, " (all)", dir.path(), "A_notes").unwrap();
        let listing = fs::read_to_string(dir.path().join("A_notes.txt")).unwrap();
        assert_eq!(listing, "About note (all):\n- fine\n\n");
        assert!(dir.path().join("A_notes-001.svg").is_file());
        assert!(dir.path().join("A_notes-001.png").is_file());
    }

    #[test]
    fn test_presence_series_max() {
        let records = [json!({"a": 1, "b": 2}), json!({"c": 3})]
            .map(|v| v.as_object().unwrap().clone());
        let groups = [
            ElementGroup::new("ab", vec!["a".to_owned(), "b".to_owned()]),
            ElementGroup::new("c", vec!["c".to_owned()]),
        ];
        let series = presence_series(&groups, &records);
        assert_eq!(series[0].counts, vec![2.0, 0.0]);
        assert_eq!(series[0].max_possible, Some(2.0));
        assert_eq!(series[1].counts, vec![0.0, 1.0]);
    }
}
