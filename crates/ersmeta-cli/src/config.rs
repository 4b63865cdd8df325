//! Per-report configuration
//!
//! Every report is described by an explicit record: which columns it reads,
//! how they are described, their polarity and grouping. The built-in records
//! reproduce the ERSmeta evaluation and can be replaced with `--config`.

use std::path::Path;

use anyhow::Context as _;
use ersmeta_analysis::{
    element::ThematicArea,
    participation::ParticipationState,
    polarity::{Polarity, PolarityMap},
};
use ersmeta_chart::{Descriptions, layout::RowGroup};
use serde::{Deserialize, de::DeserializeOwned};

use crate::util;

const BUILTIN_SURVEY: &str = include_str!("../config/survey.json");
const BUILTIN_METADATA: &str = include_str!("../config/metadata.json");
const BUILTIN_PAPER: &str = include_str!("../config/paper.json");

/// Reads `path` when given, otherwise parses the built-in document.
fn load<T>(kind: &str, path: Option<&Path>, builtin: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    match path {
        Some(path) => util::read_json_file(kind, path),
        None => serde_json::from_str(builtin)
            .with_context(|| format!("Failed to parse built-in {kind} configuration")),
    }
}

/// One survey question column.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub column: String,
    pub description: String,
    #[serde(default)]
    pub polarity: Option<Polarity>,
}

/// Named set of item columns drawn together under one heading.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemGroup {
    pub name: String,
    pub columns: Vec<String>,
}

fn descriptions(items: &[Item], suffix: &str) -> Descriptions {
    items
        .iter()
        .map(|item| (item.column.clone(), format!("{}{suffix}", item.description)))
        .collect()
}

fn columns(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.column.as_str()).collect()
}

/// A box-plot panel of agreement-scale items.
#[derive(Debug, Clone, Deserialize)]
pub struct LikertPanel {
    pub file_name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub items: Vec<Item>,
    #[serde(default)]
    pub groups: Vec<ItemGroup>,
    /// Also draw the mean-value score over all items.
    #[serde(default)]
    pub aggregate: bool,
}

impl LikertPanel {
    pub fn columns(&self) -> Vec<&str> {
        columns(&self.items)
    }

    pub fn descriptions(&self) -> Descriptions {
        descriptions(&self.items, "")
    }

    /// Polarities for row shading; `None` when no item declares one.
    pub fn shading(&self) -> Option<PolarityMap> {
        let map = self
            .items
            .iter()
            .filter_map(|item| Some((item.column.clone(), item.polarity?)))
            .collect::<PolarityMap>();
        (!map.is_empty()).then_some(map)
    }

    /// Polarities for composite scores; every item must declare one.
    pub fn scoring_polarities(&self) -> anyhow::Result<PolarityMap> {
        self.items
            .iter()
            .map(|item| {
                let polarity = item.polarity.with_context(|| {
                    format!(
                        "Item '{}' of report '{}' has no polarity",
                        item.column, self.file_name
                    )
                })?;
                Ok((item.column.clone(), polarity))
            })
            .collect()
    }

    pub fn row_groups(&self) -> Vec<RowGroup> {
        self.groups
            .iter()
            .map(|group| RowGroup::new(group.name.clone(), group.columns.clone()))
            .collect()
    }
}

/// Categorical answer drawn as a pie chart.
#[derive(Debug, Clone, Deserialize)]
pub struct PieReport {
    pub file_name: String,
    pub column: String,
    pub description: String,
}

/// Yes/no columns drawn as one bar chart.
#[derive(Debug, Clone, Deserialize)]
pub struct BarReport {
    pub file_name: String,
    pub title: String,
    pub items: Vec<Item>,
}

impl BarReport {
    pub fn columns(&self) -> Vec<&str> {
        columns(&self.items)
    }

    pub fn descriptions(&self) -> Descriptions {
        descriptions(&self.items, "")
    }
}

/// Free-text columns exported as a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TextReport {
    pub file_name: String,
    pub items: Vec<Item>,
}

impl TextReport {
    pub fn columns(&self) -> Vec<&str> {
        columns(&self.items)
    }

    pub fn descriptions(&self, suffix: &str) -> Descriptions {
        descriptions(&self.items, suffix)
    }
}

/// Participant profile charts, written once for all participants and once for
/// those who completed the survey.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSection {
    pub name: String,
    #[serde(default)]
    pub pies: Vec<PieReport>,
    #[serde(default)]
    pub bars: Vec<BarReport>,
    #[serde(default)]
    pub texts: Vec<TextReport>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipationReport {
    pub file_name: String,
    pub title: String,
    pub states: Vec<ParticipationState>,
}

/// The categorical answer that tells whether a participant knows metadata
/// schemas.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceQuestion {
    pub column: String,
    pub no_experience_answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyConfig {
    /// Column holding the last page a participant reached.
    pub progress_column: String,
    /// Progress value of a completed survey.
    pub completed_page: i64,
    pub experience: ExperienceQuestion,
    pub profile: Vec<ProfileSection>,
    pub participation: ParticipationReport,
    /// Usability questionnaire; every item needs a polarity.
    pub sus: LikertPanel,
    pub panels: Vec<LikertPanel>,
    pub free_text: Vec<TextReport>,
}

impl SurveyConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        load("survey configuration", path, BUILTIN_SURVEY)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    /// Files in the record directory that are not records.
    pub excluded_files: Vec<String>,
    pub thematic_areas: Vec<ThematicArea>,
}

impl MetadataConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        load("metadata configuration", path, BUILTIN_METADATA)
    }
}

/// Column holding the row-wise mean of other columns.
#[derive(Debug, Clone, Deserialize)]
pub struct DerivedColumn {
    pub column: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SusSeriesLabels {
    pub all: String,
    pub with_experience: String,
    pub without_experience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaperConfig {
    pub derived_columns: Vec<DerivedColumn>,
    pub panels: Vec<LikertPanel>,
    pub sus_file_name: String,
    pub sus_series: SusSeriesLabels,
    pub thematic_file_name: String,
    pub thematic_x_label: String,
    pub thematic_y_label: String,
}

impl PaperConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        load("paper configuration", path, BUILTIN_PAPER)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_builtin_survey() {
        let config = SurveyConfig::load(None).unwrap();
        assert_eq!(config.progress_column, "lastpage");
        assert_eq!(config.completed_page, 12);

        let sus = config.sus.scoring_polarities().unwrap();
        assert_eq!(sus.len(), 10);
        let favorable_low = sus
            .iter()
            .filter(|(_, p)| *p == Polarity::FavorableLow)
            .count();
        assert_eq!(favorable_low, 5);

        for panel in config.panels.iter().filter(|p| p.aggregate) {
            assert!(panel.scoring_polarities().is_ok(), "{}", panel.file_name);
        }
        assert!(config.participation.states.len() >= 2);
    }

    #[test]
    fn test_builtin_metadata() {
        let config = MetadataConfig::load(None).unwrap();
        assert_eq!(config.excluded_files, vec!["index.html"]);
        assert_eq!(config.thematic_areas.len(), 10);
        assert_eq!(config.thematic_areas[0].first, "name");
    }

    #[test]
    fn test_builtin_paper() {
        let config = PaperConfig::load(None).unwrap();
        let derived = config
            .derived_columns
            .iter()
            .map(|d| d.column.as_str())
            .collect::<Vec<_>>();
        for panel in &config.panels {
            for group in &panel.groups {
                for column in &group.columns {
                    assert!(
                        panel.columns().contains(&column.as_str()),
                        "{column} is grouped but not drawn"
                    );
                }
            }
        }
        assert!(derived.contains(&"G05Q19[SQ023]"));
    }

    #[test]
    fn test_missing_polarity_is_an_error() {
        let panel: LikertPanel = serde_json::from_str(
            r#"{"file_name": "Q14", "items": [{"column": "a", "description": "A"}]}"#,
        )
        .unwrap();
        assert!(panel.shading().is_none());
        let err = panel.scoring_polarities().unwrap_err();
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn test_config_file_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(
            &path,
            r#"{"excluded_files": [], "thematic_areas": [{"name": "All", "first": "a", "last": "b"}]}"#,
        )
        .unwrap();
        let config = MetadataConfig::load(Some(&path)).unwrap();
        assert!(config.excluded_files.is_empty());
        assert_eq!(config.thematic_areas[0].name, "All");
    }
}
