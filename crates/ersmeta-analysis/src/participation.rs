//! Survey completion and dropout classification
//!
//! Each participant row is sorted into named states by the last page reached
//! (the progress column) and, for some pages, by a categorical answer that
//! explains why the participant stopped. States are configured, not fixed.
//! They are expected to cover every row exactly once; when they do not, the
//! counts are kept as-is and a [`ConsistencyWarning`] is returned with them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    AnalysisError,
    table::{Cell, ResponseTable, Row},
};

/// One condition a participant row can satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateRule {
    /// The progress column is blank or absent.
    ProgressMissing,
    /// The progress column holds one of the listed pages.
    ProgressIn { pages: Vec<i64> },
    /// The progress column holds `page` and `column` equals `answer` exactly.
    ProgressWithAnswer {
        page: i64,
        column: String,
        answer: String,
    },
}

impl StateRule {
    fn column(&self) -> Option<&str> {
        match self {
            Self::ProgressWithAnswer { column, .. } => Some(column),
            Self::ProgressMissing | Self::ProgressIn { .. } => None,
        }
    }

    fn matches(&self, progress: Option<&Cell>, row: &Row<'_>) -> bool {
        match self {
            Self::ProgressMissing => progress.is_none_or(Cell::is_missing),
            Self::ProgressIn { pages } => {
                page_of(progress).is_some_and(|page| pages.contains(&page))
            }
            Self::ProgressWithAnswer {
                page,
                column,
                answer,
            } => {
                page_of(progress) == Some(*page)
                    && row
                        .get(column)
                        .and_then(Cell::as_text)
                        .is_some_and(|text| text == answer)
            }
        }
    }
}

#[expect(clippy::cast_possible_truncation)]
fn page_of(cell: Option<&Cell>) -> Option<i64> {
    let value = cell?.as_number()?;
    (value.fract() == 0.0).then_some(value as i64)
}

/// A named participation state; a row is in the state when any rule matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationState {
    pub label: String,
    pub matches: Vec<StateRule>,
}

/// The classified state counts did not add up to the number of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsistencyWarning {
    pub counted: usize,
    pub total: usize,
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sum of state counts {} does not match overall participants {}",
            self.counted, self.total
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipationSummary {
    /// State label and row count, in configured order.
    pub counts: Vec<(String, usize)>,
    pub warning: Option<ConsistencyWarning>,
}

impl ParticipationSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Counts rows per participation state.
///
/// Fails when the progress column, or a column referenced by a rule, is not
/// in the table.
pub fn classify_participation(
    table: &ResponseTable,
    progress_column: &str,
    states: &[ParticipationState],
) -> Result<ParticipationSummary, AnalysisError> {
    table.column_index(progress_column)?;
    table.require_columns(
        states
            .iter()
            .flat_map(|s| s.matches.iter().filter_map(StateRule::column)),
    )?;

    let counts = states
        .iter()
        .map(|state| {
            let count = table
                .rows()
                .filter(|row| {
                    let progress = row.get(progress_column);
                    state.matches.iter().any(|rule| rule.matches(progress, row))
                })
                .count();
            (state.label.clone(), count)
        })
        .collect::<Vec<_>>();

    let counted = counts.iter().map(|(_, n)| n).sum();
    let warning = (counted != table.len()).then_some(ConsistencyWarning {
        counted,
        total: table.len(),
    });
    Ok(ParticipationSummary { counts, warning })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> Vec<ParticipationState> {
        serde_json::from_str(
            r#"[
                {"label": "Not started", "matches": [
                    {"kind": "progress_missing"},
                    {"kind": "progress_in", "pages": [-1]}
                ]},
                {"label": "Early stop", "matches": [
                    {"kind": "progress_in", "pages": [0, 1]}
                ]},
                {"label": "No time", "matches": [
                    {"kind": "progress_with_answer", "page": 3, "column": "why", "answer": "No time."}
                ]},
                {"label": "Finished", "matches": [
                    {"kind": "progress_in", "pages": [12]}
                ]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_states_cover_all_rows() {
        let table = ResponseTable::from_raw(
            ["lastpage", "why"],
            [
                ["", ""],
                ["-1", ""],
                ["1", ""],
                ["3", "No time."],
                ["12", ""],
                ["12.0", "x"],
            ],
        );
        let summary = classify_participation(&table, "lastpage", &states()).unwrap();
        assert_eq!(
            summary.counts,
            vec![
                ("Not started".to_owned(), 2),
                ("Early stop".to_owned(), 1),
                ("No time".to_owned(), 1),
                ("Finished".to_owned(), 2),
            ]
        );
        assert_eq!(summary.warning, None);
        assert_eq!(summary.total(), 6);
    }

    #[test]
    fn test_unclassified_rows_warn() {
        let table = ResponseTable::from_raw(
            ["lastpage", "why"],
            [["3", "Other reason"], ["12", ""], ["7", ""]],
        );
        let summary = classify_participation(&table, "lastpage", &states()).unwrap();
        assert_eq!(
            summary.warning,
            Some(ConsistencyWarning {
                counted: 1,
                total: 3
            })
        );
        assert!(summary.warning.unwrap().to_string().contains("does not match"));
    }

    #[test]
    fn test_rule_column_must_exist() {
        let table = ResponseTable::from_raw(["lastpage"], [["12"]]);
        let err = classify_participation(&table, "lastpage", &states()).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownColumn { ref column } if column == "why"));
    }
}
