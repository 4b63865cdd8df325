//! Participant row selection

use anyhow::Context as _;
use ersmeta_analysis::table::{Cell, ResponseTable};
use serde::Serialize;

use crate::config::ExperienceQuestion;

/// Selection by metadata-schema experience.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceFilter {
    #[default]
    All,
    /// Drop rows without an answer or answering "not familiar".
    ExcludeMissing,
    /// Keep only rows answering "not familiar".
    OnlyMissing,
}

impl ExperienceFilter {
    pub fn from_flags(exclude_missing: bool, only_missing: bool) -> Self {
        match (exclude_missing, only_missing) {
            (_, true) => Self::OnlyMissing,
            (true, false) => Self::ExcludeMissing,
            (false, false) => Self::All,
        }
    }

    pub fn apply(
        self,
        table: &ResponseTable,
        question: &ExperienceQuestion,
    ) -> anyhow::Result<ResponseTable> {
        if self == Self::All {
            return Ok(table.clone());
        }
        table
            .column_index(&question.column)
            .context("Cannot filter by metadata experience")?;
        let no_experience = |cell: Option<&Cell>| {
            cell.and_then(Cell::as_text)
                .is_some_and(|text| text == question.no_experience_answer)
        };
        let filtered = table.filter_rows(|row| {
            let cell = row.get(&question.column);
            match self {
                Self::All => true,
                Self::ExcludeMissing => {
                    cell.is_some_and(|c| !c.is_missing()) && !no_experience(cell)
                }
                Self::OnlyMissing => no_experience(cell),
            }
        });
        tracing::info!(
            filter = ?self,
            kept = filtered.len(),
            total = table.len(),
            "filtered by metadata experience"
        );
        Ok(filtered)
    }
}

/// Rows whose progress column equals `completed_page`.
#[expect(clippy::cast_precision_loss)]
pub fn completed(
    table: &ResponseTable,
    progress_column: &str,
    completed_page: i64,
) -> anyhow::Result<ResponseTable> {
    table
        .column_index(progress_column)
        .context("Cannot select completed surveys")?;
    let page = completed_page as f64;
    let filtered = table.filter_rows(|row| {
        row.get(progress_column)
            .and_then(Cell::as_number)
            .is_some_and(|value| value == page)
    });
    tracing::info!(
        kept = filtered.len(),
        total = table.len(),
        "selected completed surveys"
    );
    Ok(filtered)
}
