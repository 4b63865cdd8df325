//! Aggregations behind the ERSmeta evaluation reports
//!
//! This crate turns already-loaded survey responses and metadata records into
//! the numeric summaries that the chart renderers draw.
//!
//! # Overview
//!
//! ## Survey Workflow
//!
//! 1. **Load Responses** ([`table::ResponseTable`]): rows of named cells
//! 2. **Decode Answers** ([`likert::Likert`]): five-level agreement labels to `1..=5`
//! 3. **Aggregate** ([`scoring`]): per-column mean/variance, usability (SUS-style)
//!    scores and polarity-corrected mean-value scores
//! 4. **Classify Participation** ([`participation`]): completion and dropout buckets
//!
//! ## Metadata Workflow
//!
//! 1. **Load Schema** ([`schema::MetadataSchema`]): ordered elements with priorities
//! 2. **Group Elements** ([`schema::subset_between`], [`element::ThematicArea`])
//! 3. **Count** ([`element::presence_counts`], [`element::item_cardinality`])
//!
//! # Examples
//!
//! ```
//! use ersmeta_analysis::{
//!     polarity::{Polarity, PolarityMap},
//!     scoring,
//!     table::ResponseTable,
//! };
//!
//! let table = ResponseTable::from_raw(
//!     ["Q1", "Q2"],
//!     [["Strongly Agree", "Strongly Disagree"], ["Agree", "Disagree"]],
//! );
//! let polarities = PolarityMap::from_iter([
//!     ("Q1".to_owned(), Polarity::FavorableHigh),
//!     ("Q2".to_owned(), Polarity::FavorableLow),
//! ]);
//! let scores = scoring::usability_score(&table, &polarities).unwrap();
//! assert_eq!(scores, vec![20.0, 15.0]);
//! ```

pub mod element;
pub mod likert;
pub mod participation;
pub mod polarity;
pub mod schema;
pub mod scoring;
pub mod table;

/// Errors raised by the aggregation operations.
///
/// Every variant names the offending identifier so callers can report it as-is.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("column '{column}' not found in response table")]
    UnknownColumn { column: String },
    #[display("element '{element}' not found in element list")]
    BoundaryNotFound { element: String },
    #[display("malformed metadata schema: {reason}")]
    MalformedSchema { reason: String },
    #[display("malformed metadata record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
    #[display("no columns to score")]
    NoScoredColumns,
}

impl AnalysisError {
    pub(crate) fn unknown_column(column: &str) -> Self {
        Self::UnknownColumn {
            column: column.to_owned(),
        }
    }
}
