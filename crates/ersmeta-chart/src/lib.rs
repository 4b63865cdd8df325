//! SVG chart rendering for the ERSmeta evaluation reports
//!
//! Every chart renders to an [`page::SvgPage`], a standalone SVG document
//! written together with a PNG preview of the same base name. A directory of
//! pages is merged into one multi-page PDF document, one page per file.
//!
//! # Chart Families
//!
//! - **Box-plot panels** ([`layout::BoxPlotChart`]): agreement-scale answers,
//!   composite scores and element counts, one row per column or series
//! - **Categorical charts** ([`category`]): value-distribution pies and
//!   "yes"-count bars
//! - **Element histogram** ([`element::element_histogram`]): occurrence of
//!   schema elements tinted by priority
//! - **Free text** ([`text`]): wrapped answers as a plain-text listing or
//!   a paged document
//!
//! Pages written to a directory are merged by [`combine::combine`] through
//! [`pdf::write_document`].
//!
//! # Examples
//!
//! ```
//! use ersmeta_analysis::table::ResponseTable;
//! use ersmeta_chart::{Descriptions, survey};
//!
//! let table = ResponseTable::from_raw(["Q1"], [["Agree"], ["Neutral"], [""]]);
//! let descriptions = Descriptions::from([("Q1".to_owned(), "Easy to use".to_owned())]);
//! let chart = survey::likert_boxplots(&table, &["Q1"], &descriptions, Some("Usability"), None, vec![])
//!     .unwrap();
//! assert_eq!(chart.title.as_deref(), Some("Usability (n=2)"));
//! assert!(chart.render().markup().starts_with("<svg"));
//! ```

use std::{collections::HashMap, io, path::PathBuf};

use ersmeta_analysis::AnalysisError;

pub mod category;
pub mod color;
pub mod combine;
pub mod element;
pub mod layout;
pub mod page;
pub mod pdf;
pub mod raster;
pub mod survey;
pub mod svg;
pub mod text;
pub mod wrap;

/// Human-readable text per column, category or element key.
pub type Descriptions = HashMap<String, String>;

/// Looks up the description of `key`, falling back to the key itself.
///
/// ```
/// # use ersmeta_chart::{Descriptions, describe};
/// let descriptions = Descriptions::from([("Q1".to_owned(), "Easy to use".to_owned())]);
/// assert_eq!(describe(&descriptions, "Q1"), "Easy to use");
/// assert_eq!(describe(&descriptions, "Q2"), "Q2");
/// ```
#[must_use]
pub fn describe<'a>(descriptions: &'a Descriptions, key: &'a str) -> &'a str {
    descriptions.get(key).map_or(key, String::as_str)
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ChartError {
    #[display("failed to access {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("malformed page document {}: {reason}", path.display())]
    MalformedPage { path: PathBuf, reason: String },
    #[display("failed to rasterise page: {reason}")]
    Render { reason: String },
    #[display("failed to encode preview {}", path.display())]
    Png {
        path: PathBuf,
        source: png::EncodingError,
    },
    #[display("failed to build document {}", path.display())]
    Pdf { path: PathBuf, source: lopdf::Error },
    #[display("{source}")]
    Analysis { source: AnalysisError },
}

impl From<AnalysisError> for ChartError {
    fn from(source: AnalysisError) -> Self {
        Self::Analysis { source }
    }
}
