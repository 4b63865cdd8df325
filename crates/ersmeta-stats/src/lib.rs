//! Statistical utilities for the ERSmeta evaluation reports.
//!
//! This crate provides the small set of statistical tools the report pipeline needs:
//!
//! - **Descriptive statistics**: mean, median, sample variance, standard deviation
//! - **Quantiles**: linearly interpolated quantiles of sorted samples
//! - **Box summaries**: quartiles, Tukey whiskers and outliers for box-plots
//!
//! All computations ignore `NaN` samples, which is how missing survey answers
//! reach this crate.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`quantile`]: Quantile computation
//! - [`boxplot`]: Five-number summaries with whiskers and outliers
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use ersmeta_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.variance, 2.5);
//! ```
//!
//! ## Computing a box summary
//!
//! ```
//! use ersmeta_stats::boxplot::BoxSummary;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let summary = BoxSummary::new(values).unwrap();
//! assert_eq!(summary.median, 3.0);
//! assert_eq!(summary.q1, 2.0);
//! assert_eq!(summary.q3, 4.0);
//! ```

pub mod boxplot;
pub mod descriptive;
pub mod quantile;
