use crate::{descriptive, quantile};

/// Whisker reach as a multiple of the interquartile range (Tukey's rule).
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Everything needed to draw one box of a box-plot.
///
/// Quartiles are linearly interpolated. Whiskers extend to the most extreme
/// samples within [`WHISKER_IQR_FACTOR`] × IQR of the box; samples beyond are
/// reported as outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Builds a box summary from unsorted samples, ignoring `NaN`s.
    ///
    /// Returns `None` when no non-`NaN` sample remains; callers render such
    /// rows as empty placeholders.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ersmeta_stats::boxplot::BoxSummary;
    /// let summary = BoxSummary::new([1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
    /// assert_eq!(summary.whisker_high, 4.0);
    /// assert_eq!(summary.outliers, vec![100.0]);
    ///
    /// assert!(BoxSummary::new([f64::NAN]).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile::quantile_sorted(&sorted, 0.25);
        let median = quantile::quantile_sorted(&sorted, 0.5);
        let q3 = quantile::quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        // Whiskers never retract inside the box, even for tiny samples.
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .map_or(q1, |v| v.min(q1));
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .map_or(q3, |v| v.max(q3));
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();
        let (mean, _) = descriptive::mean_variance(sorted.iter().copied());

        Some(Self {
            count: sorted.len(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            mean,
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_sample() {
        let summary = BoxSummary::new([3.0; 4]).unwrap();
        assert_eq!(summary.q1, 3.0);
        assert_eq!(summary.q3, 3.0);
        assert_eq!(summary.whisker_low, 3.0);
        assert_eq!(summary.whisker_high, 3.0);
        assert!(summary.outliers.is_empty());
    }

    #[test]
    fn test_low_outlier() {
        let summary = BoxSummary::new([-50.0, 4.0, 4.0, 5.0, 5.0]).unwrap();
        assert_eq!(summary.outliers, vec![-50.0]);
        assert_eq!(summary.whisker_low, 4.0);
        assert_eq!(summary.count, 5);
    }

    #[test]
    fn test_nan_is_ignored() {
        let with_nan = BoxSummary::new([1.0, f64::NAN, 2.0, 3.0]).unwrap();
        let without = BoxSummary::new([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(with_nan, without);
    }
}
