use crate::quantile;

/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency and dispersion
/// for a dataset of `f64` values. `NaN` values are dropped before computing.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    /// The number of non-`NaN` values.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The median value of the dataset (interpolated for even counts).
    pub median: f64,
    /// The unbiased sample variance (`ddof = 1`); `NaN` for a single value.
    pub variance: f64,
    /// The sample standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// `NaN` values are skipped, the rest is sorted internally.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one non-`NaN` value
    /// * `None` - if the dataset is empty after dropping `NaN`s
    ///
    /// # Examples
    ///
    /// ```
    /// # use ersmeta_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, f64::NAN, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted, `NaN`-free values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let (mean, variance) = mean_variance_of(sorted_values);

        Some(Self {
            count: sorted_values.len(),
            min,
            max,
            mean,
            median: quantile::quantile_sorted(sorted_values, 0.5),
            variance,
            std_dev: variance.sqrt(),
        })
    }
}

/// Computes the mean and unbiased sample variance of the given values.
///
/// `NaN` values are dropped. An empty input yields `(NaN, NaN)`, a single
/// value yields `(value, NaN)`, matching the `ddof = 1` convention. The
/// result is bit-identical for any ordering of the same values.
///
/// # Examples
///
/// ```
/// # use ersmeta_stats::descriptive::mean_variance;
/// let (mean, var) = mean_variance([2.0, 4.0, f64::NAN, 6.0]);
/// assert_eq!(mean, 4.0);
/// assert_eq!(var, 4.0);
///
/// let (mean, var) = mean_variance([]);
/// assert!(mean.is_nan() && var.is_nan());
/// ```
#[must_use]
pub fn mean_variance<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let mut values = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .collect::<Vec<_>>();
    // sorted so the sums do not depend on input order
    values.sort_by(f64::total_cmp);
    mean_variance_of(&values)
}

#[expect(clippy::cast_precision_loss)]
fn mean_variance_of(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, f64::NAN);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}
