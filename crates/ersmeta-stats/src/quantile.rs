/// Computes a single quantile from sorted data.
///
/// This function uses linear interpolation between the two closest ranks:
/// for `n` values the quantile `q` sits at position `(n - 1) * q`.
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in ascending order
/// * `q` - The quantile to compute (0.0 to 1.0)
///
/// # Returns
///
/// The interpolated value. Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use ersmeta_stats::quantile::quantile_sorted;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile_sorted(&values, 0.5), 2.5);
/// assert_eq!(quantile_sorted(&values, 0.25), 1.75);
/// assert_eq!(quantile_sorted(&values, 1.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn quantile_sorted(sorted_values: &[f64], q: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = (sorted_values.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted_values[lo] + (sorted_values[hi] - sorted_values[lo]) * frac
}

/// Computes a quantile from unsorted values, ignoring `NaN`s.
///
/// # Examples
///
/// ```
/// use ersmeta_stats::quantile::quantile;
///
/// assert_eq!(quantile([3.0, f64::NAN, 1.0, 2.0], 0.5), 2.0);
/// assert!(quantile([], 0.5).is_nan());
/// ```
#[must_use]
pub fn quantile<I>(values: I, q: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sorted = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .collect::<Vec<_>>();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, q)
}
