//! Polarity-aware aggregation of survey columns
//!
//! Two composite scores are computed per row:
//!
//! - [`usability_score`]: SUS-style score scaled to `0..=100`
//! - [`mean_value_score`]: polarity-corrected mean on the `1..=5` scale
//!
//! Both treat missing answers through an explicit [`MissingResponse`] policy.
//! The two policies differ on purpose and must not be unified: a missing
//! negatively worded item adds nothing to the usability score but adds `6`
//! to the mean-value sum.

use ersmeta_stats::descriptive;

use crate::{
    AnalysisError,
    likert::Likert,
    polarity::{Polarity, PolarityMap},
    table::{Cell, ResponseTable},
};

/// Multiplier turning the 0..=40 item sum of a ten-item SUS into 0..=100.
pub const USABILITY_SCALE: f64 = 2.5;

/// Aggregate of one column or composite: label, mean, sample variance, sample count.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    pub label: String,
    pub mean: f64,
    pub variance: f64,
    pub count: usize,
}

impl AggregateSummary {
    /// Summarizes the given samples, ignoring `NaN`s.
    #[must_use]
    pub fn from_samples(label: impl Into<String>, samples: &[f64]) -> Self {
        let (mean, variance) = descriptive::mean_variance(samples.iter().copied());
        Self {
            label: label.into(),
            mean,
            variance,
            count: samples.iter().filter(|v| !v.is_nan()).count(),
        }
    }
}

/// How an undecodable or absent answer enters a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingResponse {
    /// The item formula yields no value and the item contributes `0`.
    ZeroContribution,
    /// The answer is decoded as `0` and then passed through the item formula.
    DecodeAsZero,
}

impl MissingResponse {
    /// Policy used by [`usability_score`].
    pub const USABILITY: Self = Self::ZeroContribution;
    /// Policy used by [`mean_value_score`].
    pub const MEAN_VALUE: Self = Self::DecodeAsZero;
}

/// Per-column mean and sample variance, in the requested column order.
///
/// Agreement labels are decoded, numbers are taken as-is, and missing values
/// are dropped per column independently. Every column is checked before any
/// computation starts.
pub fn mean_variance<S>(
    table: &ResponseTable,
    columns: &[S],
) -> Result<Vec<AggregateSummary>, AnalysisError>
where
    S: AsRef<str>,
{
    table.require_columns(columns.iter().map(AsRef::as_ref))?;
    columns
        .iter()
        .map(|column| {
            let column = column.as_ref();
            let samples = table.samples(column)?;
            Ok(AggregateSummary::from_samples(column, &samples))
        })
        .collect()
}

/// SUS-style usability score per row, in `0..=100`.
///
/// Favorable-high items contribute `value - 1`, favorable-low items
/// `5 - value`; missing answers contribute `0`. The sum is multiplied by
/// [`USABILITY_SCALE`].
pub fn usability_score(
    table: &ResponseTable,
    polarities: &PolarityMap,
) -> Result<Vec<f64>, AnalysisError> {
    let sums = polarity_sums(table, polarities, MissingResponse::USABILITY, |value, p| {
        match p {
            Polarity::FavorableHigh => value - 1.0,
            Polarity::FavorableLow => 5.0 - value,
        }
    })?;
    Ok(sums.into_iter().map(|sum| sum * USABILITY_SCALE).collect())
}

/// Polarity-corrected mean value per row, nominally in `1..=5`.
///
/// Favorable-high items contribute `value`, favorable-low items `6 - value`,
/// with missing answers decoded as `0` first. The divisor is the number of
/// requested columns, not the number of answered ones, so an empty
/// `polarities` is rejected with [`AnalysisError::NoScoredColumns`].
#[expect(clippy::cast_precision_loss)]
pub fn mean_value_score(
    table: &ResponseTable,
    polarities: &PolarityMap,
) -> Result<Vec<f64>, AnalysisError> {
    if polarities.is_empty() {
        return Err(AnalysisError::NoScoredColumns);
    }
    let sums = polarity_sums(table, polarities, MissingResponse::MEAN_VALUE, |value, p| {
        match p {
            Polarity::FavorableHigh => value,
            Polarity::FavorableLow => 6.0 - value,
        }
    })?;
    let divisor = polarities.len() as f64;
    Ok(sums.into_iter().map(|sum| sum / divisor).collect())
}

fn polarity_sums<F>(
    table: &ResponseTable,
    polarities: &PolarityMap,
    missing: MissingResponse,
    item: F,
) -> Result<Vec<f64>, AnalysisError>
where
    F: Fn(f64, Polarity) -> f64,
{
    table.require_columns(polarities.columns())?;

    let mut sums = vec![0.0; table.len()];
    for (column, polarity) in polarities.iter() {
        for (sum, cell) in sums.iter_mut().zip(table.cells(column)?) {
            let decoded = cell.likert().map(|l| f64::from(l.value()));
            *sum += match (decoded, missing) {
                (Some(value), _) => item(value, polarity),
                (None, MissingResponse::ZeroContribution) => 0.0,
                (None, MissingResponse::DecodeAsZero) => item(0.0, polarity),
            };
        }
    }
    Ok(sums)
}

/// Relabels every agreement answer of the given columns to its mirror level.
///
/// Together with [`PolarityMap::flipped`] this leaves both composite scores
/// unchanged, which makes it a convenient consistency check.
#[must_use]
pub fn mirror_answers(table: &ResponseTable, columns: &[&str]) -> ResponseTable {
    let mut mirrored = ResponseTable::new(table.columns().iter().cloned());
    for row in table.rows() {
        mirrored.push_row(table.columns().iter().map(|column| {
            let cell = row.get(column).cloned().unwrap_or(Cell::Missing);
            match cell.likert() {
                Some(level) if columns.contains(&column.as_str()) => {
                    Cell::Text(level.mirrored().label().to_owned())
                }
                _ => cell,
            }
        }));
    }
    mirrored
}

/// Decoded agreement level of every row for one column.
pub fn decoded_column(
    table: &ResponseTable,
    column: &str,
) -> Result<Vec<Option<Likert>>, AnalysisError> {
    Ok(table.cells(column)?.map(Cell::likert).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUS_COLUMNS: [&str; 10] = [
        "s01", "s02", "s03", "s04", "s05", "s06", "s07", "s08", "s09", "s10",
    ];

    fn single_row(answer: &str) -> ResponseTable {
        ResponseTable::from_raw(SUS_COLUMNS, [[answer; 10]])
    }

    fn all_favorable() -> PolarityMap {
        SUS_COLUMNS
            .iter()
            .map(|c| (*c, Polarity::FavorableHigh))
            .collect()
    }

    fn alternating() -> PolarityMap {
        SUS_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, Polarity::from(i % 2 == 0)))
            .collect()
    }

    #[test]
    fn test_usability_extremes() {
        let max = usability_score(&single_row("Strongly Agree"), &all_favorable()).unwrap();
        assert_eq!(max, vec![100.0]);
        let min = usability_score(&single_row("Strongly Disagree"), &all_favorable()).unwrap();
        assert_eq!(min, vec![0.0]);
    }

    #[test]
    fn test_usability_missing_contributes_zero() {
        let table = ResponseTable::from_raw(["a", "b"], [["", ""], ["Agree", ""]]);
        let polarities = PolarityMap::from_iter([
            ("a", Polarity::FavorableHigh),
            ("b", Polarity::FavorableLow),
        ]);
        assert_eq!(usability_score(&table, &polarities).unwrap(), vec![0.0, 7.5]);
    }

    #[test]
    fn test_usability_unknown_column_aborts() {
        let table = single_row("Agree");
        let mut polarities = all_favorable();
        polarities.insert("missing_column", Polarity::FavorableLow);
        let err = usability_score(&table, &polarities).unwrap_err();
        assert!(
            matches!(err, AnalysisError::UnknownColumn { ref column } if column == "missing_column")
        );
    }

    #[test]
    fn test_usability_invariant_under_full_mirror() {
        let table = ResponseTable::from_raw(
            SUS_COLUMNS,
            [
                [
                    "Agree", "Disagree", "Strongly Agree", "Neutral", "Agree",
                    "Strongly Disagree", "", "Agree", "Disagree", "Neutral",
                ],
                [
                    "Neutral", "Neutral", "Agree", "", "Strongly Disagree",
                    "Agree", "Agree", "Disagree", "Strongly Agree", "Agree",
                ],
            ],
        );
        let polarities = alternating();
        let original = usability_score(&table, &polarities).unwrap();
        let mirrored = usability_score(
            &mirror_answers(&table, &SUS_COLUMNS),
            &polarities.flipped(),
        )
        .unwrap();
        assert_eq!(original, mirrored);
    }

    #[test]
    fn test_mean_value_neutral_is_midpoint() {
        let table = ResponseTable::from_raw(["q"], [["Neutral"], ["Neutral"]]);
        let high = PolarityMap::from_iter([("q", Polarity::FavorableHigh)]);
        let low = PolarityMap::from_iter([("q", Polarity::FavorableLow)]);
        assert_eq!(mean_value_score(&table, &high).unwrap(), vec![3.0, 3.0]);
        assert_eq!(mean_value_score(&table, &low).unwrap(), vec![3.0, 3.0]);
    }

    #[test]
    fn test_mean_value_missing_negative_item_counts_six() {
        let table = ResponseTable::from_raw(["pos", "neg"], [["", ""], ["Agree", ""]]);
        let polarities = PolarityMap::from_iter([
            ("pos", Polarity::FavorableHigh),
            ("neg", Polarity::FavorableLow),
        ]);
        // missing favorable-high adds 0, missing favorable-low adds 6 - 0
        assert_eq!(
            mean_value_score(&table, &polarities).unwrap(),
            vec![3.0, 5.0]
        );
    }

    #[test]
    fn test_mean_value_divides_by_requested_columns() {
        let table = ResponseTable::from_raw(["a", "b"], [["Strongly Agree", ""]]);
        let polarities = PolarityMap::from_iter([
            ("a", Polarity::FavorableHigh),
            ("b", Polarity::FavorableHigh),
        ]);
        assert_eq!(mean_value_score(&table, &polarities).unwrap(), vec![2.5]);
    }

    #[test]
    fn test_mean_variance_per_column() {
        let table = ResponseTable::from_raw(
            ["a", "b"],
            [["Agree", "1"], ["Strongly Agree", ""], ["", "3"]],
        );
        let stats = mean_variance(&table, &["a", "b"]).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].label, "a");
        assert_eq!(stats[0].mean, 4.5);
        assert_eq!(stats[0].variance, 0.5);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[1].mean, 2.0);
        assert_eq!(stats[1].variance, 2.0);
    }

    #[test]
    fn test_mean_variance_is_row_order_invariant() {
        let rows = [["Agree", "2"], ["Disagree", "5"], ["Neutral", "4"]];
        let forward = ResponseTable::from_raw(["a", "b"], rows);
        let mut reversed_rows = rows;
        reversed_rows.reverse();
        let backward = ResponseTable::from_raw(["a", "b"], reversed_rows);
        assert_eq!(
            mean_variance(&forward, &["a", "b"]).unwrap(),
            mean_variance(&backward, &["a", "b"]).unwrap()
        );
    }

    #[test]
    fn test_mean_value_needs_a_column() {
        let table = ResponseTable::from_raw(["a"], [["Agree"]]);
        assert!(matches!(
            mean_value_score(&table, &PolarityMap::new()),
            Err(AnalysisError::NoScoredColumns)
        ));
    }

    #[test]
    fn test_mean_variance_rejects_unknown_column() {
        let table = ResponseTable::from_raw(["a"], [["Agree"]]);
        assert!(matches!(
            mean_variance(&table, &["a", "zz"]),
            Err(AnalysisError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_decoded_column() {
        let table = ResponseTable::from_raw(["a"], [["Agree"], ["x"]]);
        assert_eq!(
            decoded_column(&table, "a").unwrap(),
            vec![Some(Likert::Agree), None]
        );
    }
}
