//! In-memory response table
//!
//! Survey exports are row-oriented: one row per participant, one named column
//! per question. Cells are either missing, free text (including agreement
//! labels) or numbers. Row order never affects a statistic; column order given
//! by callers controls display order only.

use std::fmt;

use crate::{AnalysisError, likert::Likert};

/// A single cell of the response table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Text(String),
    Number(f64),
}

/// Raw fields read as missing, besides the empty field.
///
/// These are the usual not-available markers of survey exports and
/// spreadsheet tools; matching is exact and case-sensitive.
pub const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

impl Cell {
    /// Parses a raw field: empty or a [`MISSING_TOKENS`] entry → missing,
    /// numeric → number, otherwise text.
    ///
    /// ```
    /// # use ersmeta_analysis::table::Cell;
    /// assert_eq!(Cell::parse(""), Cell::Missing);
    /// assert_eq!(Cell::parse("N/A"), Cell::Missing);
    /// assert_eq!(Cell::parse("12"), Cell::Number(12.0));
    /// assert_eq!(Cell::parse("Agree"), Cell::Text("Agree".to_owned()));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || MISSING_TOKENS.contains(&raw) {
            return Self::Missing;
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_nan() => Self::Missing,
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(raw.to_owned()),
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Number(n) => n.is_nan(),
            Self::Text(_) => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    /// Agreement level held by this cell, if any.
    #[must_use]
    pub fn likert(&self) -> Option<Likert> {
        self.as_text().and_then(Likert::decode)
    }

    /// Numeric sample value: numbers as-is, agreement labels decoded to `1..=5`.
    #[must_use]
    pub fn sample_value(&self) -> Option<f64> {
        match self {
            Self::Number(_) => self.as_number(),
            Self::Text(_) => self.likert().map(|l| f64::from(l.value())),
            Self::Missing => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Borrowed view of one row, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// Cell of the named column; `None` when the table has no such column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.cells.get(idx)
    }
}

/// Ordered collection of rows with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl ResponseTable {
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: vec![],
        }
    }

    /// Builds a table from raw text fields, parsing each with [`Cell::parse`].
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly one field per column.
    #[must_use]
    pub fn from_raw<C, S, R, F, T>(columns: C, rows: R) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = F>,
        F: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row.into_iter().map(|raw| Cell::parse(raw.as_ref())));
        }
        table
    }

    /// Appends a row.
    ///
    /// # Panics
    ///
    /// Panics if the row does not have exactly one cell per column.
    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Cell>,
    {
        let cells = cells.into_iter().collect::<Vec<_>>();
        assert_eq!(
            cells.len(),
            self.columns.len(),
            "row must have one cell per column"
        );
        self.rows.push(cells);
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn column_index(&self, column: &str) -> Result<usize, AnalysisError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| AnalysisError::unknown_column(column))
    }

    /// Checks that every named column exists, failing on the first absent one.
    pub fn require_columns<'s, I>(&self, columns: I) -> Result<(), AnalysisError>
    where
        I: IntoIterator<Item = &'s str>,
    {
        for column in columns {
            self.column_index(column)?;
        }
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    pub fn cells(&self, column: &str) -> Result<impl Iterator<Item = &Cell> + '_, AnalysisError> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Numeric samples of a column with missing and undecodable cells dropped.
    pub fn samples(&self, column: &str) -> Result<Vec<f64>, AnalysisError> {
        Ok(self.cells(column)?.filter_map(Cell::sample_value).collect())
    }

    /// Number of rows with at least one non-missing value among `columns`.
    pub fn count_answered<'s, I>(&self, columns: I) -> Result<usize, AnalysisError>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let indices = columns
            .into_iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self
            .rows
            .iter()
            .filter(|row| indices.iter().any(|&idx| !row[idx].is_missing()))
            .count())
    }

    /// Number of cells equal to "yes", ignoring case.
    pub fn count_yes(&self, column: &str) -> Result<usize, AnalysisError> {
        Ok(self
            .cells(column)?
            .filter_map(Cell::as_text)
            .filter(|text| text.eq_ignore_ascii_case("yes"))
            .count())
    }

    /// Frequency of each distinct value of a column.
    ///
    /// Missing and blank cells are counted under `missing_label`. The result is
    /// ordered by descending count; equal counts keep first-seen order.
    pub fn category_counts(
        &self,
        column: &str,
        missing_label: &str,
    ) -> Result<Vec<(String, usize)>, AnalysisError> {
        let mut counts: Vec<(String, usize)> = vec![];
        for cell in self.cells(column)? {
            let key = match cell {
                Cell::Text(text) if text.is_empty() => missing_label.to_owned(),
                cell if cell.is_missing() => missing_label.to_owned(),
                cell => cell.to_string(),
            };
            match counts.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 += 1,
                None => counts.push((key, 1)),
            }
        }
        // stable sort keeps first-seen order for ties
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(counts)
    }

    /// Returns a new table with the rows accepted by `pred`.
    #[must_use]
    pub fn filter_rows<F>(&self, mut pred: F) -> Self
    where
        F: FnMut(&Row<'_>) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|cells| {
                pred(&Row {
                    columns: &self.columns,
                    cells,
                })
            })
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Adds (or replaces) a column holding the row-wise mean of `sources`.
    ///
    /// Each source contributes its sample value; missing values are skipped and
    /// a row without any value gets a missing cell.
    #[expect(clippy::cast_precision_loss)]
    pub fn add_row_mean_column(
        &mut self,
        name: &str,
        sources: &[String],
    ) -> Result<(), AnalysisError> {
        let indices = sources
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>, _>>()?;
        let values = self
            .rows
            .iter()
            .map(|row| {
                let present = indices
                    .iter()
                    .filter_map(|&idx| row[idx].sample_value())
                    .collect::<Vec<_>>();
                if present.is_empty() {
                    Cell::Missing
                } else {
                    Cell::Number(present.iter().sum::<f64>() / present.len() as f64)
                }
            })
            .collect::<Vec<_>>();

        let idx = if let Ok(idx) = self.column_index(name) {
            idx
        } else {
            self.columns.push(name.to_owned());
            for row in &mut self.rows {
                row.push(Cell::Missing);
            }
            self.columns.len() - 1
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[idx] = value;
        }
        Ok(())
    }
}
