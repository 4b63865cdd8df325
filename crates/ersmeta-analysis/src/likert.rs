//! Five-level agreement scale
//!
//! Survey answers arrive as the canonical English labels. Decoding is exact:
//! any other text, blank or absent value decodes to `None` ("missing").

use std::fmt;

/// One answer on the five-level agreement scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Likert {
    StronglyDisagree = 1,
    Disagree = 2,
    Neutral = 3,
    Agree = 4,
    StronglyAgree = 5,
}

/// Lowest value on the numeric scale.
pub const SCALE_MIN: f64 = 1.0;
/// Midpoint of the scale, where favorable and unfavorable halves meet.
pub const SCALE_MIDPOINT: f64 = 3.0;
/// Highest value on the numeric scale.
pub const SCALE_MAX: f64 = 5.0;

impl Likert {
    /// All levels in ascending order.
    pub const ALL: [Self; 5] = [
        Self::StronglyDisagree,
        Self::Disagree,
        Self::Neutral,
        Self::Agree,
        Self::StronglyAgree,
    ];

    /// Decodes a canonical label.
    ///
    /// ```
    /// # use ersmeta_analysis::likert::Likert;
    /// assert_eq!(Likert::decode("Agree"), Some(Likert::Agree));
    /// assert_eq!(Likert::decode("agree"), None);
    /// assert_eq!(Likert::decode(""), None);
    /// ```
    #[must_use]
    pub fn decode(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Canonical label as it appears in the response table.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::StronglyDisagree => "Strongly Disagree",
            Self::Disagree => "Disagree",
            Self::Neutral => "Neutral",
            Self::Agree => "Agree",
            Self::StronglyAgree => "Strongly Agree",
        }
    }

    /// Axis label; two-word levels break onto two lines.
    #[must_use]
    pub fn display_label(self) -> &'static str {
        match self {
            Self::StronglyDisagree => "Strongly\nDisagree",
            Self::StronglyAgree => "Strongly\nAgree",
            other => other.label(),
        }
    }

    /// The level mirrored around the midpoint (Strongly Disagree ↔ Strongly Agree).
    #[must_use]
    pub fn mirrored(self) -> Self {
        match self {
            Self::StronglyDisagree => Self::StronglyAgree,
            Self::Disagree => Self::Agree,
            Self::Neutral => Self::Neutral,
            Self::Agree => Self::Disagree,
            Self::StronglyAgree => Self::StronglyDisagree,
        }
    }
}

impl fmt::Display for Likert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.label(), f)
    }
}

/// Canonical labels in scale order.
#[must_use]
pub fn canonical_labels() -> [&'static str; 5] {
    Likert::ALL.map(Likert::label)
}

/// Wrap-friendly labels in scale order.
#[must_use]
pub fn display_labels() -> [&'static str; 5] {
    Likert::ALL.map(Likert::display_label)
}

/// Decodes a label to its numeric value, `None` when the label is not canonical.
#[must_use]
pub fn decode(label: &str) -> Option<u8> {
    Likert::decode(label).map(Likert::value)
}
