//! Colours used across the charts

use ersmeta_analysis::schema::Priority;

/// Favorable half of an agreement-scale row, and the acceptable SUS band.
pub const FAVORABLE: &str = "#d9ead3";
/// Unfavorable half of an agreement-scale row, and the not-acceptable SUS band.
pub const UNFAVORABLE: &str = "#ffcccc";
/// Marginal SUS band.
pub const MARGINAL: &str = "#fff2cc";

pub const BOX_FILL: &str = "#1f77b4";
pub const MEDIAN: &str = "red";
pub const MEAN: &str = "orange";
pub const MAX_MARKER: &str = "green";
pub const BAR_FILL: &str = "skyblue";
pub const ANNOTATION: &str = "dimgray";

/// Categorical palette for pie wedges, cycled when exhausted.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[must_use]
pub fn palette(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// An RGB colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }

    /// Parses `#rrggbb`.
    ///
    /// ```
    /// # use ersmeta_chart::color::Rgb;
    /// assert_eq!(Rgb::from_hex("#ff0000"), Some(Rgb::new(1.0, 0.0, 0.0)));
    /// assert_eq!(Rgb::from_hex("red"), None);
    /// ```
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        Some(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn to_hex(self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// Linear interpolation: `t = 0` gives `self`, `t = 1` gives `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Blends with white: `factor = 1` keeps the colour, `factor = 0` is white.
    #[must_use]
    pub fn lighten(self, factor: f64) -> Self {
        Self::WHITE.lerp(self, factor)
    }
}

/// Base colour of a priority class.
#[must_use]
pub fn priority_color(priority: Priority) -> Rgb {
    match priority {
        Priority::Required => Rgb::from_rgb8(0xe4, 0x1a, 0x1c),
        Priority::Recommended => Rgb::from_rgb8(0x37, 0x7e, 0xb8),
        Priority::Optional => Rgb::from_rgb8(0x4d, 0xaf, 0x4a),
    }
}

/// Priority colour lightened by schema position.
///
/// The first element gets 40% of the base colour, the last one the full
/// base colour.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn priority_tint(priority: Priority, position: usize, max_position: usize) -> Rgb {
    let fraction = if max_position == 0 {
        1.0
    } else {
        position as f64 / max_position as f64
    };
    priority_color(priority).lighten(0.4 + 0.6 * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_of_priority_colors() {
        assert_eq!(priority_color(Priority::Required).to_hex(), "#e41a1c");
        assert_eq!(priority_color(Priority::Recommended).to_hex(), "#377eb8");
        assert_eq!(priority_color(Priority::Optional).to_hex(), "#4daf4a");
    }

    #[test]
    fn test_tint_range() {
        let last = priority_tint(Priority::Required, 10, 10);
        assert_eq!(last.to_hex(), "#e41a1c");

        let first = priority_tint(Priority::Required, 0, 10);
        // 0.4 * base + 0.6 * white
        let expected = priority_color(Priority::Required).lighten(0.4);
        assert_eq!(first, expected);
        assert!(first.g > last.g);
    }

    #[test]
    fn test_single_element_schema_uses_base_color() {
        assert_eq!(priority_tint(Priority::Optional, 0, 0).to_hex(), "#4daf4a");
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette(0), palette(PALETTE.len()));
    }
}
