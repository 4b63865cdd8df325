//! Pie and bar charts over categorical answers

use std::f64::consts::PI;

use ersmeta_analysis::{AnalysisError, table::ResponseTable};

use crate::{
    Descriptions, color, describe,
    layout::integer_ticks,
    page::SvgPage,
    svg::{self, Anchor, Canvas, Style, TextStyle, VAlign},
    wrap,
};

/// Bucket for blank and missing categorical answers.
pub const NO_INFORMATION: &str = "No information provided";

const PIE_SIZE: f64 = 800.0;
const PIE_RADIUS: f64 = 250.0;
const BOX_WIDTH: usize = 30;
const BOX_LINES: usize = 4;
const FONT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieSlice {
    /// Text of the description box; `\n` breaks lines.
    pub description: String,
    pub count: usize,
}

/// A pie chart; wedges start at 12 o'clock and run clockwise in slice order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    /// Builds a pie from category counts in the given order.
    ///
    /// Categories are described through `descriptions` when they have an
    /// entry there.
    #[must_use]
    pub fn from_counts(
        title: impl Into<String>,
        counts: &[(String, usize)],
        descriptions: &Descriptions,
    ) -> Self {
        let slices = counts
            .iter()
            .map(|(category, count)| PieSlice {
                description: wrap::wrap_limited(
                    describe(descriptions, category),
                    BOX_WIDTH,
                    BOX_LINES,
                )
                .join("\n"),
                count: *count,
            })
            .collect();
        Self {
            title: title.into(),
            slices,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }

    /// Angular midpoint of every wedge in degrees, counter-clockwise from
    /// 3 o'clock and normalised to `0..360`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mid_angles(&self) -> Vec<f64> {
        let total = self.total() as f64;
        let mut current = 90.0;
        self.slices
            .iter()
            .map(|slice| {
                let sweep = if total > 0.0 {
                    360.0 * slice.count as f64 / total
                } else {
                    0.0
                };
                let mid = (current - sweep / 2.0).rem_euclid(360.0);
                current -= sweep;
                mid
            })
            .collect()
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn render(&self) -> SvgPage {
        let mut canvas = Canvas::new(PIE_SIZE, PIE_SIZE);
        let (cx, cy) = (PIE_SIZE / 2.0, PIE_SIZE / 2.0 + 20.0);
        let point = |deg: f64, r: f64| {
            let rad = deg * PI / 180.0;
            (cx + r * rad.cos(), cy - r * rad.sin())
        };

        canvas.text(
            PIE_SIZE / 2.0,
            16.0,
            &wrap::wrap(&self.title, 90).join("\n"),
            &TextStyle::sized(12.0).anchor(Anchor::Middle).valign(VAlign::Top),
        );

        let total = self.total();
        if total == 0 {
            canvas.circle(cx, cy, PIE_RADIUS, &Style::stroke("lightgray", 1.0));
            canvas.text(
                cx,
                cy,
                "No data",
                &TextStyle::sized(12.0).anchor(Anchor::Middle).color("gray"),
            );
            return canvas.finish();
        }

        let mut start = 90.0;
        for (i, (slice, mid)) in self.slices.iter().zip(self.mid_angles()).enumerate() {
            let fill = color::palette(i);
            let share = slice.count as f64 / total as f64;
            let sweep = 360.0 * share;
            canvas.begin_group("wedge");
            if slice.count == total {
                canvas.circle(cx, cy, PIE_RADIUS, &Style::fill(fill));
            } else if slice.count > 0 {
                let end = start - sweep;
                let (x0, y0) = point(start, PIE_RADIUS);
                let (x1, y1) = point(end, PIE_RADIUS);
                let large = i32::from(sweep > 180.0);
                let d = format!(
                    "M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {PIE_RADIUS} {PIE_RADIUS} 0 {large} 1 {x1:.2} {y1:.2} Z"
                );
                canvas.path(&d, &Style::fill(fill));
            }

            let (px, py) = point(mid, PIE_RADIUS * 0.6);
            canvas.text(
                px,
                py,
                &format!("{:.1}%\n({})", share * 100.0, slice.count),
                &TextStyle::sized(FONT).anchor(Anchor::Middle),
            );

            let (bx, by) = point(mid, PIE_RADIUS * 1.2);
            let w = svg::block_width(&slice.description, FONT) + 12.0;
            let h = svg::block_height(&slice.description, FONT) + 8.0;
            canvas.rect(
                bx - w / 2.0,
                by - h / 2.0,
                w,
                h,
                &Style::fill(fill).with_fill_opacity(0.25).with_stroke("gray", 1.0),
            );
            canvas.text(
                bx,
                by,
                &slice.description,
                &TextStyle::sized(FONT).anchor(Anchor::Middle).monospace(),
            );
            canvas.end_group();
            start -= sweep;
        }
        canvas.finish()
    }
}

/// Pie of the value distribution of one column.
///
/// Blank and missing answers are counted as [`NO_INFORMATION`]. Categories
/// are ordered by descending count, ties in first-seen order. The title is
/// `Distribution of <description> (n=<rows>)`.
pub fn column_pie(
    table: &ResponseTable,
    column: &str,
    descriptions: &Descriptions,
) -> Result<PieChart, AnalysisError> {
    let counts = table.category_counts(column, NO_INFORMATION)?;
    let title = format!(
        "Distribution of {} (n={})",
        describe(descriptions, column),
        table.len()
    );
    Ok(PieChart::from_counts(title, &counts, descriptions))
}

/// Bars of how many rows answered "yes" per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YesCountChart {
    pub title: String,
    pub bars: Vec<(String, usize)>,
}

impl YesCountChart {
    /// Counts case-insensitive "yes" answers per column.
    ///
    /// The title gets the number of rows that answered at least one of the
    /// columns.
    pub fn from_table<S>(
        table: &ResponseTable,
        columns: &[S],
        descriptions: &Descriptions,
        title: &str,
    ) -> Result<Self, AnalysisError>
    where
        S: AsRef<str>,
    {
        let answered = table.count_answered(columns.iter().map(AsRef::as_ref))?;
        let bars = columns
            .iter()
            .map(|column| {
                let column = column.as_ref();
                Ok((
                    describe(descriptions, column).to_owned(),
                    table.count_yes(column)?,
                ))
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;
        Ok(Self {
            title: format!("{title} (n={answered})"),
            bars,
        })
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn render(&self) -> SvgPage {
        let n = self.bars.len().max(1) as f64;
        let max_count = self.bars.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;
        let upper = f64::max(1.0, max_count * 1.05);
        // labels are rotated 45°, so their depth is about 0.71 of their width
        let label_depth = self
            .bars
            .iter()
            .map(|(label, _)| svg::text_width(label, FONT) * 0.71)
            .fold(0.0, f64::max);

        let left = 60.0 + f64::min(label_depth, 200.0) * 0.5;
        let top = 48.0;
        let plot_width = 700.0;
        let plot_height = 300.0;
        let bottom = top + plot_height;
        let x_of = |i: usize| left + (i as f64 + 0.5) / n * plot_width;
        let y_of = |v: f64| bottom - v / upper * plot_height;
        let bar_width = plot_width / n * 0.8;

        let mut canvas = Canvas::new(left + plot_width + 24.0, bottom + label_depth + 24.0);
        canvas.text(
            left + plot_width / 2.0,
            16.0,
            &self.title,
            &TextStyle::sized(12.0).anchor(Anchor::Middle).valign(VAlign::Top),
        );
        for (i, (label, count)) in self.bars.iter().enumerate() {
            let x = x_of(i);
            let y = y_of(*count as f64);
            canvas.begin_group("bar");
            canvas.rect(
                x - bar_width / 2.0,
                y,
                bar_width,
                bottom - y,
                &Style::fill(color::BAR_FILL),
            );
            canvas.text(
                x,
                bottom + 8.0,
                label,
                &TextStyle::sized(FONT).anchor(Anchor::End).rotate(-45.0),
            );
            canvas.end_group();
        }
        canvas.rect(left, top, plot_width, plot_height, &Style::stroke("black", 1.0));
        for tick in integer_ticks(upper, 8) {
            let y = y_of(tick);
            canvas.line(left - 4.0, y, left, y, &Style::stroke("black", 1.0));
            canvas.text(
                left - 6.0,
                y,
                &format!("{tick:.0}"),
                &TextStyle::sized(FONT).anchor(Anchor::End),
            );
        }
        canvas.text(
            left - 40.0,
            top + plot_height / 2.0,
            "Number",
            &TextStyle::sized(11.0).anchor(Anchor::Middle).rotate(-90.0),
        );
        canvas.finish()
    }
}
