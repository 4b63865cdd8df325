//! Horizontal box-plot layout engine
//!
//! A [`BoxPlotChart`] renders an ordered list of [`BoxRow`]s as one page of
//! horizontal box-plots sharing a value axis.
//!
//! # Conventions
//!
//! - Rows are given top-down: the first row is drawn at the top. Internally
//!   the order is reversed and row position `1` is the bottom row.
//! - A row whose samples are all missing still occupies its slot; it carries a
//!   single `NaN` sample and is drawn without a box.
//! - The background of each row is either nothing, the two halves of the
//!   agreement scale coloured by the row's polarity, or fixed value bands.
//! - Groups add a dotted separator between consecutive groups and a rotated
//!   heading per group. See [`GroupingMode`] for how rows are matched to
//!   groups.

use ersmeta_analysis::{
    likert::{self, SCALE_MAX, SCALE_MIDPOINT, SCALE_MIN},
    polarity::{Polarity, PolarityMap},
};
use ersmeta_stats::{boxplot::BoxSummary, descriptive};

use crate::{
    color,
    page::SvgPage,
    svg::{self, Anchor, Canvas, Style, TextStyle, VAlign},
    wrap,
};

const MARGIN: f64 = 16.0;
const LABEL_FONT: f64 = 10.0;
const TITLE_FONT: f64 = 14.0;
const HEADING_FONT: f64 = 12.0;
const HEADING_WIDTH: f64 = 24.0;
const TICK_LENGTH: f64 = 4.0;
const LEGEND_HEIGHT: f64 = 28.0;

/// One box-plot row.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxRow {
    /// Identifier used for polarity and group lookups (usually a column name).
    pub key: String,
    /// Axis label; `\n` breaks lines.
    pub label: String,
    pub samples: Vec<f64>,
    /// Position of a dashed "max possible value" marker.
    pub max_marker: Option<f64>,
}

impl BoxRow {
    /// Creates a row; a sample list without any number becomes `[NaN]`.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, samples: Vec<f64>) -> Self {
        let samples = if samples.iter().all(|v| v.is_nan()) {
            vec![f64::NAN]
        } else {
            samples
        };
        Self {
            key: key.into(),
            label: label.into(),
            samples,
            max_marker: None,
        }
    }

    #[must_use]
    pub fn with_max_marker(mut self, max: f64) -> Self {
        self.max_marker = Some(max);
        self
    }

    #[must_use]
    pub fn summary(&self) -> Option<BoxSummary> {
        BoxSummary::new(self.samples.iter().copied())
    }

    /// Sample mean and variance (ddof = 1), `NaN` when undefined.
    #[must_use]
    pub fn mean_variance(&self) -> (f64, f64) {
        descriptive::mean_variance(self.samples.iter().copied())
    }
}

/// The shared value axis.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueAxis {
    /// Five-level agreement scale with its display labels.
    Likert,
    /// Counts from zero; `max_value` is the largest value to show.
    Count { max_value: f64 },
    /// A fixed numeric range with evenly spaced ticks.
    Score { min: f64, max: f64, step: f64 },
}

impl ValueAxis {
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Likert => (SCALE_MIN - 0.5, SCALE_MAX + 0.5),
            Self::Count { max_value } => (0.0, f64::max(1.0, max_value * 1.1)),
            Self::Score { min, max, .. } => (*min, *max),
        }
    }

    /// Tick positions and labels.
    #[must_use]
    pub fn ticks(&self) -> Vec<(f64, String)> {
        match self {
            Self::Likert => likert::Likert::ALL
                .iter()
                .map(|level| (f64::from(level.value()), level.display_label().to_owned()))
                .collect(),
            Self::Count { .. } => {
                let (_, upper) = self.range();
                integer_ticks(upper, 8)
                    .into_iter()
                    .map(|t| (t, format!("{t:.0}")))
                    .collect()
            }
            Self::Score { min, max, step } => {
                let mut ticks = vec![];
                let mut t = *min;
                while t <= *max + step * 1e-9 {
                    ticks.push((t, format!("{t}")));
                    t += step;
                }
                ticks
            }
        }
    }
}

/// At most `max_ticks` integer ticks from 0 up to `upper`, with a 1/2/5
/// step.
///
/// ```
/// # use ersmeta_chart::layout::integer_ticks;
/// assert_eq!(integer_ticks(5.5, 8), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
/// assert_eq!(integer_ticks(33.0, 8), vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn integer_ticks(upper: f64, max_ticks: usize) -> Vec<f64> {
    let max_ticks = max_ticks.max(2);
    let mut magnitude = 1.0;
    let step = 'search: loop {
        for factor in [1.0, 2.0, 5.0] {
            let step = factor * magnitude;
            if (upper / step).floor() + 1.0 <= max_ticks as f64 {
                break 'search step;
            }
        }
        magnitude *= 10.0;
    };
    let mut ticks = vec![];
    let mut t = 0.0;
    while t <= upper {
        ticks.push(t);
        t += step;
    }
    ticks
}

/// A coloured value range drawn behind every row.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub from: f64,
    pub to: f64,
    pub color: &'static str,
    /// Legend entry; bands without a label stay out of the legend.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Background {
    #[default]
    None,
    /// Agreement-scale halves split at the midpoint, swapped for
    /// favorable-low rows. Rows absent from the map are favorable-high.
    Polarity(PolarityMap),
    Bands(Vec<Band>),
}

/// Per-row text next to the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Annotation {
    #[default]
    None,
    /// `Mean: x.xx` / `Var: x.xx`
    MeanVariance,
    /// `mean: x.xx` / `var: x.xx`
    LowerMeanVariance,
    /// `Mean: x.xx`
    Mean,
}

impl Annotation {
    fn text(self, mean: f64, variance: f64) -> Option<String> {
        if mean.is_nan() {
            return None;
        }
        match self {
            Self::None => None,
            Self::MeanVariance => Some(format!("Mean: {mean:.2}\nVar: {variance:.2}")),
            Self::LowerMeanVariance => Some(format!("mean: {mean:.2}\nvar: {variance:.2}")),
            Self::Mean => Some(format!("Mean: {mean:.2}")),
        }
    }
}

/// A named set of row keys shown under one heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGroup {
    pub name: String,
    pub keys: Vec<String>,
}

impl RowGroup {
    #[must_use]
    pub fn new(name: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            name: name.into(),
            keys,
        }
    }
}

/// How rows are matched to groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingMode {
    /// Group order follows the first row of each group, bottom-up. Heading
    /// offsets accumulate the *declared* group sizes, so rows that belong to
    /// no group do not shift the headings and group keys missing from the
    /// rows still take up space. A key listed in several groups belongs to
    /// the last one.
    #[default]
    Partial,
    /// Groups must split the rows into contiguous runs that cover every row
    /// and every declared key. Anything else draws no separators or headings.
    Strict,
}

/// Where a group heading and the separator after it go, in row positions
/// (row `1` is the bottom row).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlacement {
    pub name: String,
    pub center: f64,
    pub separator: Option<f64>,
}

/// Places group headings and separators for rows listed bottom-up.
///
/// Fewer than two matched groups produce no placements.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn place_groups(
    keys_bottom_up: &[&str],
    groups: &[RowGroup],
    mode: GroupingMode,
) -> Vec<GroupPlacement> {
    let group_of = |key: &str| groups.iter().rposition(|g| g.keys.iter().any(|k| k == key));

    let sized = match mode {
        GroupingMode::Partial => {
            let mut order: Vec<usize> = vec![];
            for idx in keys_bottom_up.iter().filter_map(|key| group_of(key)) {
                if !order.contains(&idx) {
                    order.push(idx);
                }
            }
            order
                .into_iter()
                .map(|idx| (idx, groups[idx].keys.len()))
                .collect::<Vec<_>>()
        }
        GroupingMode::Strict => {
            let mut runs: Vec<(usize, usize)> = vec![];
            for key in keys_bottom_up {
                let Some(idx) = group_of(key) else {
                    tracing::warn!(row = %key, "row belongs to no group; drawing no group separators");
                    return vec![];
                };
                match runs.last_mut() {
                    Some((last, len)) if *last == idx => *len += 1,
                    _ => {
                        if runs.iter().any(|(g, _)| *g == idx) {
                            tracing::warn!(group = %groups[idx].name, "group rows are not contiguous; drawing no group separators");
                            return vec![];
                        }
                        runs.push((idx, 1));
                    }
                }
            }
            if let Some((idx, _)) = runs.iter().find(|(idx, len)| groups[*idx].keys.len() != *len) {
                tracing::warn!(group = %groups[*idx].name, "group keys do not match the rows; drawing no group separators");
                return vec![];
            }
            runs
        }
    };

    if sized.len() < 2 {
        return vec![];
    }
    let last = sized.len() - 1;
    let mut offset = 0.0;
    sized
        .into_iter()
        .enumerate()
        .map(|(i, (idx, len))| {
            let len = len as f64;
            let center = offset + (len + 1.0) / 2.0;
            offset += len;
            GroupPlacement {
                name: groups[idx].name.clone(),
                center,
                separator: (i < last).then_some(offset + 0.5),
            }
        })
        .collect()
}

/// A page of horizontal box-plots.
#[derive(Debug, Clone)]
pub struct BoxPlotChart {
    pub title: Option<String>,
    pub title_width: usize,
    /// Rows, top-down.
    pub rows: Vec<BoxRow>,
    pub axis: ValueAxis,
    pub background: Background,
    pub annotation: Annotation,
    pub groups: Vec<RowGroup>,
    pub grouping: GroupingMode,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub show_row_labels: bool,
    pub plot_width: f64,
    pub row_height: f64,
    pub min_plot_height: f64,
}

impl BoxPlotChart {
    #[must_use]
    pub fn new(axis: ValueAxis, rows: Vec<BoxRow>) -> Self {
        Self {
            title: None,
            title_width: 70,
            rows,
            axis,
            background: Background::None,
            annotation: Annotation::MeanVariance,
            groups: vec![],
            grouping: GroupingMode::default(),
            x_label: None,
            y_label: None,
            show_row_labels: true,
            plot_width: 400.0,
            row_height: 70.0,
            min_plot_height: 600.0,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }

    #[must_use]
    pub fn groups(mut self, groups: Vec<RowGroup>, mode: GroupingMode) -> Self {
        self.groups = groups;
        self.grouping = mode;
        self
    }

    #[must_use]
    pub fn axis_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = Some(x_label.into());
        self.y_label = Some(y_label.into());
        self
    }

    #[must_use]
    pub fn hide_row_labels(mut self) -> Self {
        self.show_row_labels = false;
        self
    }

    #[must_use]
    pub fn size(mut self, plot_width: f64, row_height: f64, min_plot_height: f64) -> Self {
        self.plot_width = plot_width;
        self.row_height = row_height;
        self.min_plot_height = min_plot_height;
        self
    }

    /// Renders the chart to a page.
    #[expect(clippy::cast_precision_loss, clippy::too_many_lines)]
    #[must_use]
    pub fn render(&self) -> SvgPage {
        let n = self.rows.len().max(1) as f64;
        let bottom_up = self.rows.iter().rev().collect::<Vec<_>>();
        let keys = bottom_up.iter().map(|r| r.key.as_str()).collect::<Vec<_>>();
        let placements = place_groups(&keys, &self.groups, self.grouping);

        let title = self
            .title
            .as_deref()
            .map(|t| wrap::wrap(t, self.title_width).join("\n"));
        let ticks = self.axis.ticks();
        let tick_label_height = ticks
            .iter()
            .map(|(_, label)| svg::block_height(label, LABEL_FONT))
            .fold(0.0, f64::max);
        let label_width = if self.show_row_labels {
            self.rows
                .iter()
                .map(|r| svg::block_width(&r.label, LABEL_FONT))
                .fold(0.0, f64::max)
        } else {
            0.0
        };
        let annotation_width = match self.annotation {
            Annotation::None => 0.0,
            _ => 90.0,
        };

        let left = MARGIN
            + if placements.is_empty() { 0.0 } else { HEADING_WIDTH }
            + if self.y_label.is_some() { 20.0 } else { 0.0 }
            + label_width
            + TICK_LENGTH
            + 4.0;
        let top = MARGIN
            + title
                .as_deref()
                .map_or(0.0, |t| svg::block_height(t, TITLE_FONT) + 10.0);
        let plot_height = f64::max(self.min_plot_height, self.row_height * n);
        let bottom = top + plot_height;
        let right = left + self.plot_width;
        let width = right + annotation_width + MARGIN;
        let height = bottom
            + TICK_LENGTH
            + tick_label_height
            + if self.x_label.is_some() { 22.0 } else { 6.0 }
            + LEGEND_HEIGHT
            + MARGIN;

        let (x_min, x_max) = self.axis.range();
        let x_of = |v: f64| left + (v - x_min) / (x_max - x_min) * self.plot_width;
        let y_of = |pos: f64| top + (n + 0.5 - pos) / n * plot_height;
        let row_pitch = plot_height / n;

        let mut canvas = Canvas::new(width, height);

        // backgrounds
        for (i, row) in bottom_up.iter().enumerate() {
            let pos = (i + 1) as f64;
            let (y0, y1) = (y_of(pos + 0.5), y_of(pos - 0.5));
            for band in self.row_bands(row) {
                let from = band.from.clamp(x_min, x_max);
                let to = band.to.clamp(x_min, x_max);
                canvas.rect(
                    x_of(from),
                    y0,
                    x_of(to) - x_of(from),
                    y1 - y0,
                    &Style::fill(band.color).with_fill_opacity(0.4),
                );
            }
        }

        for placement in &placements {
            if let Some(sep) = placement.separator {
                let y = y_of(sep);
                canvas.line(left, y, right, y, &Style::stroke("black", 1.0).dotted());
            }
            canvas.text(
                MARGIN + HEADING_WIDTH / 2.0,
                y_of(placement.center),
                &placement.name,
                &TextStyle::sized(HEADING_FONT)
                    .anchor(Anchor::Middle)
                    .bold()
                    .rotate(-90.0),
            );
        }

        // rows
        for (i, row) in bottom_up.iter().enumerate() {
            let yc = y_of((i + 1) as f64);
            canvas.begin_group("row");
            if self.show_row_labels {
                canvas.text(
                    left - TICK_LENGTH - 4.0,
                    yc,
                    &row.label,
                    &TextStyle::sized(LABEL_FONT).anchor(Anchor::End),
                );
            }
            canvas.line(left - TICK_LENGTH, yc, left, yc, &Style::stroke("black", 1.0));
            if let Some(summary) = row.summary() {
                draw_box(&mut canvas, &summary, yc, row_pitch * 0.25, &x_of);
            }
            if let Some(max) = row.max_marker {
                let x = x_of(max.clamp(x_min, x_max));
                canvas.line(
                    x,
                    yc - row_pitch * 0.4,
                    x,
                    yc + row_pitch * 0.4,
                    &Style::stroke(color::MAX_MARKER, 2.0)
                        .dashed()
                        .with_opacity(0.7),
                );
            }
            let (mean, variance) = row.mean_variance();
            if let Some(text) = self.annotation.text(mean, variance) {
                canvas.text(right + 8.0, yc, &text, &TextStyle::sized(LABEL_FONT));
            }
            canvas.end_group();
        }

        // axes
        canvas.rect(left, top, self.plot_width, plot_height, &Style::stroke("black", 1.0));
        for (value, label) in &ticks {
            let x = x_of(*value);
            canvas.line(x, bottom, x, bottom + TICK_LENGTH, &Style::stroke("black", 1.0));
            canvas.text(
                x,
                bottom + TICK_LENGTH + 2.0,
                label,
                &TextStyle::sized(LABEL_FONT)
                    .anchor(Anchor::Middle)
                    .valign(VAlign::Top),
            );
        }
        let mut cursor = bottom + TICK_LENGTH + tick_label_height + 6.0;
        if let Some(x_label) = &self.x_label {
            canvas.text(
                (left + right) / 2.0,
                cursor,
                x_label,
                &TextStyle::sized(LABEL_FONT + 1.0)
                    .anchor(Anchor::Middle)
                    .valign(VAlign::Top),
            );
            cursor += 16.0;
        }
        if let Some(y_label) = &self.y_label {
            let x = MARGIN + if placements.is_empty() { 0.0 } else { HEADING_WIDTH } + 8.0;
            canvas.text(
                x,
                (top + bottom) / 2.0,
                y_label,
                &TextStyle::sized(LABEL_FONT + 1.0)
                    .anchor(Anchor::Middle)
                    .rotate(-90.0),
            );
        }
        if let Some(title) = &title {
            canvas.text(
                MARGIN,
                MARGIN,
                title,
                &TextStyle::sized(TITLE_FONT).bold().valign(VAlign::Top),
            );
        }

        let legend = self.legend_entries();
        draw_legend(&mut canvas, (left + right) / 2.0, cursor + 4.0, &legend);

        canvas.finish()
    }

    fn row_bands(&self, row: &BoxRow) -> Vec<Band> {
        match &self.background {
            Background::None => vec![],
            Background::Bands(bands) => bands.clone(),
            Background::Polarity(polarities) => {
                let (low, high) = match polarities.get(&row.key).unwrap_or_default() {
                    Polarity::FavorableHigh => (color::UNFAVORABLE, color::FAVORABLE),
                    Polarity::FavorableLow => (color::FAVORABLE, color::UNFAVORABLE),
                };
                vec![
                    Band {
                        from: SCALE_MIN,
                        to: SCALE_MIDPOINT,
                        color: low,
                        label: None,
                    },
                    Band {
                        from: SCALE_MIDPOINT,
                        to: SCALE_MAX,
                        color: high,
                        label: None,
                    },
                ]
            }
        }
    }

    fn legend_entries(&self) -> Vec<LegendEntry> {
        let mut entries = vec![
            LegendEntry::Line {
                label: "Mean".to_owned(),
                style: Style::stroke(color::MEAN, 3.0),
            },
            LegendEntry::Line {
                label: "Median".to_owned(),
                style: Style::stroke(color::MEDIAN, 4.0),
            },
        ];
        if self.rows.iter().any(|r| r.max_marker.is_some()) {
            entries.push(LegendEntry::Line {
                label: "Max value".to_owned(),
                style: Style::stroke(color::MAX_MARKER, 2.0).dashed(),
            });
        }
        if let Background::Bands(bands) = &self.background {
            // highest band first
            for band in bands.iter().rev() {
                if let Some(label) = &band.label {
                    entries.push(LegendEntry::Patch {
                        label: label.clone(),
                        color: band.color.to_owned(),
                    });
                }
            }
        }
        entries
    }
}

fn draw_box<F>(canvas: &mut Canvas, summary: &BoxSummary, yc: f64, half: f64, x_of: &F)
where
    F: Fn(f64) -> f64,
{
    let line = Style::stroke("black", 1.0);
    canvas.line(x_of(summary.whisker_low), yc, x_of(summary.q1), yc, &line);
    canvas.line(x_of(summary.q3), yc, x_of(summary.whisker_high), yc, &line);
    for cap in [summary.whisker_low, summary.whisker_high] {
        let x = x_of(cap);
        canvas.line(x, yc - half / 2.0, x, yc + half / 2.0, &line);
    }
    canvas.rect(
        x_of(summary.q1),
        yc - half,
        x_of(summary.q3) - x_of(summary.q1),
        2.0 * half,
        &Style::fill(color::BOX_FILL).with_stroke("black", 1.0),
    );
    let x = x_of(summary.median);
    canvas.line(x, yc - half, x, yc + half, &Style::stroke(color::MEDIAN, 4.0));
    let x = x_of(summary.mean);
    canvas.line(x, yc - half, x, yc + half, &Style::stroke(color::MEAN, 3.0));
    for &outlier in &summary.outliers {
        canvas.circle(x_of(outlier), yc, 3.0, &Style::stroke("black", 1.0));
    }
}

#[derive(Debug, Clone)]
pub(crate) enum LegendEntry {
    Line { label: String, style: Style },
    Patch { label: String, color: String },
}

/// Draws a one-line framed legend centred on `center_x`.
pub(crate) fn draw_legend(canvas: &mut Canvas, center_x: f64, y: f64, entries: &[LegendEntry]) {
    const SWATCH: f64 = 20.0;
    const PAD: f64 = 8.0;
    if entries.is_empty() {
        return;
    }
    let label_of = |e: &LegendEntry| match e {
        LegendEntry::Line { label, .. } | LegendEntry::Patch { label, .. } => label.clone(),
    };
    let widths = entries
        .iter()
        .map(|e| SWATCH + 4.0 + svg::text_width(&label_of(e), LABEL_FONT) + PAD)
        .collect::<Vec<_>>();
    let total = widths.iter().sum::<f64>() + PAD;
    let mut x = center_x - total / 2.0;
    let mid = y + LEGEND_HEIGHT / 2.0 - 2.0;
    canvas.rect(
        x,
        y,
        total,
        LEGEND_HEIGHT - 4.0,
        &Style::fill("white").with_stroke("lightgray", 1.0),
    );
    x += PAD;
    for (entry, w) in entries.iter().zip(&widths) {
        match entry {
            LegendEntry::Line { style, .. } => canvas.line(x, mid, x + SWATCH, mid, style),
            LegendEntry::Patch { color, .. } => canvas.rect(
                x,
                mid - 6.0,
                SWATCH,
                12.0,
                &Style::fill(color.as_str()).with_stroke("gray", 1.0),
            ),
        }
        canvas.text(x + SWATCH + 4.0, mid, &label_of(entry), &TextStyle::sized(LABEL_FONT));
        x += w;
    }
}
