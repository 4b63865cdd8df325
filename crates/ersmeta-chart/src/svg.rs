//! Minimal SVG canvas
//!
//! Only the handful of primitives the charts need: rectangles, lines, paths,
//! circles and (multi-line, optionally rotated) text. Coordinates are in
//! pixels with the origin at the top-left corner.

use crate::page::SvgPage;

/// Approximate advance of one character as a fraction of the font size.
pub const CHAR_WIDTH_RATIO: f64 = 0.6;
/// Line spacing as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.25;

/// Rough width in pixels of a single line of text.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * CHAR_WIDTH_RATIO
}

/// Width of the widest line of a possibly multi-line text.
#[must_use]
pub fn block_width(text: &str, font_size: f64) -> f64 {
    text.lines()
        .map(|line| text_width(line, font_size))
        .fold(0.0, f64::max)
}

/// Height of a possibly multi-line text.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn block_height(text: &str, font_size: f64) -> f64 {
    text.lines().count().max(1) as f64 * font_size * LINE_HEIGHT_RATIO
}

#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Fill and stroke of a shape.
#[derive(Debug, Clone, Default)]
pub struct Style {
    fill: Option<String>,
    fill_opacity: Option<f64>,
    stroke: Option<String>,
    stroke_width: Option<f64>,
    dash: Option<&'static str>,
    opacity: Option<f64>,
}

impl Style {
    #[must_use]
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stroke(color: impl Into<String>, width: f64) -> Self {
        Self {
            fill: Some("none".to_owned()),
            stroke: Some(color.into()),
            stroke_width: Some(width),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.stroke = Some(color.into());
        self.stroke_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn dashed(mut self) -> Self {
        self.dash = Some("6,4");
        self
    }

    #[must_use]
    pub fn dotted(mut self) -> Self {
        self.dash = Some("1,3");
        self
    }

    fn attributes(&self) -> String {
        let mut attrs = String::new();
        if let Some(fill) = &self.fill {
            attrs.push_str(&format!(r#" fill="{fill}""#));
        }
        if let Some(opacity) = self.fill_opacity {
            attrs.push_str(&format!(r#" fill-opacity="{opacity}""#));
        }
        if let Some(stroke) = &self.stroke {
            attrs.push_str(&format!(r#" stroke="{stroke}""#));
        }
        if let Some(width) = self.stroke_width {
            attrs.push_str(&format!(r#" stroke-width="{width}""#));
        }
        if let Some(dash) = self.dash {
            attrs.push_str(&format!(r#" stroke-dasharray="{dash}""#));
        }
        if let Some(opacity) = self.opacity {
            attrs.push_str(&format!(r#" opacity="{opacity}""#));
        }
        attrs
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Where the text block sits relative to the given `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f64,
    pub anchor: Anchor,
    pub valign: VAlign,
    pub bold: bool,
    pub monospace: bool,
    pub color: &'static str,
    /// Rotation in degrees, clockwise, around the anchor point.
    pub rotate: Option<f64>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            anchor: Anchor::Start,
            valign: VAlign::Middle,
            bold: false,
            monospace: false,
            color: "black",
            rotate: None,
        }
    }
}

impl TextStyle {
    #[must_use]
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    #[must_use]
    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }

    #[must_use]
    pub fn color(mut self, color: &'static str) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

/// An SVG document under construction.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f64,
    height: f64,
    body: String,
}

impl Canvas {
    /// Creates a canvas with a white background.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let mut canvas = Self {
            width,
            height,
            body: String::new(),
        };
        canvas.rect(0.0, 0.0, width, height, &Style::fill("white"));
        canvas
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: &Style) {
        self.body.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\"{attrs}/>\n",
            w = width.max(0.0),
            h = height.max(0.0),
            attrs = style.attributes(),
        ));
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &Style) {
        self.body.push_str(&format!(
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\"{attrs}/>\n",
            attrs = style.attributes(),
        ));
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, style: &Style) {
        self.body.push_str(&format!(
            "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\"{attrs}/>\n",
            attrs = style.attributes(),
        ));
    }

    pub fn path(&mut self, d: &str, style: &Style) {
        self.body
            .push_str(&format!("<path d=\"{d}\"{}/>\n", style.attributes()));
    }

    /// Draws text; `\n` starts a new line.
    #[expect(clippy::cast_precision_loss)]
    pub fn text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        let lines = text.lines().collect::<Vec<_>>();
        if lines.is_empty() {
            return;
        }
        let line_height = style.size * LINE_HEIGHT_RATIO;
        let block = (lines.len() - 1) as f64 * line_height;
        // y of the first baseline; 0.35em shifts from baseline to visual centre
        let first = match style.valign {
            VAlign::Top => y + style.size * 0.8,
            VAlign::Middle => y - block / 2.0 + style.size * 0.35,
            VAlign::Bottom => y - block - style.size * 0.2,
        };

        let mut attrs = format!(
            r#" font-size="{}" text-anchor="{}" fill="{}""#,
            style.size,
            style.anchor.as_str(),
            style.color
        );
        attrs.push_str(if style.monospace {
            r#" font-family="monospace""#
        } else {
            r#" font-family="sans-serif""#
        });
        if style.bold {
            attrs.push_str(r#" font-weight="bold""#);
        }
        if let Some(degrees) = style.rotate {
            attrs.push_str(&format!(r#" transform="rotate({degrees} {x:.2} {y:.2})""#));
        }

        self.body.push_str(&format!("<text{attrs}>"));
        for (idx, line) in lines.iter().enumerate() {
            self.body.push_str(&format!(
                r#"<tspan x="{x:.2}" y="{ly:.2}" xml:space="preserve">{text}</tspan>"#,
                ly = first + idx as f64 * line_height,
                text = escape(line),
            ));
        }
        self.body.push_str("</text>\n");
    }

    /// Opens a group; must be balanced with [`Canvas::end_group`].
    pub fn begin_group(&mut self, class: &str) {
        self.body.push_str(&format!("<g class=\"{}\">\n", escape(class)));
    }

    pub fn end_group(&mut self) {
        self.body.push_str("</g>\n");
    }

    #[must_use]
    pub fn finish(self) -> SvgPage {
        let markup = format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
                "\n{body}</svg>\n"
            ),
            w = self.width.ceil(),
            h = self.height.ceil(),
            body = self.body,
        );
        SvgPage::new(self.width.ceil(), self.height.ceil(), markup)
    }
}
