//! Page documents and their raster previews

use std::{fs, path::Path};

use crate::{
    ChartError,
    raster::{PREVIEW_EXTENSION, RASTER_SCALE, Raster},
};

/// File extension of page documents.
pub const PAGE_EXTENSION: &str = "svg";

/// One rendered page: a standalone SVG document and its size.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgPage {
    width: f64,
    height: f64,
    markup: String,
}

impl SvgPage {
    pub(crate) fn new(width: f64, height: f64, markup: String) -> Self {
        Self {
            width,
            height,
            markup,
        }
    }

    /// Reads the size of an existing SVG document from its root element.
    ///
    /// Returns `None` when there is no `<svg>` root or its `width`/`height`
    /// are not plain numbers (optionally suffixed with `px`).
    #[must_use]
    pub fn parse(markup: &str) -> Option<Self> {
        let body = strip_prolog(markup);
        if !body.starts_with("<svg") {
            return None;
        }
        let root = &body[..body.find('>')?];
        let width = root_attribute(root, "width")?;
        let height = root_attribute(root, "height")?;
        Some(Self::new(width, height, body.to_owned()))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Writes the page and its PNG preview next to it, replacing existing
    /// files.
    ///
    /// The preview shares the base name of `path`.
    pub fn write(&self, path: &Path) -> Result<(), ChartError> {
        fs::write(path, &self.markup).map_err(|source| ChartError::Io {
            path: path.to_owned(),
            source,
        })?;
        let preview = path.with_extension(PREVIEW_EXTENSION);
        Raster::render(self, RASTER_SCALE)?.write_png(&preview)?;
        tracing::info!(
            path = %path.display(),
            preview = %preview.display(),
            "wrote page document"
        );
        Ok(())
    }
}

/// Skips an XML declaration, comments and a doctype before the root element.
fn strip_prolog(markup: &str) -> &str {
    let mut rest = markup.trim_start();
    loop {
        let next = if rest.starts_with("<?") {
            rest.find("?>").map(|end| &rest[end + 2..])
        } else if rest.starts_with("<!--") {
            rest.find("-->").map(|end| &rest[end + 3..])
        } else if rest.starts_with("<!") {
            rest.find('>').map(|end| &rest[end + 1..])
        } else {
            None
        };
        match next {
            Some(next) => rest = next.trim_start(),
            None => return rest,
        }
    }
}

fn root_attribute(root: &str, name: &str) -> Option<f64> {
    let pattern = format!(" {name}=\"");
    let start = root.find(&pattern)? + pattern.len();
    let end = start + root[start..].find('"')?;
    let value = root[start..end].trim();
    value.strip_suffix("px").unwrap_or(value).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reads_root_size() {
        let page = SvgPage::parse(
            "<?xml version=\"1.0\"?>\n<!-- made elsewhere -->\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"300px\" height=\"150\">\
             <rect stroke-width=\"2\"/></svg>",
        )
        .unwrap();
        assert_eq!(page.width(), 300.0);
        assert_eq!(page.height(), 150.0);
        assert!(page.markup().starts_with("<svg"));
    }

    #[test]
    fn test_parse_rejects_non_svg() {
        assert!(SvgPage::parse("<html></html>").is_none());
        assert!(SvgPage::parse("<svg viewBox=\"0 0 1 1\"></svg>").is_none());
    }

    #[test]
    fn test_write_adds_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        crate::svg::Canvas::new(30.0, 20.0).finish().write(&path).unwrap();

        let written = SvgPage::parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!((written.width(), written.height()), (30.0, 20.0));
        let preview = fs::read(dir.path().join("chart.png")).unwrap();
        assert!(preview.starts_with(b"\x89PNG"));
    }
}
