//! Raster rendering of page documents
//!
//! Pages are rasterised on an opaque white background, so the pixel buffer
//! is plain 8-bit RGB. The same buffer feeds the PNG preview written next to
//! every page and the pages of the combined PDF document.

use std::{
    fs::File,
    io::BufWriter,
    path::Path,
    sync::{Arc, LazyLock},
};

use resvg::{tiny_skia, usvg};

use crate::{ChartError, page::SvgPage};

/// File extension of raster previews.
pub const PREVIEW_EXTENSION: &str = "png";

/// Pixels per page unit in rasterised output.
pub const RASTER_SCALE: f32 = 2.0;

static FONTS: LazyLock<Arc<usvg::fontdb::Database>> = LazyLock::new(|| {
    let mut fonts = usvg::fontdb::Database::new();
    fonts.load_system_fonts();
    tracing::debug!(faces = fonts.len(), "loaded system fonts");
    Arc::new(fonts)
});

/// An opaque RGB image of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl Raster {
    /// Renders `page` with `scale` pixels per page unit.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render(page: &SvgPage, scale: f32) -> Result<Self, ChartError> {
        let options = usvg::Options {
            fontdb: Arc::clone(&FONTS),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(page.markup(), &options).map_err(|err| {
            ChartError::Render {
                reason: err.to_string(),
            }
        })?;

        let width = ((page.width() as f32 * scale).ceil() as u32).max(1);
        let height = ((page.height() as f32 * scale).ceil() as u32).max(1);
        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or_else(|| ChartError::Render {
                reason: format!("cannot allocate a {width}x{height} image"),
            })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        // opaque pixels, so premultiplied and straight RGB agree
        let rgb = pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Ok(Self { width, height, rgb })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGB samples, three bytes per pixel.
    #[must_use]
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Writes the image as an 8-bit RGB PNG, replacing any existing file.
    pub fn write_png(&self, path: &Path) -> Result<(), ChartError> {
        let file = File::create(path).map_err(|source| ChartError::Io {
            path: path.to_owned(),
            source,
        })?;
        let png_error = |source| ChartError::Png {
            path: path.to_owned(),
            source,
        };
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width, self.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(png_error)?;
        writer.write_image_data(&self.rgb).map_err(png_error)?;
        writer.finish().map_err(png_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::svg::{Canvas, Style};

    #[test]
    fn test_render_scales_and_fills_white() {
        let mut canvas = Canvas::new(20.0, 10.0);
        canvas.rect(0.0, 0.0, 10.0, 10.0, &Style::fill("#ff0000"));
        let raster = Raster::render(&canvas.finish(), 2.0).unwrap();

        assert_eq!((raster.width(), raster.height()), (40, 20));
        assert_eq!(raster.rgb().len(), 40 * 20 * 3);
        let pixel = |x: usize, y: usize| {
            let at = (y * 40 + x) * 3;
            &raster.rgb()[at..at + 3]
        };
        assert_eq!(pixel(5, 5), [255, 0, 0]);
        assert_eq!(pixel(35, 15), [255, 255, 255]);
    }

    #[test]
    fn test_write_png_signature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        Raster::render(&Canvas::new(8.0, 4.0).finish(), 1.0)
            .unwrap()
            .write_png(&path)
            .unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_unparsable_markup() {
        let page = SvgPage::parse(r#"<svg width="10" height="10"><rect></svg>"#).unwrap();
        let err = Raster::render(&page, 1.0).unwrap_err();
        assert!(matches!(err, ChartError::Render { .. }));
    }
}
