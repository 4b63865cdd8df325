//! Multi-page PDF documents
//!
//! Each page is rasterised and placed as a full-page image, so every page
//! keeps its own size.

use std::path::Path;

use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

use crate::{
    ChartError,
    page::SvgPage,
    raster::{RASTER_SCALE, Raster},
};

/// File extension of combined documents.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// PDF points per page unit, at 96 units per inch.
pub const POINTS_PER_UNIT: f32 = 0.75;

/// Writes `pages` as one PDF document, one PDF page per page, in order.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn write_document(pages: &[SvgPage], path: &Path) -> Result<(), ChartError> {
    let pdf_error = |source| ChartError::Pdf {
        path: path.to_owned(),
        source,
    };

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = vec![];
    for page in pages {
        let raster = Raster::render(page, RASTER_SCALE)?;
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => raster.width(),
                "Height" => raster.height(),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            raster.rgb().to_vec(),
        ));

        let width = page.width() as f32 * POINTS_PER_UNIT;
        let height = page.height() as f32 * POINTS_PER_UNIT;
        // the image space is the unit square, stretched over the whole page
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0.into(),
                        0.into(),
                        height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().map_err(pdf_error)?,
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(path).map_err(|source| ChartError::Io {
        path: path.to_owned(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::Canvas;

    fn page_widths(path: &Path) -> Vec<f32> {
        let doc = Document::load(path).unwrap();
        doc.get_pages()
            .values()
            .map(|&id| {
                let page = doc.get_dictionary(id).unwrap();
                let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
                media_box[2].as_float().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_one_pdf_page_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        let pages = [
            Canvas::new(100.0, 40.0).finish(),
            Canvas::new(200.0, 40.0).finish(),
        ];
        write_document(&pages, &path).unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF-1.5"));
        assert_eq!(page_widths(&path), vec![75.0, 150.0]);
    }

    #[test]
    fn test_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        write_document(&[], &path).unwrap();
        assert!(Document::load(&path).unwrap().get_pages().is_empty());
    }
}
