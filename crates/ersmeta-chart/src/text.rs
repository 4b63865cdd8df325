//! Free-text answers as a wrapped listing

use std::{fs, path::Path};

use ersmeta_analysis::{AnalysisError, table::ResponseTable};

use crate::{
    ChartError, Descriptions, describe,
    page::SvgPage,
    svg::{Canvas, TextStyle, VAlign},
    wrap,
};

/// Wrap width of the plain-text listing.
pub const TEXT_WIDTH: usize = 100;
/// Wrap width of the paged document.
pub const PAGE_TEXT_WIDTH: usize = 90;
pub const LINES_PER_PAGE: usize = 40;

/// A4 portrait at 100 dpi.
const PAGE_WIDTH: f64 = 827.0;
const PAGE_HEIGHT: f64 = 1169.0;
const PAGE_MARGIN: f64 = 60.0;
const FONT: f64 = 11.0;

/// Lists every non-blank answer of the given columns.
///
/// Each column starts with `<description>:`, each answer with `- ` and its
/// continuation lines with two spaces. A blank line follows every column.
pub fn free_text_lines<S>(
    table: &ResponseTable,
    columns: &[S],
    descriptions: &Descriptions,
    width: usize,
) -> Result<Vec<String>, AnalysisError>
where
    S: AsRef<str>,
{
    table.require_columns(columns.iter().map(AsRef::as_ref))?;
    let mut lines = vec![];
    for column in columns {
        let column = column.as_ref();
        lines.push(format!("{}:", describe(descriptions, column)));
        for cell in table.cells(column)? {
            if cell.is_missing() {
                continue;
            }
            let answer = cell.to_string();
            let wrapped = wrap::wrap(&answer, width.saturating_sub(2).max(1));
            if wrapped.is_empty() {
                lines.push("- ".to_owned());
                continue;
            }
            for (idx, line) in wrapped.into_iter().enumerate() {
                let prefix = if idx == 0 { "- " } else { "  " };
                lines.push(format!("{prefix}{line}"));
            }
        }
        lines.push(String::new());
    }
    Ok(lines)
}

/// Writes the listing wrapped at [`TEXT_WIDTH`] as a plain-text file.
pub fn write_text<S>(
    table: &ResponseTable,
    columns: &[S],
    descriptions: &Descriptions,
    path: &Path,
) -> Result<(), ChartError>
where
    S: AsRef<str>,
{
    let lines = free_text_lines(table, columns, descriptions, TEXT_WIDTH)?;
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content).map_err(|source| ChartError::Io {
        path: path.to_owned(),
        source,
    })?;
    tracing::info!(path = %path.display(), lines = lines.len(), "wrote free-text listing");
    Ok(())
}

/// Lays out listing lines on A4 pages of [`LINES_PER_PAGE`] lines each.
///
/// An empty listing still yields one blank page.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn text_document(lines: &[String]) -> Vec<SvgPage> {
    let style = TextStyle::sized(FONT).monospace().valign(VAlign::Top);
    let line_height = (PAGE_HEIGHT - 2.0 * PAGE_MARGIN) / LINES_PER_PAGE as f64;
    let mut pages = lines
        .chunks(LINES_PER_PAGE)
        .map(|chunk| {
            let mut canvas = Canvas::new(PAGE_WIDTH, PAGE_HEIGHT);
            let mut y = PAGE_MARGIN;
            for line in chunk {
                canvas.text(PAGE_MARGIN, y, line, &style);
                y += line_height;
            }
            canvas.finish()
        })
        .collect::<Vec<_>>();
    if pages.is_empty() {
        pages.push(Canvas::new(PAGE_WIDTH, PAGE_HEIGHT).finish());
    }
    pages
}
