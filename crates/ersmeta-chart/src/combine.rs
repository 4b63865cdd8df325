//! Merging a directory of page documents into one PDF document

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    ChartError,
    page::{PAGE_EXTENSION, SvgPage},
    pdf,
};

/// Page documents directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched. The extension match ignores case.
pub fn page_files(dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    let io_error = |source| ChartError::Io {
        path: dir.to_owned(),
        source,
    };
    let mut files = vec![];
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_page = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PAGE_EXTENSION));
        if is_page && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Writes every page document of `source_dir` as one page of the PDF
/// document `output`.
///
/// Pages are taken in file-name order. `output` itself is skipped when it
/// lies in `source_dir`, so repeated runs do not nest earlier results.
/// Returns the number of merged pages.
pub fn combine(source_dir: &Path, output: &Path) -> Result<usize, ChartError> {
    let output_canonical = fs::canonicalize(output).ok();
    let mut pages = vec![];
    for path in page_files(source_dir)? {
        if output_canonical.is_some() && fs::canonicalize(&path).ok() == output_canonical {
            tracing::debug!(path = %path.display(), "skipping combined output");
            continue;
        }
        let markup = fs::read_to_string(&path).map_err(|source| ChartError::Io {
            path: path.clone(),
            source,
        })?;
        let page = SvgPage::parse(&markup).ok_or_else(|| ChartError::MalformedPage {
            path: path.clone(),
            reason: "no sized <svg> root element".to_owned(),
        })?;
        pages.push(page);
    }

    pdf::write_document(&pages, output)?;
    tracing::info!(
        pages = pages.len(),
        output = %output.display(),
        "combined page documents"
    );
    Ok(pages.len())
}
