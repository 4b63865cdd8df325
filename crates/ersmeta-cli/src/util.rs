use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use ersmeta_analysis::{
    element::{self, MetadataRecord},
    schema::MetadataSchema,
    table::{Cell, ResponseTable},
};
use ersmeta_chart::{
    combine,
    page::{PAGE_EXTENSION, SvgPage},
    pdf::DOCUMENT_EXTENSION,
};

/// Base name of the combined document in an output directory.
pub const COMBINED_FILE_NAME: &str = "combined_results";

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads a CSV file with a header row into a response table.
pub fn read_response_table<P>(path: P) -> anyhow::Result<ResponseTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open response file: {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();

    let mut table = ResponseTable::new(headers.iter());
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| {
            format!("Failed to read row {} of {}", idx + 1, path.display())
        })?;
        table.push_row(record.iter().map(Cell::parse));
    }
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "loaded response table"
    );
    Ok(table)
}

pub fn read_schema_file<P>(path: P) -> anyhow::Result<MetadataSchema>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let value = read_json_file("metadata schema", path)?;
    MetadataSchema::from_json(value)
        .with_context(|| format!("Invalid metadata schema: {}", path.display()))
}

/// Reads every record file directly inside `dir`, in file-name order.
///
/// Files named in `excluded` are skipped.
pub fn read_metadata_records<S>(dir: &Path, excluded: &[S]) -> anyhow::Result<Vec<MetadataRecord>>
where
    S: AsRef<str>,
{
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("Failed to read metadata directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, _>>()
        .with_context(|| format!("Failed to list metadata directory: {}", dir.display()))?;
    paths.retain(|path| {
        let is_excluded = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| excluded.iter().any(|e| e.as_ref() == name));
        path.is_file() && !is_excluded
    });
    paths.sort();

    let records = paths
        .iter()
        .enumerate()
        .map(|(idx, path)| {
            let value = read_json_file("metadata record", path)?;
            element::parse_record(idx, value)
                .with_context(|| format!("Invalid metadata record: {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    tracing::info!(dir = %dir.display(), records = records.len(), "loaded metadata records");
    Ok(records)
}

pub fn create_output_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create output directory: {}", path.display()))
}

pub fn page_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{name}.{PAGE_EXTENSION}"))
}

pub fn combined_path(output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{COMBINED_FILE_NAME}.{DOCUMENT_EXTENSION}"))
}

pub fn write_page(page: &SvgPage, output_dir: &Path, name: &str) -> anyhow::Result<()> {
    let path = page_path(output_dir, name);
    page.write(&path)
        .with_context(|| format!("Failed to write page: {}", path.display()))
}

/// Writes `pages` as `<name>-001`, `<name>-002`, ... so that they sort in
/// page order.
pub fn write_pages(pages: &[SvgPage], output_dir: &Path, name: &str) -> anyhow::Result<()> {
    for (idx, page) in pages.iter().enumerate() {
        write_page(page, output_dir, &format!("{name}-{:03}", idx + 1))?;
    }
    Ok(())
}

/// Merges every page of `output_dir` into the combined document.
pub fn combine_output(output_dir: &Path) -> anyhow::Result<PathBuf> {
    let output = combined_path(output_dir);
    combine::combine(output_dir, &output).with_context(|| {
        format!("Failed to combine pages of {}", output_dir.display())
    })?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use ersmeta_chart::svg::Canvas;

    use super::*;

    #[test]
    fn test_read_response_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.csv");
        fs::write(
            &path,
            "id,G04Q11[SQ002],comment\n1,Agree,\"free, text\"\n2,,\n3,N/A,NA\n",
        )
        .unwrap();
        let table = read_response_table(&path).unwrap();
        assert_eq!(table.columns(), ["id", "G04Q11[SQ002]", "comment"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.samples("G04Q11[SQ002]").unwrap(), vec![4.0]);
        assert_eq!(table.count_answered(["comment"]).unwrap(), 1);
    }

    #[test]
    fn test_ragged_csv_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.csv");
        fs::write(&path, "a,b\n1,2\n3\n").unwrap();
        assert!(read_response_table(&path).is_err());
    }

    #[test]
    fn test_read_metadata_records_skips_excluded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), r#"{"name": "B"}"#).unwrap();
        fs::write(dir.path().join("a.json"), r#"{"name": "A", "author": [1, 2]}"#).unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let records = read_metadata_records(dir.path(), &["index.html"]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "A");
        assert_eq!(records[1]["name"], "B");
    }

    #[test]
    fn test_array_record_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "[1, 2]").unwrap();
        let err = read_metadata_records::<&str>(dir.path(), &[]).unwrap_err();
        assert!(format!("{err:#}").contains("a.json"));
    }

    #[test]
    fn test_combine_output() {
        let dir = tempfile::tempdir().unwrap();
        write_page(&Canvas::new(10.0, 10.0).finish(), dir.path(), "a").unwrap();
        write_page(&Canvas::new(10.0, 20.0).finish(), dir.path(), "b").unwrap();
        assert!(dir.path().join("a.png").is_file());
        assert!(dir.path().join("b.png").is_file());

        let combined = combine_output(dir.path()).unwrap();
        assert_eq!(combined, dir.path().join("combined_results.pdf"));
        let document = lopdf::Document::load(&combined).unwrap();
        assert_eq!(document.get_pages().len(), 2);
    }

    #[test]
    fn test_write_pages_numbers_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let pages = vec![Canvas::new(10.0, 10.0).finish(); 10];
        write_pages(&pages, dir.path(), "notes").unwrap();
        for name in ["notes-001.svg", "notes-001.png", "notes-010.svg", "notes-010.png"] {
            assert!(dir.path().join(name).is_file(), "{name} missing");
        }
        assert!(!dir.path().join("notes.svg").exists());
    }
}
