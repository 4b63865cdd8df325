//! Run provenance stamped next to the generated reports

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::Context as _;
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::filter::ExperienceFilter;

pub const PROVENANCE_FILE_NAME: &str = "metadata.json";

const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Serialize)]
pub struct RunProvenance {
    pub input_file: Option<PathBuf>,
    pub metadata_input: Option<PathBuf>,
    pub experience_filter: ExperienceFilter,
    /// Modification time of `input_file`, or `"unknown"`.
    pub input_file_last_modified: String,
    /// `HEAD` commit of the working directory, or `"unknown"`.
    pub code_commit: String,
    pub metadata_creation_date: DateTime<Local>,
}

impl RunProvenance {
    pub fn collect(
        input_file: Option<&Path>,
        metadata_input: Option<&Path>,
        experience_filter: ExperienceFilter,
    ) -> Self {
        Self {
            input_file: input_file.map(Path::to_owned),
            metadata_input: metadata_input.map(Path::to_owned),
            experience_filter,
            input_file_last_modified: input_file
                .and_then(last_modified)
                .unwrap_or_else(|| UNKNOWN.to_owned()),
            code_commit: git_head().unwrap_or_else(|| UNKNOWN.to_owned()),
            metadata_creation_date: Local::now(),
        }
    }

    /// Writes the record as pretty JSON into `output_dir`.
    pub fn write(&self, output_dir: &Path) -> anyhow::Result<()> {
        let path = output_dir.join(PROVENANCE_FILE_NAME);
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize run provenance")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write run provenance: {}", path.display()))?;
        tracing::info!(path = %path.display(), commit = %self.code_commit, "wrote run provenance");
        Ok(())
    }
}

fn last_modified(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified).to_rfc3339())
}

fn git_head() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let commit = String::from_utf8(output.stdout).ok()?.trim().to_owned();
    (!commit.is_empty()).then_some(commit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("answers.csv");
        fs::write(&input, "a\n1\n").unwrap();

        let provenance =
            RunProvenance::collect(Some(&input), None, ExperienceFilter::ExcludeMissing);
        assert_ne!(provenance.input_file_last_modified, UNKNOWN);
        provenance.write(dir.path()).unwrap();

        let written: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join(PROVENANCE_FILE_NAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(written["experience_filter"], "exclude_missing");
        assert!(written["metadata_input"].is_null());
        assert!(written["code_commit"].is_string());
    }

    #[test]
    fn test_missing_input_is_unknown() {
        let provenance = RunProvenance::collect(
            Some(Path::new("/nonexistent/answers.csv")),
            None,
            ExperienceFilter::All,
        );
        assert_eq!(provenance.input_file_last_modified, UNKNOWN);
    }
}
