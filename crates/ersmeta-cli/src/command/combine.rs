use std::path::PathBuf;

use anyhow::Context as _;
use ersmeta_chart::combine;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CombineArg {
    /// Directory holding the page documents
    #[arg(long, default_value = "results")]
    dir: PathBuf,
    /// Combined PDF document path [default: <DIR>/combined_results.pdf]
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CombineArg) -> anyhow::Result<()> {
    let CombineArg { dir, output } = arg;
    let output = output
        .clone()
        .unwrap_or_else(|| util::combined_path(dir));
    let pages = combine::combine(dir, &output)
        .with_context(|| format!("Failed to combine pages of {}", dir.display()))?;
    if pages == 0 {
        tracing::warn!(dir = %dir.display(), "no page documents found");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ersmeta_chart::svg::Canvas;

    use super::*;

    #[test]
    fn test_combine_into_other_file() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("pages");
        fs::create_dir(&pages).unwrap();
        util::write_page(&Canvas::new(10.0, 10.0).finish(), &pages, "a").unwrap();
        let output = dir.path().join("all.pdf");

        run(&CombineArg {
            dir: pages.clone(),
            output: Some(output.clone()),
        })
        .unwrap();
        assert!(fs::read(&output).unwrap().starts_with(b"%PDF"));
        assert!(!util::combined_path(&pages).exists());
    }

    #[test]
    fn test_combine_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&CombineArg {
            dir: dir.path().join("missing"),
            output: None,
        });
        assert!(result.is_err());
    }
}
