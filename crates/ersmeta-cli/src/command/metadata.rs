use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ersmeta_analysis::{
    element::{self, MetadataRecord, ThematicArea},
    schema::MetadataSchema,
};
use ersmeta_chart::element::{CountSeries, element_count_boxplots, element_histogram};

use crate::{config::MetadataConfig, report, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MetadataArg {
    /// Directory of metadata record files
    #[arg(long, default_value = ".")]
    input: PathBuf,
    /// Metadata schema the records follow
    #[arg(long, default_value = "ersmeta_schema.json")]
    schema: PathBuf,
    /// Directory the reports are written to
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,
    /// Report configuration replacing the built-in one
    #[arg(long)]
    config: Option<PathBuf>,
}

pub(crate) fn run(arg: &MetadataArg) -> anyhow::Result<()> {
    let MetadataArg {
        input,
        schema,
        output_dir,
        config,
    } = arg;

    let config = MetadataConfig::load(config.as_deref())?;
    let schema = util::read_schema_file(schema)?;
    let records = util::read_metadata_records(input, &config.excluded_files)?;
    util::create_output_dir(output_dir)?;

    let occurrences = element::element_occurrences(&schema, &records);
    util::write_page(
        &element_histogram(&occurrences, schema.max_position()),
        output_dir,
        "element_histogram",
    )?;

    let priorities = report::presence_series(&element::priority_groups(&schema), &records);
    let chart = element_count_boxplots(
        priorities,
        Some("Element Count per Metadata Set Categorized in Priority"),
        "Element Count",
        "Element Type",
    );
    util::write_page(&chart.render(), output_dir, "element_priorities")?;

    let thematic = thematic_series(&schema, &records, &config.thematic_areas)?;
    let chart = element_count_boxplots(
        thematic,
        Some("Element Count per Metadata Set Categorized in Thematic Areas"),
        "Element Count",
        "Thematic Area",
    );
    util::write_page(&chart.render(), output_dir, "element_thematical_areas")?;

    write_cardinality(&schema, &records, output_dir)?;

    let combined = util::combine_output(output_dir)?;
    tracing::info!(
        records = records.len(),
        path = %combined.display(),
        "metadata evaluation finished"
    );
    Ok(())
}

/// Presence counts per thematic area, resolved against schema order.
pub(crate) fn thematic_series(
    schema: &MetadataSchema,
    records: &[MetadataRecord],
    areas: &[ThematicArea],
) -> anyhow::Result<Vec<CountSeries>> {
    let names = schema.element_names();
    let groups = areas
        .iter()
        .map(|area| {
            area.resolve(&names)
                .with_context(|| format!("Failed to resolve thematic area {}", area.name))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(report::presence_series(&groups, records))
}

#[expect(clippy::cast_precision_loss)]
fn write_cardinality(
    schema: &MetadataSchema,
    records: &[MetadataRecord],
    output_dir: &Path,
) -> anyhow::Result<()> {
    let elements = schema.elements_with_items();
    let table = element::item_cardinality(records, &elements);
    let series = elements
        .iter()
        .filter_map(|name| {
            let counts = table.column(name)?;
            Some(CountSeries {
                label: name.clone(),
                counts: counts.into_iter().map(|c| c as f64).collect(),
                max_possible: None,
            })
        })
        .collect();
    let chart = element_count_boxplots(
        series,
        Some("Number of items per element"),
        "Items",
        "Elements",
    );
    util::write_page(&chart.render(), output_dir, "element_cardinality")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const SCHEMA: &str = r#"{
        "properties": {
            "name": {"type": "string"},
            "description": {"type": "string"},
            "author": {"type": "array", "items": {"type": "object"}},
            "keywords": {"type": "array", "items": {"type": "string"}},
            "license": {"type": "string"}
        },
        "required": ["name"],
        "recommended": ["description", "author"]
    }"#;

    const CONFIG: &str = r#"{
        "excluded_files": ["index.html"],
        "thematic_areas": [
            {"name": "General", "first": "name", "last": "description"},
            {"name": "People", "first": "author", "last": "author"},
            {"name": "Reuse", "first": "keywords", "last": "license"}
        ]
    }"#;

    fn setup() -> (tempfile::TempDir, MetadataArg) {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("records");
        fs::create_dir(&records).unwrap();
        fs::write(
            records.join("a.json"),
            r#"{"name": "A", "author": [{"n": 1}, {"n": 2}], "keywords": ["x"]}"#,
        )
        .unwrap();
        fs::write(records.join("b.json"), r#"{"name": "B", "license": "MIT"}"#).unwrap();
        fs::write(records.join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("schema.json"), SCHEMA).unwrap();
        fs::write(dir.path().join("metadata.json"), CONFIG).unwrap();

        let arg = MetadataArg {
            input: records,
            schema: dir.path().join("schema.json"),
            output_dir: dir.path().join("results"),
            config: Some(dir.path().join("metadata.json")),
        };
        (dir, arg)
    }

    #[test]
    fn test_metadata_writes_every_chart() {
        let (_dir, arg) = setup();
        run(&arg).unwrap();
        for name in [
            "element_histogram",
            "element_priorities",
            "element_thematical_areas",
            "element_cardinality",
        ] {
            assert!(util::page_path(&arg.output_dir, name).is_file(), "{name} missing");
            let preview = arg.output_dir.join(format!("{name}.png"));
            assert!(preview.is_file(), "{name} preview missing");
        }
        let combined = lopdf::Document::load(util::combined_path(&arg.output_dir)).unwrap();
        assert_eq!(combined.get_pages().len(), 4);
        let cardinality =
            fs::read_to_string(util::page_path(&arg.output_dir, "element_cardinality")).unwrap();
        assert!(cardinality.contains("keywords"));
        assert!(cardinality.contains("Number of items per element"));
    }

    #[test]
    fn test_thematic_series() {
        let (_dir, arg) = setup();
        let schema = util::read_schema_file(&arg.schema).unwrap();
        let records = util::read_metadata_records(&arg.input, &["index.html"]).unwrap();
        let config = MetadataConfig::load(arg.config.as_deref()).unwrap();

        let series = thematic_series(&schema, &records, &config.thematic_areas).unwrap();
        let counts = series
            .iter()
            .map(|s| (s.label.as_str(), s.counts.clone(), s.max_possible))
            .collect::<Vec<_>>();
        assert_eq!(
            counts,
            vec![
                ("General", vec![1.0, 1.0], Some(2.0)),
                ("People", vec![1.0, 0.0], Some(1.0)),
                ("Reuse", vec![1.0, 1.0], Some(2.0)),
            ]
        );
    }

    #[test]
    fn test_unknown_thematic_boundary() {
        let (_dir, arg) = setup();
        let schema = util::read_schema_file(&arg.schema).unwrap();
        let areas = [ThematicArea {
            name: "Broken".to_owned(),
            first: "name".to_owned(),
            last: "funding".to_owned(),
        }];
        let err = thematic_series(&schema, &[], &areas).unwrap_err();
        assert!(format!("{err:#}").contains("funding"));
    }
}
