use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ersmeta_analysis::{scoring, table::ResponseTable};
use ersmeta_chart::{element::element_count_boxplots, survey};

use super::metadata;
use crate::{
    config::{MetadataConfig, PaperConfig, SurveyConfig},
    filter::{self, ExperienceFilter},
    report, util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PaperArg {
    /// Survey export in CSV format
    #[arg(long)]
    input: PathBuf,
    /// Directory of metadata record files; the thematic-area figure is
    /// skipped without it
    #[arg(long)]
    metadata_input: Option<PathBuf>,
    /// Metadata schema the records follow
    #[arg(long, default_value = "ersmeta_schema.json")]
    schema: PathBuf,
    /// Directory the figures are written to
    #[arg(long, default_value = "paper_figures")]
    output_dir: PathBuf,
    /// Figure configuration replacing the built-in one
    #[arg(long)]
    config: Option<PathBuf>,
    /// Survey configuration replacing the built-in one
    #[arg(long)]
    survey_config: Option<PathBuf>,
    /// Metadata configuration replacing the built-in one
    #[arg(long)]
    metadata_config: Option<PathBuf>,
}

pub(crate) fn run(arg: &PaperArg) -> anyhow::Result<()> {
    let PaperArg {
        input,
        metadata_input,
        schema,
        output_dir,
        config,
        survey_config,
        metadata_config,
    } = arg;

    let config = PaperConfig::load(config.as_deref())?;
    let survey_config = SurveyConfig::load(survey_config.as_deref())?;
    util::create_output_dir(output_dir)?;

    let table = util::read_response_table(input)?;
    let mut completed = filter::completed(
        &table,
        &survey_config.progress_column,
        survey_config.completed_page,
    )?;
    for derived in &config.derived_columns {
        completed
            .add_row_mean_column(&derived.column, &derived.sources)
            .with_context(|| format!("Failed to derive column {}", derived.column))?;
    }

    for panel in &config.panels {
        report::write_likert_panel(&completed, panel, output_dir, &panel.file_name)?;
    }

    if let Some(metadata_input) = metadata_input {
        let metadata_config = MetadataConfig::load(metadata_config.as_deref())?;
        write_thematic(&config, &metadata_config, schema, metadata_input, output_dir)?;
    } else {
        tracing::info!("no metadata input given, skipping thematic areas");
    }

    write_usability(&completed, &config, &survey_config, output_dir)?;
    tracing::info!(path = %output_dir.display(), "paper figures finished");
    Ok(())
}

fn write_thematic(
    config: &PaperConfig,
    metadata_config: &MetadataConfig,
    schema: &Path,
    metadata_input: &Path,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let schema = util::read_schema_file(schema)?;
    let records = util::read_metadata_records(metadata_input, &metadata_config.excluded_files)?;
    let series = metadata::thematic_series(&schema, &records, &metadata_config.thematic_areas)?;
    let chart = element_count_boxplots(
        series,
        None,
        &config.thematic_x_label,
        &config.thematic_y_label,
    );
    util::write_page(&chart.render(), output_dir, &config.thematic_file_name)
}

/// Usability scores of all completed surveys, split by metadata experience.
fn write_usability(
    completed: &ResponseTable,
    config: &PaperConfig,
    survey_config: &SurveyConfig,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let polarities = survey_config.sus.scoring_polarities()?;
    let labels = &config.sus_series;
    let series = [
        (&labels.all, ExperienceFilter::All),
        (&labels.with_experience, ExperienceFilter::ExcludeMissing),
        (&labels.without_experience, ExperienceFilter::OnlyMissing),
    ]
    .into_iter()
    .map(|(label, experience)| {
        let rows = experience.apply(completed, &survey_config.experience)?;
        let scores = scoring::usability_score(&rows, &polarities)
            .with_context(|| format!("Failed to compute usability scores for {label}"))?;
        Ok((label.clone(), scores))
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

    let chart = survey::sus_boxplots(&series, None);
    util::write_page(&chart.render(), output_dir, &config.sus_file_name)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const SURVEY_CONFIG: &str = r#"{
        "progress_column": "lastpage",
        "completed_page": 12,
        "experience": {"column": "exp", "no_experience_answer": "No experience"},
        "profile": [],
        "participation": {"file_name": "p", "title": "P", "states": []},
        "sus": {
            "file_name": "Q11_SUS",
            "items": [
                {"column": "s1", "description": "Use often", "polarity": "favorable_high"},
                {"column": "s2", "description": "Too complex", "polarity": "favorable_low"}
            ]
        },
        "panels": [],
        "free_text": []
    }"#;

    const PAPER_CONFIG: &str = r#"{
        "derived_columns": [{"column": "d12", "sources": ["d1", "d2"]}],
        "panels": [{
            "file_name": "D_Elements",
            "items": [
                {"column": "d12", "description": "Both elements"},
                {"column": "d1", "description": "First element"}
            ],
            "groups": [{"name": "Usefulness", "columns": ["d12", "d1"]}]
        }],
        "sus_file_name": "C_SUS",
        "sus_series": {
            "all": "All participants",
            "with_experience": "With experience",
            "without_experience": "Without experience"
        },
        "thematic_file_name": "B_element_thematical_areas",
        "thematic_x_label": "Filled Elements",
        "thematic_y_label": "Thematical Areas of Elements"
    }"#;

    const ANSWERS: &str = "\
lastpage,exp,s1,s2,d1,d2
12,Some,Agree,Disagree,Agree,Strongly Agree
12,No experience,Neutral,Neutral,Disagree,
12,,Agree,Agree,,
3,Some,Agree,Agree,Agree,Agree
";

    fn setup() -> (tempfile::TempDir, PaperArg) {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name);
        fs::write(path("answers.csv"), ANSWERS).unwrap();
        fs::write(path("survey.json"), SURVEY_CONFIG).unwrap();
        fs::write(path("paper.json"), PAPER_CONFIG).unwrap();
        let arg = PaperArg {
            input: path("answers.csv"),
            metadata_input: None,
            schema: path("schema.json"),
            output_dir: path("figures"),
            config: Some(path("paper.json")),
            survey_config: Some(path("survey.json")),
            metadata_config: None,
        };
        (dir, arg)
    }

    #[test]
    fn test_paper_figures() {
        let (_dir, arg) = setup();
        run(&arg).unwrap();

        let out = &arg.output_dir;
        assert!(util::page_path(out, "D_Elements").is_file());
        assert!(!util::page_path(out, "B_element_thematical_areas").exists());
        assert!(out.join("D_Elements.png").is_file());
        assert!(!util::combined_path(out).exists());

        let sus = fs::read_to_string(util::page_path(out, "C_SUS")).unwrap();
        assert!(sus.contains("All participants (n=3)"));
        assert!(sus.contains("With experience (n=1)"));
        assert!(sus.contains("Without experience (n=1)"));
    }

    #[test]
    fn test_paper_thematic_with_metadata_input() {
        let (dir, mut arg) = setup();
        let records = dir.path().join("records");
        fs::create_dir(&records).unwrap();
        fs::write(records.join("a.json"), r#"{"name": "A"}"#).unwrap();
        fs::write(
            &arg.schema,
            r#"{"properties": {"name": {}, "license": {}}, "required": ["name"], "recommended": []}"#,
        )
        .unwrap();
        let metadata_config = dir.path().join("metadata.json");
        fs::write(
            &metadata_config,
            r#"{"excluded_files": [], "thematic_areas": [{"name": "All", "first": "name", "last": "license"}]}"#,
        )
        .unwrap();
        arg.metadata_input = Some(records);
        arg.metadata_config = Some(metadata_config);

        run(&arg).unwrap();
        let page = fs::read_to_string(util::page_path(
            &arg.output_dir,
            "B_element_thematical_areas",
        ))
        .unwrap();
        assert!(page.contains("Filled Elements"));
    }

    #[test]
    fn test_derived_column_needs_sources() {
        let (_dir, arg) = setup();
        fs::write(&arg.input, "lastpage,exp,s1,s2,d1\n12,,,,\n").unwrap();
        let err = run(&arg).unwrap_err();
        assert!(format!("{err:#}").contains("d2"));
    }
}
