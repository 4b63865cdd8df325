use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ersmeta_analysis::{scoring, table::ResponseTable};
use ersmeta_chart::survey;

use crate::{
    config::{ProfileSection, SurveyConfig},
    filter::{self, ExperienceFilter},
    provenance::RunProvenance,
    report, util,
};

const ALL_PARTICIPANTS: &str = " (all survey participants)";
const FULL_PARTICIPANTS: &str = " (Full survey participants)";

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SurveyArg {
    /// Survey export in CSV format
    #[arg(long)]
    input: PathBuf,
    /// Directory the reports are written to
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,
    /// Drop participants without metadata-schema experience
    #[arg(long, conflicts_with = "only_missing_metadata_experience")]
    exclude_missing_metadata_experience: bool,
    /// Keep only participants without metadata-schema experience
    #[arg(long)]
    only_missing_metadata_experience: bool,
    /// Report configuration replacing the built-in one
    #[arg(long)]
    config: Option<PathBuf>,
}

pub(crate) fn run(arg: &SurveyArg) -> anyhow::Result<()> {
    let SurveyArg {
        input,
        output_dir,
        exclude_missing_metadata_experience,
        only_missing_metadata_experience,
        config,
    } = arg;

    let config = SurveyConfig::load(config.as_deref())?;
    let experience = ExperienceFilter::from_flags(
        *exclude_missing_metadata_experience,
        *only_missing_metadata_experience,
    );

    util::create_output_dir(output_dir)?;
    RunProvenance::collect(Some(input), None, experience).write(output_dir)?;

    let table = util::read_response_table(input)?;

    write_profile(&table, &config.profile, "A_", ALL_PARTICIPANTS, output_dir)?;
    report::write_participation(
        &table,
        &config.progress_column,
        &config.participation,
        output_dir,
        &format!("B_{}", config.participation.file_name),
    )?;

    let selected = experience.apply(&table, &config.experience)?;
    let completed = filter::completed(&selected, &config.progress_column, config.completed_page)?;
    tracing::info!(
        participants = table.len(),
        completed = completed.len(),
        "evaluating completed surveys"
    );

    write_profile(&completed, &config.profile, "C_", FULL_PARTICIPANTS, output_dir)?;
    write_usability(&completed, &config, output_dir)?;

    for panel in &config.panels {
        report::write_likert_panel(
            &completed,
            panel,
            output_dir,
            &format!("{}_stats", panel.file_name),
        )?;
        if panel.aggregate {
            report::write_mean_value_panel(
                &completed,
                panel,
                output_dir,
                &format!("{}_aggregated", panel.file_name),
            )?;
        }
    }

    for text in &config.free_text {
        report::write_free_text(&completed, text, "", output_dir, &text.file_name)?;
    }

    let combined = util::combine_output(output_dir)?;
    tracing::info!(path = %combined.display(), "survey evaluation finished");
    Ok(())
}

fn write_profile(
    table: &ResponseTable,
    sections: &[ProfileSection],
    prefix: &str,
    suffix: &str,
    output_dir: &Path,
) -> anyhow::Result<()> {
    for section in sections {
        let name = |file_name: &str, kind: &str| {
            format!("{prefix}{}_{file_name}{kind}", section.name)
        };
        for pie in &section.pies {
            report::write_column_pie(
                table,
                pie,
                suffix,
                output_dir,
                &name(&pie.file_name, "_pie_chart"),
            )?;
        }
        for bar in &section.bars {
            report::write_yes_counts(
                table,
                bar,
                suffix,
                output_dir,
                &name(&bar.file_name, "_bar_chart"),
            )?;
        }
        for text in &section.texts {
            report::write_free_text(
                table,
                text,
                suffix,
                output_dir,
                &name(&text.file_name, "_values"),
            )?;
        }
    }
    Ok(())
}

fn write_usability(
    table: &ResponseTable,
    config: &SurveyConfig,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let sus = &config.sus;
    report::write_likert_panel(table, sus, output_dir, &format!("{}_stats", sus.file_name))?;

    let polarities = sus.scoring_polarities()?;
    let scores = scoring::usability_score(table, &polarities)
        .context("Failed to compute usability scores")?;
    let chart = survey::sus_boxplots(&[("All participants".to_owned(), scores)], None);
    util::write_page(&chart.render(), output_dir, &format!("{}_sus", sus.file_name))
}
