use clap::{Parser, Subcommand};

use self::{
    combine::CombineArg, metadata::MetadataArg, paper::PaperArg, survey::SurveyArg,
};

mod combine;
mod metadata;
mod paper;
mod survey;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Which report to produce
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Charts and exports for the survey responses
    Survey(#[clap(flatten)] SurveyArg),
    /// Charts over a directory of metadata records
    Metadata(#[clap(flatten)] MetadataArg),
    /// The figures used in the paper
    Paper(#[clap(flatten)] PaperArg),
    /// Merge the page documents of a directory into one
    Combine(#[clap(flatten)] CombineArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Survey(arg) => survey::run(&arg)?,
        Mode::Metadata(arg) => metadata::run(&arg)?,
        Mode::Paper(arg) => paper::run(&arg)?,
        Mode::Combine(arg) => combine::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_survey_flags() {
        let args = CommandArgs::try_parse_from([
            "ersmeta-eval",
            "survey",
            "--input",
            "answers.csv",
            "--exclude-missing-metadata-experience",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::Survey(_)));
    }

    #[test]
    fn test_experience_flags_conflict() {
        let result = CommandArgs::try_parse_from([
            "ersmeta-eval",
            "survey",
            "--input",
            "answers.csv",
            "--exclude-missing-metadata-experience",
            "--only-missing-metadata-experience",
        ]);
        assert!(result.is_err());
    }
}
