use anyhow::{Context, Result};
use clap::Parser;
use dataprofile_core::{load_config, ConfigOverrides, RunOutcome};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

/// With no arguments, profiles `name.basics.tsv` into `name_basics_report.html`.
#[derive(Parser, Debug)]
#[command(name = "dataprofile", version)]
#[command(about = "Generate a descriptive-statistics HTML report for a tab-separated file")]
pub struct Cli {
    /// Tab-separated input file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Report path; `.json` writes JSON instead of HTML
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Rows printed in the preview
    #[arg(long)]
    pub preview_rows: Option<usize>,

    /// Skip correlations, histograms and frequency tables
    #[arg(long)]
    pub minimal: bool,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input: self.input.clone(),
            output: self.output.clone(),
            title: self.title.clone(),
            preview_rows: self.preview_rows,
            minimal: self.minimal.then_some(true),
        }
    }
}

pub fn profile_command(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref(), &cli.overrides())
        .context("failed to load configuration")?;
    debug!("Effective configuration: {:?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match dataprofile_core::run(&config, &mut out)? {
        RunOutcome::InputMissing => info!("Nothing to do"),
        RunOutcome::ReportWritten(path) => info!("Report at {}", path.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_no_overrides() {
        let cli = Cli::try_parse_from(["dataprofile"]).unwrap();
        let overrides = cli.overrides();
        assert!(overrides.input.is_none());
        assert!(overrides.output.is_none());
        assert!(overrides.minimal.is_none());
    }

    #[test]
    fn test_flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "dataprofile",
            "-i",
            "in.tsv",
            "--output",
            "out.json",
            "--title",
            "T",
            "--preview-rows",
            "3",
            "--minimal",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.input, Some(PathBuf::from("in.tsv")));
        assert_eq!(overrides.output, Some(PathBuf::from("out.json")));
        assert_eq!(overrides.title.as_deref(), Some("T"));
        assert_eq!(overrides.preview_rows, Some(3));
        assert_eq!(overrides.minimal, Some(true));
    }
}
