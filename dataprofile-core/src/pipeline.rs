//! Check, load, preview, profile, write

use crate::config::AppConfig;
use crate::dataset::Dataset;
use crate::profile::ProfileReport;
use crate::Result;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

pub const NOT_FOUND_MESSAGE: &str = "❌ Error: File not found! Check the file path.";
pub const FOUND_MESSAGE: &str = "✅ File found. Proceeding with data loading...";
pub const SUCCESS_PREFIX: &str = "✅ Report Generated Successfully! Saved at: ";

/// Which branch a run took
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The input path did not name a file; nothing was read or written
    InputMissing,
    ReportWritten(PathBuf),
}

/// Run the whole pipeline, printing user-facing messages to `out`.
///
/// A missing input file is reported on `out` and is not an error. Every other
/// failure is returned to the caller.
pub fn run<W: Write>(config: &AppConfig, out: &mut W) -> Result<RunOutcome> {
    if !config.input.is_file() {
        warn!("Input {} does not exist", config.input.display());
        writeln!(out, "{}", NOT_FOUND_MESSAGE)?;
        return Ok(RunOutcome::InputMissing);
    }
    writeln!(out, "{}", FOUND_MESSAGE)?;

    let dataset = Dataset::from_path(&config.input, &config.load)?;
    writeln!(out, "{}", dataset.preview(config.preview_rows))?;

    let report = ProfileReport::new(&dataset, &config.title, &config.profile)?;
    let written = report.to_file(&config.output)?;

    writeln!(out, "{}{}", SUCCESS_PREFIX, config.output.display())?;
    info!("Finished profiling {}", config.input.display());
    Ok(RunOutcome::ReportWritten(written))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> AppConfig {
        AppConfig {
            input: dir.path().join("input.tsv"),
            output: dir.path().join("report.html"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_missing_input_stops_early() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let mut out = Vec::new();

        let outcome = run(&config, &mut out).unwrap();

        assert_eq!(outcome, RunOutcome::InputMissing);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", NOT_FOUND_MESSAGE));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            input: dir.path().to_path_buf(),
            ..config_in(&dir)
        };
        let mut out = Vec::new();
        assert_eq!(run(&config, &mut out).unwrap(), RunOutcome::InputMissing);
    }

    #[test]
    fn test_success_prints_preview_and_path() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(&config.input, "nconst\tbirthYear\nnm1\t1899\nnm2\t1924\n").unwrap();
        let mut out = Vec::new();

        let outcome = run(&config, &mut out).unwrap();

        assert_eq!(outcome, RunOutcome::ReportWritten(config.output.clone()));
        let printed = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines[0], FOUND_MESSAGE);
        assert!(printed.contains("[2 rows x 2 columns]"));
        assert_eq!(
            lines.last().copied().unwrap(),
            format!("{}{}", SUCCESS_PREFIX, config.output.display())
        );
    }

    #[test]
    fn test_unknown_extension_keeps_configured_path() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            output: dir.path().join("report.txt"),
            ..config_in(&dir)
        };
        std::fs::write(&config.input, "nconst\tbirthYear\nnm1\t1899\n").unwrap();
        let mut out = Vec::new();

        let outcome = run(&config, &mut out).unwrap();

        assert_eq!(outcome, RunOutcome::ReportWritten(config.output.clone()));
        assert!(config.output.is_file());
        assert!(!dir.path().join("report.html").exists());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains(&format!("{}{}", SUCCESS_PREFIX, config.output.display())));
    }

    #[test]
    fn test_malformed_input_propagates() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(&config.input, "a\tb\n1\n").unwrap();
        let mut out = Vec::new();

        assert!(run(&config, &mut out).is_err());
        assert!(!config.output.exists());
    }
}
