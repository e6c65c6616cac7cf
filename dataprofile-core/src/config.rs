//! Layered configuration: built-in defaults, optional file, environment, overrides.

use crate::{ProfileError, Result};
use ::config as config_rs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "name.basics.tsv";
pub const DEFAULT_OUTPUT_PATH: &str = "name_basics_report.html";
pub const DEFAULT_TITLE: &str = "IMDB Data Profiling Report";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Environment variable prefix, e.g. `DATAPROFILE_OUTPUT` or `DATAPROFILE_PROFILE__MINIMAL`.
pub const ENV_PREFIX: &str = "DATAPROFILE";

/// Top-level configuration for a profiling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub preview_rows: usize,
    pub load: LoadOptions,
    pub profile: ProfileSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            title: DEFAULT_TITLE.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            load: LoadOptions::default(),
            profile: ProfileSettings::default(),
        }
    }
}

/// How the delimited input is parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Single-byte field delimiter
    pub delimiter: String,
    /// Honour `"` quoting around fields
    pub quoting: bool,
    pub has_headers: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: "\t".to_string(),
            quoting: true,
            has_headers: true,
        }
    }
}

impl LoadOptions {
    pub fn tsv() -> Self {
        Self::default()
    }

    pub fn csv() -> Self {
        Self {
            delimiter: ",".to_string(),
            ..Self::default()
        }
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => Err(ProfileError::Configuration(format!(
                "delimiter must be a single byte, got {:?}",
                self.delimiter
            ))),
        }
    }
}

/// Knobs of the profiler itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    /// Skip correlations, histograms and frequency tables
    pub minimal: bool,
    /// Rows kept for the head and tail samples
    pub sample_rows: usize,
    /// Entries kept in each most-frequent-values table
    pub n_frequent: usize,
    /// Text columns with at most this many distinct values are categorical
    pub categorical_threshold: usize,
    pub histogram_max_bins: usize,
    pub missing_alert_threshold: f64,
    pub zeros_alert_threshold: f64,
    pub skewness_alert_threshold: f64,
    pub correlation_threshold: f64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            minimal: false,
            sample_rows: 10,
            n_frequent: 10,
            categorical_threshold: 50,
            histogram_max_bins: 50,
            missing_alert_threshold: 0.2,
            zeros_alert_threshold: 0.1,
            skewness_alert_threshold: 20.0,
            correlation_threshold: 0.9,
        }
    }
}

impl ProfileSettings {
    pub fn minimal() -> Self {
        Self {
            minimal: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_max_bins == 0 {
            return Err(ProfileError::Configuration(
                "histogram_max_bins must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("missing_alert_threshold", self.missing_alert_threshold),
            ("zeros_alert_threshold", self.zeros_alert_threshold),
            ("correlation_threshold", self.correlation_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProfileError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Values given on the command line; they take precedence over everything else
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub preview_rows: Option<usize>,
    pub minimal: Option<bool>,
}

/// Build the effective configuration.
///
/// Precedence, lowest first: defaults, `config_file`, `DATAPROFILE_*` environment
/// variables, `overrides`.
pub fn load_config(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<AppConfig> {
    let mut builder =
        config_rs::Config::builder().add_source(config_rs::Config::try_from(&AppConfig::default())?);

    if let Some(path) = config_file {
        builder = builder.add_source(config_rs::File::from(path).required(true));
    }

    builder = builder.add_source(
        config_rs::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    if let Some(input) = &overrides.input {
        builder = builder.set_override("input", input.to_string_lossy().into_owned())?;
    }
    if let Some(output) = &overrides.output {
        builder = builder.set_override("output", output.to_string_lossy().into_owned())?;
    }
    if let Some(title) = &overrides.title {
        builder = builder.set_override("title", title.clone())?;
    }
    if let Some(rows) = overrides.preview_rows {
        builder = builder.set_override("preview_rows", rows as u64)?;
    }
    if let Some(minimal) = overrides.minimal {
        builder = builder.set_override("profile.minimal", minimal)?;
    }

    let cfg: AppConfig = builder.build()?.try_deserialize()?;
    cfg.load.delimiter_byte()?;
    cfg.profile.validate()?;
    Ok(cfg)
}
