//! dataprofile: descriptive-statistics reports for delimited text files

pub mod column_profiler;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod stats;

// Re-exports
pub use column_profiler::{ColumnProfiler, VariableDetails, VariableKind, VariableProfile};
pub use crate::config::{load_config, AppConfig, ConfigOverrides, LoadOptions, ProfileSettings};
pub use dataset::{Column, DataType, Dataset};
pub use errors::{ProfileError, Result};
pub use pipeline::{run, RunOutcome};
pub use profile::{Alert, AlertKind, Correlations, ProfileReport, TableStats};
pub use report::ReportFormat;

use std::path::Path;

/// Load a delimited file and profile it in one step
pub fn profile_file(
    path: impl AsRef<Path>,
    title: &str,
    load: &LoadOptions,
    settings: &ProfileSettings,
) -> Result<ProfileReport> {
    let dataset = Dataset::from_path(path, load)?;
    ProfileReport::new(&dataset, title, settings)
}
