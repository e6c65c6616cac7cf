//! Report export: HTML and JSON

mod html;

pub use html::escape_html;

use crate::profile::ProfileReport;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Output format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Json,
}

impl ReportFormat {
    /// `None` when the extension is neither HTML nor JSON
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(ReportFormat::Html),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

impl ProfileReport {
    /// Self-contained HTML document
    pub fn to_html(&self) -> Result<String> {
        html::render(self)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report to `path`, overwriting any existing file.
    ///
    /// Unknown extensions are written as HTML at the same path.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let format = ReportFormat::from_path(path).unwrap_or_else(|| {
            warn!(
                "Extension of {} not recognised, writing HTML",
                path.display()
            );
            ReportFormat::Html
        });

        let body = match format {
            ReportFormat::Html => self.to_html()?,
            ReportFormat::Json => self.to_json()?,
        };
        std::fs::write(path, body)?;
        info!("Report written to {}", path.display());
        Ok(path.to_path_buf())
    }
}
