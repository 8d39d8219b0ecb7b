//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use unarc_core::ExtractionReport;
use unarc_core::Scheme;
use unarc_core::formats::ExtensionTable;

/// Common output formatter trait.
///
/// The `*_created` and `format_scheme` methods are called while the run is
/// in progress; the `format_*_result` methods once it finished.
pub trait OutputFormatter: Send + Sync {
    /// The scheme of the source was resolved.
    fn format_scheme(&self, scheme: Scheme);

    /// A directory was created.
    fn format_directory_created(&self, path: &Path);

    /// A file was written.
    fn format_file_created(&self, path: &Path, bytes: u64);

    /// Format extraction result
    fn format_extraction_result(
        &self,
        operation: &str,
        output_dir: &Path,
        report: &ExtractionReport,
    ) -> Result<()>;

    /// Format the extension table
    fn format_schemes(&self, table: &ExtensionTable) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
