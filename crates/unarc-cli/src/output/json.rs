//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use unarc_core::ExtractionReport;
use unarc_core::Scheme;
use unarc_core::formats::ExtensionTable;

pub struct JsonFormatter;

#[derive(Serialize)]
struct ExtractionOutput {
    scheme: Option<&'static str>,
    output_dir: String,
    files_extracted: usize,
    directories_created: usize,
    entries_skipped: usize,
    entries_failed: usize,
    bytes_written: u64,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl ExtractionOutput {
    fn new(output_dir: &Path, report: &ExtractionReport) -> Self {
        Self {
            scheme: report.scheme.map(Scheme::name),
            output_dir: output_dir.display().to_string(),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            entries_skipped: report.entries_skipped,
            entries_failed: report.entries_failed,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

#[derive(Serialize)]
struct SchemeRow<'a> {
    extension: &'a str,
    scheme: &'static str,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    // Progress events are folded into the final document.
    fn format_scheme(&self, _scheme: Scheme) {}

    fn format_directory_created(&self, _path: &Path) {}

    fn format_file_created(&self, _path: &Path, _bytes: u64) {}

    fn format_extraction_result(
        &self,
        operation: &str,
        output_dir: &Path,
        report: &ExtractionReport,
    ) -> Result<()> {
        let data = ExtractionOutput::new(output_dir, report);
        Self::output(&JsonOutput::success(operation, data))
    }

    fn format_schemes(&self, table: &ExtensionTable) -> Result<()> {
        let data: Vec<_> = table
            .iter()
            .map(|(extension, scheme)| SchemeRow {
                extension,
                scheme: scheme.name(),
            })
            .collect();
        Self::output(&JsonOutput::success("schemes", data))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
