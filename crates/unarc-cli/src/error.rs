//! Error conversion utilities for CLI.
//!
//! Converts unarc-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use unarc_core::ExtractionError;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, archive: &Path) -> anyhow::Error {
    match err {
        ExtractionError::UnsupportedExtension { extension } => {
            let shown = if extension.is_empty() {
                "no extension".to_string()
            } else {
                format!("extension '{extension}'")
            };
            anyhow!(
                "Cannot extract '{}': {shown} is not supported\n\
                 HINT: Run `unarc schemes` to list the supported extensions.",
                archive.display()
            )
        }
        ExtractionError::SourceUnreadable { source, .. } => {
            if source.kind() == std::io::ErrorKind::NotFound {
                anyhow!("The file '{}' does not exist.", archive.display())
            } else {
                anyhow!("Cannot read '{}': {source}", archive.display())
            }
        }
        ExtractionError::Decode { scheme, source } => {
            anyhow!(
                "Failed to decompress '{}' as {scheme}: {source}\n\
                 HINT: The file may be truncated, or its extension may not match its content.",
                archive.display()
            )
        }
        ExtractionError::Structural { scheme, reason } => {
            anyhow!(
                "Invalid {scheme} archive '{}': {reason}\n\
                 HINT: The archive may be corrupted or malformed.",
                archive.display()
            )
        }
        ExtractionError::PathTraversal { path } => {
            anyhow!(
                "Archive '{}' contains an entry outside the output directory: '{}'\n\
                 HINT: Use --allow-escape to extract it anyway (only for trusted archives).",
                archive.display(),
                path.display()
            )
        }
        ExtractionError::Materialization { path, source } => {
            anyhow!(
                "Cannot write '{}' while extracting '{}': {source}\n\
                 HINT: Use --keep-going to skip entries that cannot be written.",
                path.display(),
                archive.display()
            )
        }
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ExtractionError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, archive))
}
