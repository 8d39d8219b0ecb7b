//! Subcommand implementations.

pub mod completion;
pub mod extract;
pub mod schemes;
pub mod untar;

use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use std::path::Path;
use unarc_core::ExtractOptions;
use unarc_core::api::extract_with;
use unarc_core::formats::FormatResolver;

/// Runs one extraction, streaming events to `formatter` and printing the
/// result once the run finished.
fn run_extraction(
    operation: &str,
    archive: &Path,
    output_dir: &Path,
    resolver: &FormatResolver<'_>,
    options: &ExtractOptions,
    formatter: &dyn OutputFormatter,
    spinner: bool,
) -> Result<()> {
    let mut progress = CliProgress::new(formatter, spinner);
    let report = add_archive_context(
        extract_with(archive, output_dir, resolver, options, &mut progress),
        archive,
    )?;
    drop(progress);

    formatter.format_extraction_result(operation, output_dir, &report)
}
