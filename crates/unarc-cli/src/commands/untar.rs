//! Untar command implementation.
//!
//! Extracts into a folder of the current directory named after the archive:
//! `release.tar.gz` goes to `./release`. Only tar-family extensions are
//! accepted; zip files go through `extract`.

use super::run_extraction;
use crate::cli::UntarArgs;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use std::env;
use std::path::Path;
use std::path::PathBuf;
use unarc_core::formats::ExtensionTable;
use unarc_core::formats::FormatResolver;

pub fn execute(args: &UntarArgs, formatter: &dyn OutputFormatter, spinner: bool) -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    let output_dir = output_dir_for(&args.archive, &cwd)?;
    let table = tar_table();

    run_extraction(
        "untar",
        &args.archive,
        &output_dir,
        &FormatResolver::new(&table),
        &args.policy.options(),
        formatter,
        spinner,
    )
}

/// The standard table without its container-only extensions.
fn tar_table() -> ExtensionTable {
    ExtensionTable::from_entries(
        ExtensionTable::standard()
            .iter()
            .filter(|(_, scheme)| scheme.is_tar_family()),
    )
}

/// Joins the archive's file name, cut at its first `.`, onto `cwd`.
fn output_dir_for(archive: &Path, cwd: &Path) -> Result<PathBuf> {
    let name = archive
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    if stem.is_empty() {
        bail!(
            "Cannot derive an output folder from '{}'\n\
             HINT: Use `unarc extract --file <ARCHIVE> --outdir <DIR>` instead.",
            archive.display()
        );
    }
    Ok(cwd.join(stem))
}
