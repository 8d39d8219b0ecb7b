//! Extract command implementation.

use super::run_extraction;
use crate::cli::ExtractArgs;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use std::env;
use unarc_core::formats::FormatResolver;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter, spinner: bool) -> Result<()> {
    let output_dir = match &args.outdir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    run_extraction(
        "extract",
        &args.file,
        &output_dir,
        &FormatResolver::default(),
        &args.policy.options(),
        formatter,
        spinner,
    )
}
