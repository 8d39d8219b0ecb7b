//! Schemes command implementation.

use crate::output::OutputFormatter;
use anyhow::Result;
use unarc_core::formats::ExtensionTable;

pub fn execute(formatter: &dyn OutputFormatter) -> Result<()> {
    formatter.format_schemes(ExtensionTable::standard())
}
