//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;
use unarc_core::ExtractOptions;
use unarc_core::config::ErrorPolicy;
use unarc_core::config::PathPolicy;

#[derive(Parser)]
#[command(name = "unarc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract an archive into a directory
    Extract(ExtractArgs),
    /// Extract an archive into a folder named after it
    Untar(UntarArgs),
    /// List the supported file extensions
    Schemes,
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(short, long, value_name = "ARCHIVE")]
    pub file: PathBuf,

    /// Output directory (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(clap::Args)]
pub struct UntarArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Flags shared by the extracting subcommands.
#[derive(clap::Args, Clone, Copy)]
pub struct PolicyArgs {
    /// Honour `..` in entry names even if they leave the output directory
    #[arg(long)]
    pub allow_escape: bool,

    /// Skip entries that cannot be written instead of aborting
    #[arg(long)]
    pub keep_going: bool,
}

impl PolicyArgs {
    pub fn options(self) -> ExtractOptions {
        let path_policy = if self.allow_escape {
            PathPolicy::Verbatim
        } else {
            PathPolicy::Contained
        };
        let error_policy = if self.keep_going {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::FailFast
        };
        ExtractOptions::default()
            .with_path_policy(path_policy)
            .with_error_policy(error_policy)
    }
}
