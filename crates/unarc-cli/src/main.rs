//! Unarc CLI - Command-line utility for extracting tar and zip archives.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use progress::CliProgress;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose > 0, cli.quiet);
    let spinner = CliProgress::should_show(cli.json, cli.quiet);

    let (operation, result) = match &cli.command {
        cli::Commands::Extract(args) => (
            "extract",
            commands::extract::execute(args, &*formatter, spinner),
        ),
        cli::Commands::Untar(args) => ("untar", commands::untar::execute(args, &*formatter, spinner)),
        cli::Commands::Schemes => ("schemes", commands::schemes::execute(&*formatter)),
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            ("completion", Ok(()))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(operation, error = ?err, "command failed");
            formatter.format_error(operation, &err);
            ExitCode::FAILURE
        }
    }
}
