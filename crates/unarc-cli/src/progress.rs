//! Progress reporting for the extracting commands.

use crate::output::OutputFormatter;
use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use std::time::Duration;
use unarc_core::ExtractionReport;
use unarc_core::ProgressCallback;
use unarc_core::Scheme;

/// Forwards extraction events to the output formatter.
///
/// When stdout is a terminal a spinner with running totals is drawn on
/// stderr; formatter lines are printed around it.
pub struct CliProgress<'a> {
    formatter: &'a dyn OutputFormatter,
    bar: Option<ProgressBar>,
    files: u64,
    bytes_written: u64,
}

impl<'a> CliProgress<'a> {
    #[must_use]
    pub fn new(formatter: &'a dyn OutputFormatter, spinner: bool) -> Self {
        let bar = spinner.then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar.set_message("Extracting");
            bar
        });

        Self {
            formatter,
            bar,
            files: 0,
            bytes_written: 0,
        }
    }

    /// Checks if we should show the spinner (TTY detection).
    #[must_use]
    pub fn should_show(json: bool, quiet: bool) -> bool {
        !json && !quiet && Term::stdout().is_term()
    }

    fn print(&self, emit: impl FnOnce(&dyn OutputFormatter)) {
        match &self.bar {
            Some(bar) => bar.suspend(|| emit(self.formatter)),
            None => emit(self.formatter),
        }
    }
}

impl Drop for CliProgress<'_> {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ProgressCallback for CliProgress<'_> {
    fn on_scheme_detected(&mut self, scheme: Scheme) {
        self.print(|f| f.format_scheme(scheme));
    }

    fn on_directory_created(&mut self, path: &Path) {
        self.print(|f| f.format_directory_created(path));
    }

    fn on_file_created(&mut self, path: &Path, bytes: u64) {
        self.files += 1;
        self.bytes_written = self.bytes_written.saturating_add(bytes);
        self.print(|f| f.format_file_created(path, bytes));
        if let Some(bar) = &self.bar {
            bar.set_message(format!(
                "Extracting: {} files, {}",
                self.files,
                indicatif::HumanBytes(self.bytes_written)
            ));
        }
    }

    fn on_complete(&mut self, _report: &ExtractionReport) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
