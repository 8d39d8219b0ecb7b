//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use unarc_core::ExtractionReport;
use unarc_core::Scheme;
use unarc_core::formats::ExtensionTable;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        if !self.quiet {
            let _ = self.term.write_line(text);
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn plural(n: usize, one: &str, many: &str) -> String {
        if n == 1 {
            format!("{n} {one}")
        } else {
            format!("{n} {many}")
        }
    }

    fn summary(report: &ExtractionReport, output_dir: &Path) -> String {
        format!(
            "Extracted {} and {} ({}) into \"{}\".",
            Self::plural(report.files_extracted, "file", "files"),
            Self::plural(report.directories_created, "folder", "folders"),
            Self::format_size(report.bytes_written),
            output_dir.display()
        )
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_scheme(&self, scheme: Scheme) {
        self.line(&format!("Detected \"{scheme}\" compression."));
    }

    fn format_directory_created(&self, path: &Path) {
        self.line(&format!("Created folder \"{}\".", path.display()));
    }

    fn format_file_created(&self, path: &Path, _bytes: u64) {
        self.line(&format!("Created file \"{}\".", path.display()));
    }

    fn format_extraction_result(
        &self,
        _operation: &str,
        output_dir: &Path,
        report: &ExtractionReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let summary = Self::summary(report, output_dir);
        if self.use_colors {
            self.line(&format!("{} {summary}", style("✓").green().bold()));
        } else {
            self.line(&summary);
        }

        if report.entries_skipped > 0 {
            self.line(&format!(
                "  Skipped: {} (unsupported entry types)",
                report.entries_skipped
            ));
        }
        if report.entries_failed > 0 {
            self.line(&format!("  Failed: {}", report.entries_failed));
        }
        if self.verbose {
            self.line(&format!("  Duration: {:?}", report.duration));
        }

        if report.has_warnings() {
            if self.use_colors {
                self.line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                self.line("Warnings:");
            }
            for warning in &report.warnings {
                self.line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_schemes(&self, table: &ExtensionTable) -> Result<()> {
        let rows: Vec<_> = table.iter().collect();
        let width = rows.iter().map(|(ext, _)| ext.len()).max().unwrap_or(0);
        for (extension, scheme) in rows {
            self.term
                .write_line(&format!("{extension:<width$}  {scheme}"))?;
        }
        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}
