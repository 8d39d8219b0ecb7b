//! Core extraction engine.

use std::io::Read;
use std::io::Seek;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ExtractOptions;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::archive::ArchiveSource;
use crate::config::ErrorPolicy;
use crate::types::DestDir;

use super::Materializer;

/// Drives an [`ArchiveSource`] through the [`Materializer`].
///
/// Tar entries are materialized as they are read. Zip members are opened
/// one by one in central directory order after the whole directory has
/// been validated.
#[derive(Debug)]
pub struct ExtractionEngine<'a> {
    dest: &'a DestDir,
    options: &'a ExtractOptions,
}

impl<'a> ExtractionEngine<'a> {
    /// Creates an engine writing under `dest`.
    #[must_use]
    pub const fn new(dest: &'a DestDir, options: &'a ExtractOptions) -> Self {
        Self { dest, options }
    }

    /// Extracts every supported entry of `source`.
    ///
    /// The returned report has no scheme or duration set for sources that
    /// are not opened through [`Archive`](crate::Archive); both are filled
    /// in by the caller that knows them.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error. Under [`ErrorPolicy::Continue`],
    /// entry-scoped errors are recorded as warnings instead.
    pub fn run<R, P>(&self, source: ArchiveSource<R>, progress: &mut P) -> Result<ExtractionReport>
    where
        R: Read + Seek,
        P: ProgressCallback + ?Sized,
    {
        let started = Instant::now();
        let mut report = ExtractionReport::new();
        let mut materializer = Materializer::new(self.dest, self.options);

        info!(dest = %self.dest.as_path().display(), "extraction started");

        match source {
            ArchiveSource::Tar(mut tar) => {
                report.scheme = Some(tar.scheme());
                let mut entries = tar.entries()?;
                for entry in &mut entries {
                    let mut entry = entry?;
                    let outcome = materializer.place(&mut entry, &mut report, progress);
                    self.absorb(outcome, &mut report)?;
                }
                report.entries_skipped += entries.skipped();
            }
            ArchiveSource::Zip(mut zip) => {
                report.scheme = Some(crate::formats::Scheme::Zip);
                report.entries_skipped += zip.skipped();
                for position in 0..zip.members().len() {
                    let mut entry = zip.open_entry(position)?;
                    let outcome = materializer.place(&mut entry, &mut report, progress);
                    self.absorb(outcome, &mut report)?;
                }
            }
        }

        report.duration = started.elapsed();
        info!(
            files = report.files_extracted,
            directories = report.directories_created,
            skipped = report.entries_skipped,
            failed = report.entries_failed,
            bytes = report.bytes_written,
            "extraction finished"
        );
        progress.on_complete(&report);

        Ok(report)
    }

    /// Applies the error policy to the outcome of one entry.
    fn absorb(&self, outcome: Result<()>, report: &mut ExtractionReport) -> Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(e) if !is_fatal(&e, self.options.error_policy) => {
                warn!(error = %e, "skipping entry");
                report.entries_failed += 1;
                report.add_warning(e.to_string());
                Ok(())
            }
            Err(e) => {
                debug!(failed_layer = ?e.scheme(), error = %e, "aborting run");
                Err(e)
            }
        }
    }
}

/// Returns whether `err` would abort a run under `policy`.
#[must_use]
pub fn is_fatal(err: &ExtractionError, policy: ErrorPolicy) -> bool {
    policy == ErrorPolicy::FailFast || !err.is_entry_error()
}
