//! Extraction run reporting.

use std::path::Path;
use std::time::Duration;

use crate::formats::Scheme;

/// Report of an archive extraction run.
///
/// Contains statistics and metadata about the extraction process.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Scheme resolved from the source file name.
    pub scheme: Option<Scheme>,

    /// Number of files written.
    pub files_extracted: usize,

    /// Number of directories that did not exist before the run.
    pub directories_created: usize,

    /// Number of entries dropped because of their kind (links, devices, ...).
    pub entries_skipped: usize,

    /// Number of entries that failed under the continue error policy.
    pub entries_failed: usize,

    /// Total payload bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the run.
    pub duration: Duration,

    /// Warnings generated during extraction.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns the number of filesystem objects created.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Callback trait for progress reporting during extraction.
///
/// Every filesystem object the run creates is announced exactly once. The
/// trait requires `Send` so a callback can be handed to another thread
/// between runs.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use unarc_core::ExtractionReport;
/// use unarc_core::ProgressCallback;
/// use unarc_core::formats::Scheme;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_scheme_detected(&mut self, scheme: Scheme) {
///         println!("Detected {scheme:?} compression.");
///     }
///
///     fn on_directory_created(&mut self, path: &Path) {
///         println!("Created folder {}.", path.display());
///     }
///
///     fn on_file_created(&mut self, path: &Path, bytes: u64) {
///         println!("Created file {} ({bytes} bytes).", path.display());
///     }
///
///     fn on_complete(&mut self, report: &ExtractionReport) {
///         println!("{} items", report.total_items());
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called once the source's scheme is known, before anything is read.
    fn on_scheme_detected(&mut self, scheme: Scheme);

    /// Called after a directory was created.
    ///
    /// # Arguments
    ///
    /// * `path` - Absolute path of the new directory
    fn on_directory_created(&mut self, path: &Path);

    /// Called after a file was fully written.
    ///
    /// # Arguments
    ///
    /// * `path` - Absolute path of the file
    /// * `bytes` - Payload bytes written
    fn on_file_created(&mut self, path: &Path, bytes: u64);

    /// Called when the run finished successfully.
    fn on_complete(&mut self, report: &ExtractionReport);
}

/// No-op implementation of `ProgressCallback` that does nothing.
///
/// Use this when you don't need progress reporting but the API requires
/// a callback implementation.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_scheme_detected(&mut self, _scheme: Scheme) {}

    fn on_directory_created(&mut self, _path: &Path) {}

    fn on_file_created(&mut self, _path: &Path, _bytes: u64) {}

    fn on_complete(&mut self, _report: &ExtractionReport) {}
}
