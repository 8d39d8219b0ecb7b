//! High-level public API for archive extraction.

use std::path::Path;

use tracing::info;

use crate::Archive;
use crate::ExtractOptions;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::formats::FormatResolver;
use crate::report::NoopProgress;
use crate::types::DestDir;

/// Extracts an archive to the specified output directory.
///
/// The scheme is resolved from the file name with the standard extension
/// table. The output directory is created if missing. Uses
/// [`ExtractOptions::default`].
///
/// # Errors
///
/// Returns an error if:
/// - The extension is not supported
/// - The archive file cannot be opened
/// - The compressed stream or the container is corrupt
/// - An entry cannot be written
///
/// # Examples
///
/// ```no_run
/// use unarc_core::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = extract_archive("archive.tar.gz", "/tmp/output")?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
) -> Result<ExtractionReport> {
    extract_archive_with_options(archive_path, output_dir, &ExtractOptions::default())
}

/// Extracts an archive with explicit options.
///
/// # Errors
///
/// See [`extract_archive`].
pub fn extract_archive_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    options: &ExtractOptions,
) -> Result<ExtractionReport> {
    extract_archive_with_progress(archive_path, output_dir, options, &mut NoopProgress)
}

/// Extracts an archive, reporting every created path to `progress`.
///
/// # Errors
///
/// See [`extract_archive`].
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use unarc_core::formats::Scheme;
/// use unarc_core::{ExtractOptions, ExtractionReport, ProgressCallback};
/// use unarc_core::extract_archive_with_progress;
///
/// struct Log;
///
/// impl ProgressCallback for Log {
///     fn on_scheme_detected(&mut self, scheme: Scheme) {
///         println!("Detected \"{scheme}\" compression.");
///     }
///     fn on_directory_created(&mut self, path: &Path) {
///         println!("Created folder \"{}\".", path.display());
///     }
///     fn on_file_created(&mut self, path: &Path, _bytes: u64) {
///         println!("Created file \"{}\".", path.display());
///     }
///     fn on_complete(&mut self, _report: &ExtractionReport) {}
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// extract_archive_with_progress("data.tgz", "out", &ExtractOptions::default(), &mut Log)?;
/// # Ok(())
/// # }
/// ```
pub fn extract_archive_with_progress<P, Q, C>(
    archive_path: P,
    output_dir: Q,
    options: &ExtractOptions,
    progress: &mut C,
) -> Result<ExtractionReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    C: ProgressCallback + ?Sized,
{
    extract_with(
        archive_path.as_ref(),
        output_dir.as_ref(),
        &FormatResolver::default(),
        options,
        progress,
    )
}

/// Extracts an archive resolving its scheme through `resolver`.
///
/// Scheme resolution, opening the source and validating its header all
/// happen before the output directory is created.
///
/// # Errors
///
/// See [`extract_archive`].
pub fn extract_with<C>(
    archive_path: &Path,
    output_dir: &Path,
    resolver: &FormatResolver<'_>,
    options: &ExtractOptions,
    progress: &mut C,
) -> Result<ExtractionReport>
where
    C: ProgressCallback + ?Sized,
{
    info!(
        archive = %archive_path.display(),
        output = %output_dir.display(),
        "extracting archive"
    );
    let archive = Archive::open_with(archive_path, resolver, progress)?;
    let dest = DestDir::create(output_dir, options.dir_mode)?;
    archive.extract_to(&dest, options, progress)
}
