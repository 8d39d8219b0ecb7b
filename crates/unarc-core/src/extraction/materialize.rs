//! Writing archive entries to the filesystem.

use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::ExtractOptions;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::CopyError;
use crate::copy::copy_with_buffer;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryKind;
use crate::types::ExtractionTarget;
use crate::types::dest_dir::dir_builder;

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Places entries under a destination root.
///
/// Directories are created with the configured directory mode. Files are
/// opened create+write+truncate, so extracting over a previous run leaves
/// exactly the archived bytes. Every new filesystem object is recorded in
/// the report and announced to the progress callback.
#[derive(Debug)]
pub struct Materializer<'a> {
    dest: &'a DestDir,
    options: &'a ExtractOptions,
    buffer: Box<CopyBuffer>,
}

impl<'a> Materializer<'a> {
    /// Creates a materializer writing under `dest`.
    #[must_use]
    pub fn new(dest: &'a DestDir, options: &'a ExtractOptions) -> Self {
        Self {
            dest,
            options,
            buffer: Box::default(),
        }
    }

    /// Materializes one entry.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::PathTraversal`] if the path policy rejects the
    ///   entry name
    /// - [`ExtractionError::Materialization`] if a directory or file cannot
    ///   be created or written
    /// - [`ExtractionError::Decode`] or [`ExtractionError::Structural`] if
    ///   the payload stream fails while it is copied
    pub fn place<R, P>(
        &mut self,
        entry: &mut ArchiveEntry<R>,
        report: &mut ExtractionReport,
        progress: &mut P,
    ) -> Result<()>
    where
        R: Read,
        P: ProgressCallback + ?Sized,
    {
        let target = ExtractionTarget::resolve(entry.path(), self.dest, self.options.path_policy)?;

        match entry.kind() {
            EntryKind::Directory => self.ensure_dir(target.as_path(), report, progress),
            EntryKind::RegularFile => self.write_file(entry, target.as_path(), report, progress),
        }
    }

    /// Creates `path` and any missing ancestors, reporting each new one.
    fn ensure_dir<P>(
        &self,
        path: &Path,
        report: &mut ExtractionReport,
        progress: &mut P,
    ) -> Result<()>
    where
        P: ProgressCallback + ?Sized,
    {
        let missing = missing_ancestors(path)?;

        dir_builder(self.options.dir_mode)
            .create(path)
            .map_err(|e| ExtractionError::materialization(path, e))?;

        for dir in missing.iter().rev() {
            set_mode(dir, self.options.dir_mode)?;
            debug!(path = %dir.display(), "created directory");
            report.directories_created += 1;
            progress.on_directory_created(dir);
        }
        Ok(())
    }

    fn write_file<R, P>(
        &mut self,
        entry: &mut ArchiveEntry<R>,
        target: &Path,
        report: &mut ExtractionReport,
        progress: &mut P,
    ) -> Result<()>
    where
        R: Read,
        P: ProgressCallback + ?Sized,
    {
        let mode = self.options.file_mode(entry.header().mode);

        let file = match open_truncating(target, mode) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = target.parent() {
                    self.ensure_dir(parent, report, progress)?;
                }
                open_truncating(target, mode)
                    .map_err(|e| ExtractionError::materialization(target, e))?
            }
            Err(e) => return Err(ExtractionError::materialization(target, e)),
        };

        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
        let bytes = copy_with_buffer(entry.reader_mut(), &mut writer, &mut self.buffer).map_err(
            |e| match e {
                CopyError::Read(source) => entry.origin().read_error(Some(entry.path()), source),
                CopyError::Write(source) => ExtractionError::materialization(target, source),
            },
        )?;
        writer
            .flush()
            .map_err(|e| ExtractionError::materialization(target, e))?;
        drop(writer);

        set_mode(target, mode)?;

        debug!(path = %target.display(), bytes, "created file");
        report.files_extracted += 1;
        report.bytes_written = report.bytes_written.saturating_add(bytes);
        progress.on_file_created(target, bytes);
        Ok(())
    }
}

/// Returns `path` and its ancestors that do not exist yet, deepest first.
fn missing_ancestors(path: &Path) -> Result<Vec<PathBuf>> {
    let mut missing = Vec::new();
    let mut cursor = Some(path);

    while let Some(dir) = cursor {
        match dir.symlink_metadata() {
            Ok(_) => break,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                missing.push(dir.to_path_buf());
                cursor = dir.parent();
            }
            Err(e) => return Err(ExtractionError::materialization(dir, e)),
        }
    }

    Ok(missing)
}

fn open_truncating(path: &Path, mode: u32) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path)
}

/// Applies `mode` explicitly; the mode given at creation is filtered by the
/// umask and ignored for files that already existed.
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .map_err(|e| ExtractionError::materialization(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = (path, mode);
    Ok(())
}
