//! Destination directory type.

use std::fs::DirBuilder;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

/// The root directory an archive is extracted into.
///
/// Holds an absolute, canonical path to an existing directory.
///
/// # Examples
///
/// ```no_run
/// use unarc_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("/tmp/extraction", 0o755)?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Wraps an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Materialization`] if the path does not
    /// exist, is not a directory, or cannot be canonicalized.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_dir() {
            let kind = if path.exists() {
                io::ErrorKind::NotADirectory
            } else {
                io::ErrorKind::NotFound
            };
            return Err(ExtractionError::materialization(
                path,
                io::Error::new(kind, "destination is not an existing directory"),
            ));
        }

        let canonical = path
            .canonicalize()
            .map_err(|e| ExtractionError::materialization(path, e))?;

        Ok(Self(canonical))
    }

    /// Creates the directory (and missing ancestors) with `mode` if needed,
    /// then wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Materialization`] if creation fails or the
    /// path exists but is not a directory.
    pub fn create(path: impl AsRef<Path>, mode: u32) -> Result<Self> {
        let path = path.as_ref();
        dir_builder(mode)
            .create(path)
            .map_err(|e| ExtractionError::materialization(path, e))?;
        Self::new(path)
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a relative path onto this directory without validation.
    ///
    /// Use [`ExtractionTarget::resolve`](super::ExtractionTarget::resolve)
    /// for archive entry names.
    #[inline]
    #[must_use]
    pub fn join_path(&self, path: &Path) -> PathBuf {
        self.0.join(path)
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

/// Recursive directory builder applying `mode` on Unix.
pub(crate) fn dir_builder(mode: u32) -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder
}
