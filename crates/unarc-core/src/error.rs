//! Error types for archive extraction operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::formats::Scheme;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur during archive extraction.
///
/// Every variant is fatal to a run under the default fail-fast policy.
/// Only [`Materialization`](Self::Materialization) and
/// [`PathTraversal`](Self::PathTraversal) are scoped to a single entry and
/// may be skipped when the continue policy is active.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file extension does not name a supported scheme.
    #[error("unsupported extension: {extension:?}")]
    UnsupportedExtension {
        /// The extension as it appeared in the file name (may be empty).
        extension: String,
    },

    /// The source archive could not be opened or inspected.
    #[error("cannot read source {}: {source}", path.display())]
    SourceUnreadable {
        /// Path of the source archive.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The compressed stream is invalid or truncated.
    #[error("{scheme} decode error: {source}")]
    Decode {
        /// Scheme whose decoder failed.
        scheme: Scheme,
        /// Underlying I/O error reported by the decoder.
        #[source]
        source: std::io::Error,
    },

    /// The archive container (tar header, zip central directory) is corrupt.
    #[error("corrupt {scheme} archive: {reason}")]
    Structural {
        /// Container scheme (`tar` for every tar-family scheme, or `zip`).
        scheme: Scheme,
        /// Description of the failure, naming the entry when known.
        reason: String,
    },

    /// Writing an entry to the filesystem failed.
    #[error("failed to create {}: {source}", path.display())]
    Materialization {
        /// Target path that could not be created or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An entry name would resolve outside the destination directory.
    #[error("path traversal detected: {}", path.display())]
    PathTraversal {
        /// The archive-internal entry name.
        path: PathBuf,
    },
}

impl ExtractionError {
    /// Returns `true` if this error concerns a single entry and the run could
    /// move on to the next one.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use unarc_core::ExtractionError;
    ///
    /// let err = ExtractionError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_entry_error());
    ///
    /// let err = ExtractionError::UnsupportedExtension {
    ///     extension: ".rar".into(),
    /// };
    /// assert!(!err.is_entry_error());
    /// ```
    #[must_use]
    pub const fn is_entry_error(&self) -> bool {
        matches!(
            self,
            Self::Materialization { .. } | Self::PathTraversal { .. }
        )
    }

    /// Returns the scheme involved in the failure, if any.
    #[must_use]
    pub const fn scheme(&self) -> Option<Scheme> {
        match self {
            Self::Decode { scheme, .. } | Self::Structural { scheme, .. } => Some(*scheme),
            _ => None,
        }
    }

    pub(crate) fn structural(scheme: Scheme, reason: impl Into<String>) -> Self {
        Self::Structural {
            scheme,
            reason: reason.into(),
        }
    }

    pub(crate) fn materialization(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Materialization {
            path: path.into(),
            source,
        }
    }
}
