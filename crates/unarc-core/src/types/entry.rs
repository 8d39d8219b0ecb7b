//! Archive entries as produced by the structural extractors.

use std::io::Read;
use std::io::{self};
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::formats::Scheme;
use crate::io::FaultFlag;

use super::EntryKind;

/// Permission bits kept from an archive entry's mode.
pub const PERMISSION_MASK: u32 = 0o777;

/// Metadata of one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Archive-internal path, `/`-separated, not yet joined to a destination.
    pub path: PathBuf,
    /// Directory or regular file.
    pub kind: EntryKind,
    /// POSIX permission bits (masked with [`PERMISSION_MASK`]).
    pub mode: u32,
    /// Uncompressed payload size in bytes.
    pub size: u64,
}

impl EntryHeader {
    /// Creates a header, masking `mode` down to its permission bits.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind, mode: u32, size: u64) -> Self {
        Self {
            path: path.into(),
            kind,
            mode: mode & PERMISSION_MASK,
            size,
        }
    }
}

/// Where an entry's payload stream comes from.
///
/// Used to classify read failures while a payload is being copied: a tar
/// payload that breaks because the decompressor failed is a decode error,
/// anything else is a corrupt container.
#[derive(Debug, Clone)]
pub enum EntryOrigin {
    /// Forward-only tar stream decoded with `scheme`.
    Tar {
        /// Scheme of the run (`tar` or one of the compressed schemes).
        scheme: Scheme,
        /// Tripped when the decoded stream itself has failed.
        fault: FaultFlag,
    },
    /// Independently opened zip member.
    Zip,
}

impl EntryOrigin {
    /// Maps a read failure to the matching [`ExtractionError`].
    #[must_use]
    pub fn read_error(&self, entry: Option<&Path>, source: io::Error) -> ExtractionError {
        let reason = match entry {
            Some(path) => format!("entry {}: {source}", path.display()),
            None => source.to_string(),
        };
        match self {
            Self::Tar { scheme, fault } if fault.is_tripped() => ExtractionError::Decode {
                scheme: *scheme,
                source,
            },
            Self::Tar { .. } => ExtractionError::structural(Scheme::Tar, reason),
            Self::Zip => ExtractionError::structural(Scheme::Zip, reason),
        }
    }
}

/// An entry together with a reader over its payload.
///
/// For tar the reader borrows the archive stream and is only valid until
/// the next entry is requested; for zip each member is opened on its own.
pub struct ArchiveEntry<R> {
    header: EntryHeader,
    reader: R,
    origin: EntryOrigin,
}

impl<R: Read> ArchiveEntry<R> {
    /// Bundles a header with its payload reader.
    #[must_use]
    pub fn new(header: EntryHeader, reader: R, origin: EntryOrigin) -> Self {
        Self {
            header,
            reader,
            origin,
        }
    }

    /// Returns the entry metadata.
    #[must_use]
    pub fn header(&self) -> &EntryHeader {
        &self.header
    }

    /// Archive-internal path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.header.path
    }

    /// Entry kind.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.header.kind
    }

    /// Origin used to classify payload read failures.
    #[must_use]
    pub fn origin(&self) -> &EntryOrigin {
        &self.origin
    }

    /// Mutable access to the payload reader.
    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

impl<R> std::fmt::Debug for ArchiveEntry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("header", &self.header)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
