//! Archive entry kind enumeration.

/// Kind of an archive entry that unarc materializes.
///
/// Structural extractors only ever yield these two kinds; links, devices,
/// FIFOs and extension records are dropped before an entry is produced.
///
/// # Examples
///
/// ```
/// use unarc_core::types::EntryKind;
///
/// assert!(EntryKind::Directory.is_directory());
/// assert!(EntryKind::RegularFile.is_file());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Directory entry.
    Directory,

    /// Regular file entry with a byte payload.
    RegularFile,
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::RegularFile)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Short lowercase label, used in log fields.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::RegularFile => "file",
        }
    }
}
