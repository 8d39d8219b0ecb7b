//! Archive scheme detection from file extensions.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use crate::ExtractionError;
use crate::Result;

/// Compression or container scheme named by a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Uncompressed tar archive.
    Tar,
    /// ZIP container.
    Zip,
    /// Gzip-compressed tar archive.
    Gzip,
    /// Bzip2-compressed tar archive.
    Bzip2,
    /// XZ-compressed tar archive.
    Xz,
    /// Zstandard-compressed tar archive.
    Zstd,
    /// Legacy LZMA ("lzma-alone") compressed tar archive.
    Lzma,
}

impl Scheme {
    /// All schemes, in table order.
    pub const ALL: [Self; 7] = [
        Self::Tar,
        Self::Zip,
        Self::Gzip,
        Self::Bzip2,
        Self::Xz,
        Self::Zstd,
        Self::Lzma,
    ];

    /// Returns the lowercase scheme tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use unarc_core::formats::Scheme;
    ///
    /// assert_eq!(Scheme::Gzip.name(), "gzip");
    /// assert_eq!(Scheme::Lzma.name(), "lzma");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tar => "tar",
            Self::Zip => "zip",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
            Self::Lzma => "lzma",
        }
    }

    /// Returns `true` if the payload under this scheme is a tar stream.
    #[must_use]
    pub const fn is_tar_family(self) -> bool {
        !matches!(self, Self::Zip)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The extension table shipped with unarc.
///
/// Keys include the leading dot and are matched case-sensitively.
pub const STANDARD_EXTENSIONS: [(&str, Scheme); 14] = [
    (".tar", Scheme::Tar),
    (".zip", Scheme::Zip),
    (".gz", Scheme::Gzip),
    (".tgz", Scheme::Gzip),
    (".taz", Scheme::Gzip),
    (".bz2", Scheme::Bzip2),
    (".tz2", Scheme::Bzip2),
    (".tbz2", Scheme::Bzip2),
    (".tbz", Scheme::Bzip2),
    (".xz", Scheme::Xz),
    (".zst", Scheme::Zstd),
    (".tzst", Scheme::Zstd),
    (".lzma", Scheme::Lzma),
    (".tlz", Scheme::Lzma),
];

static STANDARD: LazyLock<ExtensionTable> =
    LazyLock::new(|| ExtensionTable::from_entries(STANDARD_EXTENSIONS));

/// Immutable mapping from file extension to [`Scheme`].
///
/// The standard table is built once per process and shared by reference;
/// custom tables can be built with [`ExtensionTable::from_entries`] and
/// handed to a [`FormatResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTable {
    entries: HashMap<String, Scheme>,
}

impl ExtensionTable {
    /// Returns the process-wide standard table.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Builds a table from `(extension, scheme)` pairs.
    ///
    /// Later pairs override earlier ones with the same extension.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Scheme)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(ext, scheme)| (ext.into(), scheme))
                .collect(),
        }
    }

    /// Looks up an extension (including its leading dot).
    #[must_use]
    pub fn lookup(&self, extension: &str) -> Option<Scheme> {
        self.entries.get(extension).copied()
    }

    /// Number of extensions in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no extensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the table sorted by extension.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Scheme)> {
        let mut pairs: Vec<_> = self
            .entries
            .iter()
            .map(|(ext, scheme)| (ext.as_str(), *scheme))
            .collect();
        pairs.sort_unstable_by_key(|(ext, _)| *ext);
        pairs.into_iter()
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

/// Maps file names to schemes through an injected [`ExtensionTable`].
#[derive(Debug, Clone, Copy)]
pub struct FormatResolver<'t> {
    table: &'t ExtensionTable,
}

impl<'t> FormatResolver<'t> {
    /// Creates a resolver over `table`.
    #[must_use]
    pub const fn new(table: &'t ExtensionTable) -> Self {
        Self { table }
    }

    /// Returns the table this resolver consults.
    #[must_use]
    pub const fn table(&self) -> &'t ExtensionTable {
        self.table
    }

    /// Resolves the scheme of `path` from its last extension.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::UnsupportedExtension`] when the extension
    /// is missing or absent from the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use unarc_core::formats::{ExtensionTable, FormatResolver, Scheme};
    ///
    /// let resolver = FormatResolver::new(ExtensionTable::standard());
    /// assert_eq!(resolver.resolve(Path::new("src.tar.gz"))?, Scheme::Gzip);
    /// assert!(resolver.resolve(Path::new("notes.txt")).is_err());
    /// # Ok::<(), unarc_core::ExtractionError>(())
    /// ```
    pub fn resolve(&self, path: &Path) -> Result<Scheme> {
        let extension = extension_of(path);
        self.table
            .lookup(&extension)
            .ok_or(ExtractionError::UnsupportedExtension { extension })
    }
}

impl Default for FormatResolver<'static> {
    fn default() -> Self {
        Self::new(ExtensionTable::standard())
    }
}

/// Returns the last extension of the final path element, dot included.
///
/// A name without a dot has the empty extension; a dotfile is all
/// extension (`.tar` yields `.tar`).
#[must_use]
pub fn extension_of(path: &Path) -> String {
    let Some(name) = path.file_name() else {
        return String::new();
    };
    let name = name.to_string_lossy();
    name.rfind('.')
        .map_or_else(String::new, |idx| name[idx..].to_string())
}

/// Detects the scheme of `path` using the standard table.
///
/// # Errors
///
/// Returns [`ExtractionError::UnsupportedExtension`] for unknown extensions.
pub fn detect_scheme(path: &Path) -> Result<Scheme> {
    FormatResolver::default().resolve(path)
}
