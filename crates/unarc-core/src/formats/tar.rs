//! Tar structural extractor.
//!
//! Wraps the decoded stream in a [`tar::Archive`] and yields entries lazily
//! in archive order. Only directories and regular files are surfaced; all
//! other record kinds are counted and skipped.
//!
//! # Examples
//!
//! ```no_run
//! use std::fs::File;
//! use unarc_core::formats::Scheme;
//! use unarc_core::formats::compression::open_decoder;
//! use unarc_core::formats::tar::TarExtractor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("archive.tar.gz")?;
//! let mut extractor = TarExtractor::new(open_decoder(Scheme::Gzip, file)?);
//! let mut entries = extractor.entries()?;
//! while let Some(entry) = entries.next() {
//!     println!("{}", entry?.path().display());
//! }
//! # Ok(())
//! # }
//! ```

use std::io::Read;

use tracing::debug;

use crate::ExtractionError;
use crate::Result;
use crate::formats::Scheme;
use crate::formats::compression::Decoder;
use crate::io::FaultFlag;
use crate::io::FaultTrackingReader;
use crate::types::ArchiveEntry;
use crate::types::EntryHeader;
use crate::types::EntryKind;
use crate::types::EntryOrigin;

/// Decoded byte stream the tar reader consumes.
pub type TarStream<R> = FaultTrackingReader<Decoder<R>>;

/// Entry yielded by [`TarEntries`]; its payload borrows the archive stream.
pub type TarEntry<'a, R> = ArchiveEntry<tar::Entry<'a, TarStream<R>>>;

/// Forward-only tar reader over a decoded stream.
pub struct TarExtractor<R: Read> {
    archive: tar::Archive<TarStream<R>>,
    scheme: Scheme,
    fault: FaultFlag,
}

impl<R: Read> TarExtractor<R> {
    /// Creates an extractor over the output of `decoder`.
    #[must_use]
    pub fn new(decoder: Decoder<R>) -> Self {
        let scheme = decoder.scheme();
        let (stream, fault) = FaultTrackingReader::new(decoder);
        Self {
            archive: tar::Archive::new(stream),
            scheme,
            fault,
        }
    }

    /// Scheme of the underlying stream (`tar` or a compressed scheme).
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the lazy entry sequence.
    ///
    /// May be called once; the archive is consumed as entries are read.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Structural`] if the archive stream has
    /// already been read.
    pub fn entries(&mut self) -> Result<TarEntries<'_, R>> {
        let origin = EntryOrigin::Tar {
            scheme: self.scheme,
            fault: self.fault.clone(),
        };
        let inner = self
            .archive
            .entries()
            .map_err(|e| origin.read_error(None, e))?;
        Ok(TarEntries {
            inner,
            origin,
            skipped: 0,
            failed: false,
        })
    }
}

impl<R: Read> std::fmt::Debug for TarExtractor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TarExtractor")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

/// Iterator over the supported entries of a tar stream.
///
/// Advancing discards any unread payload of the previous entry. The first
/// error ends the iteration.
pub struct TarEntries<'a, R: Read> {
    inner: tar::Entries<'a, TarStream<R>>,
    origin: EntryOrigin,
    skipped: usize,
    failed: bool,
}

impl<R: Read> TarEntries<'_, R> {
    /// Number of records skipped so far because of their kind.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<'a, R: Read> Iterator for TarEntries<'a, R> {
    type Item = Result<TarEntry<'a, R>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(self.origin.read_error(None, e)));
                }
            };

            match self.header_for(&entry) {
                Ok(Some(header)) => {
                    return Some(Ok(ArchiveEntry::new(header, entry, self.origin.clone())));
                }
                Ok(None) => self.skipped += 1,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<R: Read> TarEntries<'_, R> {
    /// Builds the header for a supported record, `None` for anything else.
    fn header_for(&self, entry: &tar::Entry<'_, TarStream<R>>) -> Result<Option<EntryHeader>> {
        let raw = entry.header();
        // Pre-POSIX archives mark directories with a NUL type flag and a
        // trailing slash; a '0' flag always means a regular file.
        let old_style_dir =
            raw.as_old().linkflag[0] == b'\0' && entry.path_bytes().ends_with(b"/");

        let kind = match raw.entry_type() {
            tar::EntryType::Directory => EntryKind::Directory,
            tar::EntryType::Regular if old_style_dir => EntryKind::Directory,
            tar::EntryType::Regular => EntryKind::RegularFile,
            other => {
                debug!(
                    path = %String::from_utf8_lossy(&entry.path_bytes()),
                    entry_type = ?other,
                    "skipping unsupported tar entry"
                );
                return Ok(None);
            }
        };

        let path = entry
            .path()
            .map_err(|e| self.bad_header("entry path", e))?
            .into_owned();
        let mode = raw.mode().map_err(|e| self.bad_header("entry mode", e))?;

        Ok(Some(EntryHeader::new(path, kind, mode, entry.size())))
    }

    fn bad_header(&self, field: &str, source: std::io::Error) -> ExtractionError {
        match self.origin.read_error(None, source) {
            ExtractionError::Structural { scheme, reason } => {
                ExtractionError::structural(scheme, format!("invalid {field}: {reason}"))
            }
            other => other,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::formats::compression::open_decoder;
    use crate::test_utils::TarTestBuilder;
    use std::io::Read as _;
    use std::path::Path;

    fn extractor(data: &[u8]) -> TarExtractor<&[u8]> {
        TarExtractor::new(open_decoder(Scheme::Tar, data).unwrap())
    }

    #[test]
    fn test_entries_in_archive_order() {
        let data = TarTestBuilder::new()
            .add_directory("a/", 0o755)
            .add_file("a/b.txt", b"hello", 0o644)
            .add_file("c.txt", b"world", 0o600)
            .build();

        let mut tar = extractor(&data);
        let names: Vec<_> = tar
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().to_path_buf())
            .collect();
        assert_eq!(
            names,
            [Path::new("a"), Path::new("a/b.txt"), Path::new("c.txt")]
        );
    }

    #[test]
    fn test_entry_metadata_and_payload() {
        let data = TarTestBuilder::new()
            .add_file("a/b.txt", b"hello", 0o640)
            .build();

        let mut tar = extractor(&data);
        let mut entries = tar.entries().unwrap();
        let mut entry = entries.next().unwrap().unwrap();

        assert_eq!(entry.kind(), EntryKind::RegularFile);
        assert_eq!(entry.header().mode, 0o640);
        assert_eq!(entry.header().size, 5);

        let mut body = String::new();
        entry.reader_mut().read_to_string(&mut body).unwrap();
        assert_eq!(body, "hello");
    }

    #[test]
    fn test_symlink_and_hardlink_skipped() {
        let data = TarTestBuilder::new()
            .add_symlink("link", "target")
            .add_hardlink("hard", "c.txt")
            .add_file("c.txt", b"data", 0o644)
            .build();

        let mut tar = extractor(&data);
        let mut entries = tar.entries().unwrap();
        let first = entries.next().unwrap().unwrap();
        assert_eq!(first.path(), Path::new("c.txt"));
        drop(first);
        assert!(entries.next().is_none());
        assert_eq!(entries.skipped(), 2);
    }

    /// Rewrites the type flag of the first header to NUL.
    fn clear_first_typeflag(data: &mut [u8]) {
        data[156] = 0;
        data[148..156].fill(b' ');
        let sum: u32 = data[..512].iter().map(|&b| u32::from(b)).sum();
        data[148..156].copy_from_slice(format!("{sum:06o}\0 ").as_bytes());
    }

    #[test]
    fn test_nul_typeflag_with_trailing_slash_is_directory() {
        let mut data = TarTestBuilder::new()
            .add_entry_with_type("old-style/", tar::EntryType::Regular, b"", 0o755)
            .build();
        clear_first_typeflag(&mut data);

        let mut tar = extractor(&data);
        let entry = tar.entries().unwrap().next().unwrap().unwrap();
        assert!(entry.kind().is_directory());
    }

    #[test]
    fn test_nul_typeflag_without_slash_is_file() {
        let mut data = TarTestBuilder::new()
            .add_entry_with_type("plain", tar::EntryType::Regular, b"x", 0o644)
            .build();
        clear_first_typeflag(&mut data);

        let mut tar = extractor(&data);
        let entry = tar.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(entry.kind(), EntryKind::RegularFile);
    }

    #[test]
    fn test_typed_regular_entry_with_trailing_slash_stays_file() {
        let data = TarTestBuilder::new()
            .add_entry_with_type("named-like-dir/", tar::EntryType::Regular, b"", 0o644)
            .build();

        let mut tar = extractor(&data);
        let entry = tar.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(entry.kind(), EntryKind::RegularFile);
    }

    #[test]
    fn test_corrupt_header_is_structural() {
        let mut data = TarTestBuilder::new().add_file("a.txt", b"x", 0o644).build();
        // Break the checksum field of the first header.
        data[148..156].copy_from_slice(b"9999999\0");

        let mut tar = extractor(&data);
        let mut entries = tar.entries().unwrap();
        let err = entries.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Structural {
                scheme: Scheme::Tar,
                ..
            }
        ));
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_broken_gzip_is_decode_error() {
        let mut tar = TarExtractor::new(
            open_decoder(Scheme::Gzip, &b"\x1f\x8b not really gzip at all"[..]).unwrap(),
        );
        let err = tar.entries().unwrap().next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Decode {
                scheme: Scheme::Gzip,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_stream_has_no_entries() {
        let mut tar = extractor(&[]);
        assert!(tar.entries().unwrap().next().is_none());
    }
}
