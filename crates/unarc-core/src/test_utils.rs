//! Test utilities for building archives and observing extraction runs.
//!
//! Used by unit tests, the integration tests under `tests/` and the
//! benchmarks. Archives are built in memory; [`compress`] wraps a tar
//! stream in any of the tar-family schemes.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::formats::Scheme;

/// Builder for tar test archives.
///
/// Names are written into the header verbatim, so entries such as
/// `../evil` or `/abs/path` can be produced.
///
/// # Examples
///
/// ```
/// use unarc_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_directory("dir/", 0o755)
///     .add_file("dir/file.txt", b"content", 0o644)
///     .add_symlink("link", "dir/file.txt")
///     .build();
/// assert!(!tar_data.is_empty());
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new tar test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8], mode: u32) -> Self {
        self.add_entry_with_type(path, tar::EntryType::Regular, data, mode)
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(self, path: &str, mode: u32) -> Self {
        self.add_entry_with_type(path, tar::EntryType::Directory, b"", mode)
    }

    /// Adds a symlink pointing at `target`.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.add_link(path, target, tar::EntryType::Symlink)
    }

    /// Adds a hardlink pointing at `target`.
    #[must_use]
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        self.add_link(path, target, tar::EntryType::Link)
    }

    /// Adds an entry of any type with a payload.
    #[must_use]
    pub fn add_entry_with_type(
        mut self,
        path: &str,
        entry_type: tar::EntryType,
        data: &[u8],
        mode: u32,
    ) -> Self {
        let mut header = tar::Header::new_gnu();
        set_raw_name(&mut header, path);
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_entry_type(entry_type);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    fn add_link(mut self, path: &str, target: &str, entry_type: tar::EntryType) -> Self {
        let mut header = tar::Header::new_gnu();
        set_raw_name(&mut header, path);
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(entry_type);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder.append(&header, std::io::empty()).unwrap();
        self
    }

    /// Builds and returns the tar archive bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies `path` into the header name field without validation.
fn set_raw_name(header: &mut tar::Header, path: &str) {
    let name = &mut header.as_old_mut().name;
    assert!(path.len() <= name.len(), "test entry name too long: {path}");
    name.fill(0);
    name[..path.len()].copy_from_slice(path.as_bytes());
}

/// Builder for zip test archives.
///
/// # Examples
///
/// ```
/// use unarc_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_directory("dir/")
///     .add_file("dir/file.txt", b"content")
///     .build();
/// assert!(!zip_data.is_empty());
/// ```
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new zip test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a deflated file with mode `0o644`.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a deflated file with a custom mode.
    #[must_use]
    pub fn add_file_with_mode(self, path: &str, data: &[u8], mode: u32) -> Self {
        self.add_file_with_method(path, data, mode, zip::CompressionMethod::Deflated)
    }

    /// Adds a file compressed with `method`.
    #[must_use]
    pub fn add_file_with_method(
        mut self,
        path: &str,
        data: &[u8],
        mode: u32,
        method: zip::CompressionMethod,
    ) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(mode);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Adds a symlink member pointing at `target`.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        use zip::write::SimpleFileOptions;

        self.zip
            .add_symlink(path, target, SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Builds and returns the zip archive bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compresses `tar` with the encoder for `scheme`.
///
/// `Scheme::Tar` returns the input unchanged.
///
/// # Panics
///
/// Panics for [`Scheme::Zip`], which is not a stream encoding.
#[must_use]
pub fn compress(scheme: Scheme, tar: &[u8]) -> Vec<u8> {
    match scheme {
        Scheme::Tar => tar.to_vec(),
        Scheme::Gzip => {
            let mut enc =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            enc.write_all(tar).unwrap();
            enc.finish().unwrap()
        }
        Scheme::Bzip2 => {
            let mut enc = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            enc.write_all(tar).unwrap();
            enc.finish().unwrap()
        }
        Scheme::Xz => {
            let mut enc = xz2::write::XzEncoder::new(Vec::new(), 6);
            enc.write_all(tar).unwrap();
            enc.finish().unwrap()
        }
        Scheme::Lzma => {
            let opts = xz2::stream::LzmaOptions::new_preset(6).unwrap();
            let stream = xz2::stream::Stream::new_lzma_encoder(&opts).unwrap();
            let mut enc = xz2::write::XzEncoder::new_stream(Vec::new(), stream);
            enc.write_all(tar).unwrap();
            enc.finish().unwrap()
        }
        Scheme::Zstd => zstd::stream::encode_all(tar, 3).unwrap(),
        Scheme::Zip => panic!("zip is a container, not a stream encoding"),
    }
}

/// Progress callback that records every event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingProgress {
    /// Schemes announced, in order.
    pub schemes: Vec<Scheme>,
    /// Directories announced, in order.
    pub directories: Vec<PathBuf>,
    /// Files announced with their byte counts, in order.
    pub files: Vec<(PathBuf, u64)>,
    /// Whether the run completed.
    pub completed: bool,
}

impl ProgressCallback for RecordingProgress {
    fn on_scheme_detected(&mut self, scheme: Scheme) {
        self.schemes.push(scheme);
    }

    fn on_directory_created(&mut self, path: &Path) {
        self.directories.push(path.to_path_buf());
    }

    fn on_file_created(&mut self, path: &Path, bytes: u64) {
        self.files.push((path.to_path_buf(), bytes));
    }

    fn on_complete(&mut self, _report: &ExtractionReport) {
        self.completed = true;
    }
}
