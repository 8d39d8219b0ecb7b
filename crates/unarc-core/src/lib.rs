//! Archive extraction library for tar-family and zip archives.
//!
//! `unarc-core` picks a decoding scheme from the archive's file name,
//! decompresses tar streams (gzip, bzip2, xz, lzma, zstd) or reads zip
//! containers, and writes directories and regular files under a
//! destination directory. Links, devices and other special entries are
//! skipped.
//!
//! # Examples
//!
//! ```no_run
//! use unarc_core::extract_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = extract_archive("archive.tar.gz", "/output/dir")?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod io;
pub mod report;
#[doc(hidden)]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::extract_archive;
pub use api::extract_archive_with_options;
pub use api::extract_archive_with_progress;
pub use archive::Archive;
pub use archive::ArchiveBuilder;
pub use archive::ArchiveSource;
pub use config::ErrorPolicy;
pub use config::ExtractOptions;
pub use config::PathPolicy;
pub use error::ExtractionError;
pub use error::Result;
pub use formats::Scheme;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::EntryKind;
