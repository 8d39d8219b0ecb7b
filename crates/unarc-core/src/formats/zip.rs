//! Zip structural extractor.
//!
//! Unlike tar, a zip archive is indexed by its central directory. The
//! extractor reads every member header when it is opened, so a damaged
//! archive is rejected before the first file is created.

use std::io::Read;
use std::io::Seek;
use std::path::PathBuf;

use tracing::debug;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::ExtractionError;
use crate::Result;
use crate::formats::Scheme;
use crate::types::ArchiveEntry;
use crate::types::EntryHeader;
use crate::types::EntryKind;
use crate::types::EntryOrigin;

/// File type bits of a Unix mode.
const S_IFMT: u32 = 0o170_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFLNK: u32 = 0o120_000;

/// Modes used when a member carries no Unix permission bits.
const DEFAULT_FILE_MODE: u32 = 0o644;
const DEFAULT_DIR_MODE: u32 = 0o755;

/// One supported member: its header and its index in the central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipMember {
    /// Central directory index.
    pub index: usize,
    /// Member metadata.
    pub header: EntryHeader,
}

/// Random-access zip reader with all member headers loaded up front.
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
/// use unarc_core::formats::zip::ZipExtractor;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut zip = ZipExtractor::open(File::open("archive.zip")?)?;
/// for index in 0..zip.members().len() {
///     let entry = zip.open_entry(index)?;
///     println!("{}", entry.path().display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ZipExtractor<R: Read + Seek> {
    archive: ZipArchive<R>,
    members: Vec<ZipMember>,
    skipped: usize,
}

impl<R: Read + Seek> ZipExtractor<R> {
    /// Reads the central directory and every member header.
    ///
    /// Symlink members are dropped and counted in [`skipped`](Self::skipped).
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Structural`] if the central directory or
    /// any member header cannot be read, or if a member is encrypted or uses
    /// a compression method this build cannot decode.
    pub fn open(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader).map_err(|e| zip_error(None, &e))?;

        let mut members = Vec::with_capacity(archive.len());
        let mut skipped = 0;

        for index in 0..archive.len() {
            let file = archive
                .by_index_raw(index)
                .map_err(|e| zip_error(Some(index), &e))?;
            let name = file.name().to_string();
            let unix_mode = file.unix_mode();

            if file.encrypted() {
                return Err(ExtractionError::structural(
                    Scheme::Zip,
                    format!("member {index} ({name}): encrypted members are not supported"),
                ));
            }
            let method = file.compression();
            if !is_decodable(method) {
                return Err(ExtractionError::structural(
                    Scheme::Zip,
                    format!("member {index} ({name}): unsupported compression method {method:?}"),
                ));
            }

            let kind = match unix_mode.map(|m| m & S_IFMT) {
                Some(S_IFLNK) => {
                    debug!(path = %name, "skipping zip symlink member");
                    skipped += 1;
                    continue;
                }
                Some(S_IFDIR) => EntryKind::Directory,
                _ if name.ends_with('/') => EntryKind::Directory,
                _ => EntryKind::RegularFile,
            };

            let mode = unix_mode.unwrap_or(match kind {
                EntryKind::Directory => DEFAULT_DIR_MODE,
                EntryKind::RegularFile => DEFAULT_FILE_MODE,
            });

            members.push(ZipMember {
                index,
                header: EntryHeader::new(PathBuf::from(name), kind, mode, file.size()),
            });
        }

        debug!(
            members = members.len(),
            skipped, "read zip central directory"
        );

        Ok(Self {
            archive,
            members,
            skipped,
        })
    }

    /// Supported members in central directory order.
    #[must_use]
    pub fn members(&self) -> &[ZipMember] {
        &self.members
    }

    /// Number of members dropped because of their kind.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Opens the decompressed payload of `members()[position]`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Structural`] if `position` is out of
    /// range or the member's local header or compression method is invalid.
    pub fn open_entry(&mut self, position: usize) -> Result<ArchiveEntry<Box<dyn Read + '_>>> {
        let Some(member) = self.members.get(position) else {
            return Err(ExtractionError::structural(
                Scheme::Zip,
                format!("no member at position {position}"),
            ));
        };
        let header = member.header.clone();
        let file = self
            .archive
            .by_index(member.index)
            .map_err(|e| zip_error(Some(member.index), &e))?;

        Ok(ArchiveEntry::new(header, Box::new(file), EntryOrigin::Zip))
    }
}

impl<R: Read + Seek> std::fmt::Debug for ZipExtractor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipExtractor")
            .field("members", &self.members.len())
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}

fn is_decodable(method: CompressionMethod) -> bool {
    matches!(
        method,
        CompressionMethod::Stored
            | CompressionMethod::Deflated
            | CompressionMethod::Bzip2
            | CompressionMethod::Zstd
    )
}

fn zip_error(index: Option<usize>, err: &ZipError) -> ExtractionError {
    let reason = match index {
        Some(i) => format!("member {i}: {err}"),
        None => err.to_string(),
    };
    ExtractionError::structural(Scheme::Zip, reason)
}
