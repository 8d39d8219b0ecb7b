//! Archive sources, opened archives and the extraction builder.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::ExtractOptions;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::extraction::ExtractionEngine;
use crate::formats::ExtensionTable;
use crate::formats::FormatResolver;
use crate::formats::Scheme;
use crate::formats::TarExtractor;
use crate::formats::ZipExtractor;
use crate::formats::open_decoder;
use crate::report::NoopProgress;
use crate::types::DestDir;

/// The two ways an archive is read.
///
/// Tar-family schemes are a forward-only stream of entries. Zip is a
/// seekable container whose central directory is read before any entry.
#[derive(Debug)]
pub enum ArchiveSource<R: Read + Seek> {
    /// Decoded tar stream.
    Tar(TarExtractor<R>),
    /// Zip container.
    Zip(ZipExtractor<R>),
}

impl<R: Read + Seek> ArchiveSource<R> {
    /// Opens `reader` as `scheme`.
    ///
    /// For `xz`, `lzma` and `zstd` the stream header is checked here; for
    /// `zip` the whole central directory is read here.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Decode`](crate::ExtractionError::Decode)
    /// for an invalid stream header and
    /// [`ExtractionError::Structural`](crate::ExtractionError::Structural)
    /// for an unreadable zip central directory.
    pub fn open(scheme: Scheme, reader: R) -> Result<Self> {
        if scheme == Scheme::Zip {
            Ok(Self::Zip(ZipExtractor::open(reader)?))
        } else {
            Ok(Self::Tar(TarExtractor::new(open_decoder(scheme, reader)?)))
        }
    }

    /// Scheme this source was opened with.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        match self {
            Self::Tar(tar) => tar.scheme(),
            Self::Zip(_) => Scheme::Zip,
        }
    }
}

/// An archive file whose scheme is known and whose source is open.
///
/// # Examples
///
/// ```no_run
/// use unarc_core::Archive;
/// use unarc_core::ExtractOptions;
/// use unarc_core::report::NoopProgress;
/// use unarc_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let archive = Archive::open("release.tar.xz")?;
/// let dest = DestDir::create("/tmp/release", 0o755)?;
/// let report = archive.extract_to(&dest, &ExtractOptions::default(), &mut NoopProgress)?;
/// println!("{} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
    source: ArchiveSource<BufReader<File>>,
}

impl Archive {
    /// Opens `path` using the standard extension table.
    ///
    /// # Errors
    ///
    /// See [`Archive::open_with`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &FormatResolver::default(), &mut NoopProgress)
    }

    /// Resolves the scheme of `path` with `resolver`, reports it, then opens
    /// the file and its [`ArchiveSource`].
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::UnsupportedExtension`](crate::ExtractionError::UnsupportedExtension)
    ///   if the extension is not in the resolver's table
    /// - [`ExtractionError::SourceUnreadable`](crate::ExtractionError::SourceUnreadable)
    ///   if the file cannot be opened
    /// - any error of [`ArchiveSource::open`]
    pub fn open_with<P, C>(path: P, resolver: &FormatResolver<'_>, progress: &mut C) -> Result<Self>
    where
        P: AsRef<Path>,
        C: ProgressCallback + ?Sized,
    {
        let path = path.as_ref();
        let scheme = resolver.resolve(path)?;
        debug!(path = %path.display(), %scheme, "resolved scheme");
        progress.on_scheme_detected(scheme);

        let file = File::open(path).map_err(|source| crate::ExtractionError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let source = ArchiveSource::open(scheme, BufReader::new(file))?;

        Ok(Self {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the path to the archive file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the resolved scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.source.scheme()
    }

    /// Extracts every supported entry under `dest`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the run.
    pub fn extract_to<C>(
        self,
        dest: &DestDir,
        options: &ExtractOptions,
        progress: &mut C,
    ) -> Result<ExtractionReport>
    where
        C: ProgressCallback + ?Sized,
    {
        ExtractionEngine::new(dest, options).run(self.source, progress)
    }
}

/// Builder for configuring archive extraction.
///
/// # Examples
///
/// ```no_run
/// use unarc_core::ArchiveBuilder;
/// use unarc_core::ExtractOptions;
/// use unarc_core::config::ErrorPolicy;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = ArchiveBuilder::new()
///     .archive("archive.tar.gz")
///     .output_dir("/tmp/output")
///     .options(ExtractOptions::default().with_error_policy(ErrorPolicy::Continue))
///     .extract()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    archive_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    options: Option<ExtractOptions>,
    table: Option<ExtensionTable>,
}

impl ArchiveBuilder {
    /// Creates a new `ArchiveBuilder`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the archive file path.
    #[must_use]
    pub fn archive<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.archive_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output directory. Defaults to the current directory.
    #[must_use]
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the extraction options.
    #[must_use]
    pub fn options(mut self, options: ExtractOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Replaces the standard extension table.
    #[must_use]
    pub fn extension_table(mut self, table: ExtensionTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Executes the extraction with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::SourceUnreadable`](crate::ExtractionError::SourceUnreadable)
    /// if no archive path was set, or any error of the run.
    pub fn extract(self) -> Result<ExtractionReport> {
        self.extract_with_progress(&mut NoopProgress)
    }

    /// Like [`extract`](Self::extract), reporting to `progress`.
    ///
    /// # Errors
    ///
    /// See [`extract`](Self::extract).
    pub fn extract_with_progress<C>(self, progress: &mut C) -> Result<ExtractionReport>
    where
        C: ProgressCallback + ?Sized,
    {
        let archive_path =
            self.archive_path
                .ok_or_else(|| crate::ExtractionError::SourceUnreadable {
                    path: PathBuf::new(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "archive path not set",
                    ),
                })?;
        let output_dir = self.output_dir.unwrap_or_else(|| PathBuf::from("."));
        let options = self.options.unwrap_or_default();
        let table = match &self.table {
            Some(table) => table,
            None => ExtensionTable::standard(),
        };

        crate::api::extract_with(
            &archive_path,
            &output_dir,
            &FormatResolver::new(table),
            &options,
            progress,
        )
    }
}
