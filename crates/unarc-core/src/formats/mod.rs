//! Format resolution, stream decoding and structural extraction.
//!
//! - [`detect`]: file name suffix to [`Scheme`]
//! - [`compression`]: raw stream to decoded tar stream
//! - [`tar`] and [`zip`]: the two container readers

pub mod compression;
pub mod detect;
pub mod tar;
pub mod zip;

pub use compression::Decoder;
pub use compression::open_decoder;
pub use detect::ExtensionTable;
pub use detect::FormatResolver;
pub use detect::Scheme;
pub use detect::detect_scheme;
pub use detect::extension_of;
pub use tar::TarExtractor;
pub use zip::ZipExtractor;
