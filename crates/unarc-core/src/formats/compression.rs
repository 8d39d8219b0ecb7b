//! Decompression adapter for tar-family schemes.
//!
//! [`open_decoder`] turns a raw byte stream into the decoded tar stream for
//! a [`Scheme`]. `tar` passes through untouched. `gzip` and `bzip2` decoders
//! are built lazily and report bad input on first read. `xz`, `lzma` and
//! `zstd` peek at the stream header before returning so a file with the
//! wrong contents fails before any entry is produced. `gzip`, `bzip2` and
//! `xz` read concatenated members as one stream.
//!
//! | Scheme | Decoder                       | Header check |
//! |--------|-------------------------------|--------------|
//! | tar    | none                          | -            |
//! | gzip   | `flate2::read::MultiGzDecoder`| first read   |
//! | bzip2  | `bzip2::read::MultiBzDecoder` | first read   |
//! | xz     | `xz2::bufread::XzDecoder`     | eager        |
//! | lzma   | `xz2` lzma-alone stream       | eager        |
//! | zstd   | `zstd::stream::read::Decoder` | eager        |

use std::io::BufReader;
use std::io::Chain;
use std::io::Cursor;
use std::io::ErrorKind;
use std::io::Read;
use std::io::{self};

use tracing::debug;

use crate::ExtractionError;
use crate::Result;
use crate::formats::Scheme;

/// XZ stream header magic.
const XZ_MAGIC: [u8; 6] = [0xFD, b'7', b'z', b'X', b'Z', 0x00];

/// Zstandard frame magic number (little-endian on the wire).
const ZSTD_MAGIC: u32 = 0xFD2F_B528;

/// Skippable frames use magics `0x184D2A50..=0x184D2A5F`.
const ZSTD_SKIPPABLE_MASK: u32 = 0xFFFF_FFF0;
const ZSTD_SKIPPABLE_MAGIC: u32 = 0x184D_2A50;

/// lzma-alone header: properties byte, dictionary size (u32), size (u64).
const LZMA_HEADER_LEN: usize = 13;

/// Properties byte encodes `(pb * 5 + lp) * 9 + lc` with pb, lp ≤ 4, lc ≤ 8.
const LZMA_MAX_PROPERTIES: u8 = 9 * 5 * 5;

/// Stream whose first bytes were read for header validation, then replayed.
pub type Peeked<R> = BufReader<Chain<Cursor<Vec<u8>>, R>>;

/// Decoded byte stream for a tar-family scheme.
///
/// Each variant lazily produces decompressed bytes on `read`.
pub enum Decoder<R: Read> {
    /// Uncompressed tar payload.
    Passthrough(R),
    /// Gzip, including concatenated members.
    Gzip(Box<flate2::read::MultiGzDecoder<R>>),
    /// Bzip2, including concatenated streams.
    Bzip2(Box<bzip2::read::MultiBzDecoder<R>>),
    /// XZ container.
    Xz(Box<xz2::bufread::XzDecoder<Peeked<R>>>),
    /// Legacy lzma-alone stream.
    Lzma(Box<xz2::bufread::XzDecoder<Peeked<R>>>),
    /// Zstandard frames.
    Zstd(Box<zstd::stream::read::Decoder<'static, Peeked<R>>>),
}

impl<R: Read> Decoder<R> {
    /// Returns the scheme this decoder handles.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        match self {
            Self::Passthrough(_) => Scheme::Tar,
            Self::Gzip(_) => Scheme::Gzip,
            Self::Bzip2(_) => Scheme::Bzip2,
            Self::Xz(_) => Scheme::Xz,
            Self::Lzma(_) => Scheme::Lzma,
            Self::Zstd(_) => Scheme::Zstd,
        }
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
            Self::Bzip2(d) => d.read(buf),
            Self::Xz(d) | Self::Lzma(d) => d.read(buf),
            Self::Zstd(d) => d.read(buf),
        }
    }
}

impl<R: Read> std::fmt::Debug for Decoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Decoder").field(&self.scheme()).finish()
    }
}

/// Wraps `raw` in the decoder for `scheme`.
///
/// # Errors
///
/// Returns [`ExtractionError::Decode`] when the stream header is invalid for
/// `xz`, `lzma` or `zstd`, when reading the header fails, or when `scheme`
/// is [`Scheme::Zip`], which is a container and not a stream transform.
///
/// # Examples
///
/// ```
/// use std::io::Read;
/// use unarc_core::formats::Scheme;
/// use unarc_core::formats::compression::open_decoder;
///
/// let mut decoder = open_decoder(Scheme::Tar, &b"raw tar bytes"[..])?;
/// let mut out = Vec::new();
/// decoder.read_to_end(&mut out).map_err(|e| unarc_core::ExtractionError::Decode {
///     scheme: Scheme::Tar,
///     source: e,
/// })?;
/// assert_eq!(out, b"raw tar bytes");
/// # Ok::<(), unarc_core::ExtractionError>(())
/// ```
pub fn open_decoder<R: Read>(scheme: Scheme, raw: R) -> Result<Decoder<R>> {
    debug!(%scheme, "opening decoder");
    let decode_err = |source| ExtractionError::Decode { scheme, source };

    match scheme {
        Scheme::Tar => Ok(Decoder::Passthrough(raw)),
        Scheme::Gzip => Ok(Decoder::Gzip(Box::new(
            flate2::read::MultiGzDecoder::new(raw),
        ))),
        Scheme::Bzip2 => Ok(Decoder::Bzip2(Box::new(
            bzip2::read::MultiBzDecoder::new(raw),
        ))),
        Scheme::Xz => {
            let (head, stream) = peek(raw, XZ_MAGIC.len()).map_err(decode_err)?;
            check_xz_header(&head).map_err(decode_err)?;
            Ok(Decoder::Xz(Box::new(
                xz2::bufread::XzDecoder::new_multi_decoder(stream),
            )))
        }
        Scheme::Lzma => {
            let (head, stream) = peek(raw, LZMA_HEADER_LEN).map_err(decode_err)?;
            check_lzma_header(&head).map_err(decode_err)?;
            let lzma = xz2::stream::Stream::new_lzma_decoder(u64::MAX)
                .map_err(|e| decode_err(io::Error::other(e)))?;
            Ok(Decoder::Lzma(Box::new(xz2::bufread::XzDecoder::new_stream(
                stream, lzma,
            ))))
        }
        Scheme::Zstd => {
            let (head, stream) = peek(raw, 4).map_err(decode_err)?;
            check_zstd_header(&head).map_err(decode_err)?;
            let decoder = zstd::stream::read::Decoder::with_buffer(stream).map_err(decode_err)?;
            Ok(Decoder::Zstd(Box::new(decoder)))
        }
        Scheme::Zip => Err(decode_err(io::Error::new(
            ErrorKind::InvalidInput,
            "zip is a container format and has no stream decoder",
        ))),
    }
}

/// Reads up to `len` bytes from `raw` and returns them with a stream that
/// replays them ahead of the rest of `raw`.
fn peek<R: Read>(mut raw: R, len: usize) -> io::Result<(Vec<u8>, Peeked<R>)> {
    let mut head = Vec::with_capacity(len);
    raw.by_ref().take(len as u64).read_to_end(&mut head)?;
    let replay = Cursor::new(head.clone()).chain(raw);
    Ok((head, BufReader::new(replay)))
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, msg.to_string())
}

fn check_xz_header(head: &[u8]) -> io::Result<()> {
    if head.is_empty() {
        return Err(io::Error::new(ErrorKind::UnexpectedEof, "empty xz stream"));
    }
    if head != XZ_MAGIC {
        return Err(invalid("missing xz stream header magic"));
    }
    Ok(())
}

fn check_zstd_header(head: &[u8]) -> io::Result<()> {
    let Ok(bytes) = <[u8; 4]>::try_from(head) else {
        return Err(io::Error::new(
            ErrorKind::UnexpectedEof,
            "zstd stream shorter than frame magic",
        ));
    };
    let magic = u32::from_le_bytes(bytes);
    if magic == ZSTD_MAGIC || magic & ZSTD_SKIPPABLE_MASK == ZSTD_SKIPPABLE_MAGIC {
        Ok(())
    } else {
        Err(invalid("missing zstd frame magic"))
    }
}

fn check_lzma_header(head: &[u8]) -> io::Result<()> {
    if head.len() < LZMA_HEADER_LEN {
        return Err(io::Error::new(
            ErrorKind::UnexpectedEof,
            "lzma stream shorter than its 13-byte header",
        ));
    }
    if head[0] >= LZMA_MAX_PROPERTIES {
        return Err(invalid("invalid lzma properties byte"));
    }
    Ok(())
}
