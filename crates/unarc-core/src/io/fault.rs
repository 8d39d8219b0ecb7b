//! Fault-tracking reader for decoded streams.
//!
//! The tar reader reports every failure as a plain `io::Error`, whether the
//! header bytes were malformed or the decompressor underneath gave up. This
//! module provides a `FaultTrackingReader` that wraps the decoder and trips
//! a shared [`FaultFlag`] when a read from it fails, so the caller can tell
//! the two apart after the fact.

use std::cell::Cell;
use std::io::ErrorKind;
use std::io::Read;
use std::rc::Rc;

/// Shared flag recording whether the wrapped stream has failed.
///
/// Cloning is cheap; all clones observe the same flag. Extraction is
/// single-threaded, so the flag is `!Send`.
#[derive(Debug, Clone, Default)]
pub struct FaultFlag(Rc<Cell<bool>>);

impl FaultFlag {
    /// Creates an untripped flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once any read through the tracked stream has failed.
    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.0.get()
    }

    fn trip(&self) {
        self.0.set(true);
    }
}

/// Reader wrapper that trips a [`FaultFlag`] on the first failed read.
///
/// `Interrupted` errors are retried by callers and do not trip the flag.
///
/// # Examples
///
/// ```
/// use std::io::Read;
/// use unarc_core::io::FaultTrackingReader;
///
/// let (mut reader, flag) = FaultTrackingReader::new(&b"payload"[..]);
/// let mut out = String::new();
/// reader.read_to_string(&mut out)?;
/// assert_eq!(out, "payload");
/// assert!(!flag.is_tripped());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct FaultTrackingReader<R> {
    inner: R,
    flag: FaultFlag,
}

impl<R> FaultTrackingReader<R> {
    /// Wraps `inner`, returning the reader and a handle to its flag.
    #[must_use]
    pub fn new(inner: R) -> (Self, FaultFlag) {
        let flag = FaultFlag::new();
        (
            Self {
                inner,
                flag: flag.clone(),
            },
            flag,
        )
    }
}

impl<R: Read> Read for FaultTrackingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf).inspect_err(|e| {
            if e.kind() != ErrorKind::Interrupted {
                self.flag.trip();
            }
        })
    }
}
