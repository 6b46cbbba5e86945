//! Compression adapter for exchange-string payloads.
//!
//! Producers of exchange strings have historically written one of two stream
//! conventions around the same deflate data:
//!
//! ```text
//! zlib:  [CMF:1][FLG:1][deflate...][adler32:4]
//! gzip:  [1F 8B 08 FLG:1 MTIME:4 XFL:1 OS:1 (optional fields)][deflate...][crc32:4][isize:4]
//! ```
//!
//! Inflating looks at the first two bytes to pick the right one.  When the
//! header matches neither, zlib is attempted first and gzip second.
//! Deflating always writes zlib, which every known consumer accepts.

use std::fmt;
use std::io::{self, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::ZlibEncoder;
use flate2::{Decompress, FlushDecompress, Status};
use tracing::{debug, trace};

use crate::codec::error::CodecError;

/// First two bytes of every gzip member.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Deflate compression method in the low nibble of a zlib CMF byte.
const ZLIB_METHOD_DEFLATE: u8 = 8;

/// Largest window exponent (CINFO) a zlib header may declare.
const ZLIB_MAX_WINDOW: u8 = 7;

/// FDICT bit in the zlib FLG byte.
const ZLIB_PRESET_DICTIONARY: u8 = 0x20;

// ── Conventions ───────────────────────────────────────────────────────────────

/// A compressed-stream convention wrapping a deflate stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// RFC 1950 zlib wrapper.  Written by the encoder.
    Zlib,
    /// RFC 1952 gzip wrapper.  Accepted on decode only.
    Gzip,
}

impl Convention {
    fn inflate(self, input: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            Convention::Zlib => inflate_zlib(input),
            Convention::Gzip => inflate_gzip(input),
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Zlib => f.write_str("zlib"),
            Convention::Gzip => f.write_str("gzip"),
        }
    }
}

/// Deflate effort, 0 (store) through 9 (smallest output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    /// Creates a level, clamping anything above 9.
    pub fn new(level: u32) -> Self {
        Self(level.min(9))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for CompressionLevel {
    /// Level 6, the zlib default used by the original exporters.
    fn default() -> Self {
        Self(6)
    }
}

impl From<CompressionLevel> for flate2::Compression {
    fn from(level: CompressionLevel) -> Self {
        flate2::Compression::new(level.0)
    }
}

/// Output of a successful [`inflate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflated {
    pub bytes: Vec<u8>,
    /// The convention the stream turned out to use.
    pub convention: Convention,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Identifies the stream convention from its leading bytes.
///
/// Returns `None` when the header is neither gzip nor a valid zlib header.
///
/// # Examples
///
/// ```rust
/// use blueprint_core::compression::{detect, Convention};
///
/// assert_eq!(detect(&[0x78, 0x9C, 0x00]), Some(Convention::Zlib));
/// assert_eq!(detect(&[0x1F, 0x8B, 0x08]), Some(Convention::Gzip));
/// assert_eq!(detect(b"{}"), None);
/// ```
pub fn detect(bytes: &[u8]) -> Option<Convention> {
    match bytes {
        [a, b, ..] if [*a, *b] == GZIP_MAGIC => Some(Convention::Gzip),
        [cmf, flg, ..] if is_zlib_header(*cmf, *flg) => Some(Convention::Zlib),
        _ => None,
    }
}

/// Inflates `bytes`, auto-detecting the stream convention.
///
/// A detected convention is the only one attempted.  An inconclusive header
/// attempts zlib, then gzip.
///
/// # Errors
///
/// Returns [`CodecError::DecompressionFailure`] listing every convention
/// attempted, with the last underlying error as its source.  A stream that
/// ends before its trailer is a failure, never a partial result.
pub fn inflate(bytes: &[u8]) -> Result<Inflated, CodecError> {
    let candidates: &[Convention] = match detect(bytes) {
        Some(Convention::Zlib) => &[Convention::Zlib],
        Some(Convention::Gzip) => &[Convention::Gzip],
        None => &[Convention::Zlib, Convention::Gzip],
    };

    let mut attempted = Vec::with_capacity(candidates.len());
    let mut last_error = None;
    for &convention in candidates {
        attempted.push(convention);
        match convention.inflate(bytes) {
            Ok(out) => {
                trace!(
                    %convention,
                    compressed = bytes.len(),
                    inflated = out.len(),
                    "inflated payload"
                );
                return Ok(Inflated {
                    bytes: out,
                    convention,
                });
            }
            Err(e) => {
                debug!(%convention, "inflate attempt failed: {e}");
                last_error = Some(e);
            }
        }
    }

    Err(CodecError::DecompressionFailure {
        attempted,
        source: last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "no convention attempted")
        }),
    })
}

/// Compresses `bytes` with the zlib convention.
///
/// # Errors
///
/// Returns [`CodecError::CompressionFailure`] if the compressor reports an
/// I/O error.  Writing into memory does not fail in practice.
pub fn deflate(bytes: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(bytes.len() / 2 + 16), level.into());
    encoder
        .write_all(bytes)
        .map_err(CodecError::CompressionFailure)?;
    let out = encoder.finish().map_err(CodecError::CompressionFailure)?;
    trace!(
        raw = bytes.len(),
        compressed = out.len(),
        level = level.get(),
        "deflated payload"
    );
    Ok(out)
}

// ── Stream helpers ────────────────────────────────────────────────────────────

fn is_zlib_header(cmf: u8, flg: u8) -> bool {
    let method = cmf & 0x0F;
    let window = cmf >> 4;
    method == ZLIB_METHOD_DEFLATE
        && window <= ZLIB_MAX_WINDOW
        && flg & ZLIB_PRESET_DICTIONARY == 0
        && (u16::from(cmf) << 8 | u16::from(flg)) % 31 == 0
}

fn initial_capacity(compressed_len: usize) -> usize {
    compressed_len.saturating_mul(4).max(64)
}

/// Inflates a zlib stream, requiring the stream end (and Adler-32 check).
///
/// `flate2::read::ZlibDecoder` reports end-of-input on a truncated stream as a
/// clean EOF, so the low-level decompressor is driven directly here.  A call
/// that neither consumes input nor fills spare output means the input ran out
/// before the stream did.
fn inflate_zlib(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(initial_capacity(input.len()));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }

        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        let status = inflater
            .decompress_vec(&input[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if status == Status::StreamEnd {
            return Ok(out);
        }

        let stalled = inflater.total_in() as usize == consumed && inflater.total_out() == produced;
        if stalled && out.len() < out.capacity() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "zlib stream ended before its trailer",
            ));
        }
    }
}

/// Inflates a single gzip member; the decoder verifies the CRC-32 and size
/// trailer.
fn inflate_gzip(input: &[u8]) -> io::Result<Vec<u8>> {
    if !input.starts_with(&GZIP_MAGIC) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "missing gzip magic bytes",
        ));
    }
    let mut out = Vec::with_capacity(initial_capacity(input.len()));
    GzDecoder::new(input).read_to_end(&mut out)?;
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
