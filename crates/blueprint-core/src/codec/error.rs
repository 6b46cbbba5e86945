//! Error taxonomy for the exchange-string codec.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::compression::Convention;

/// Errors that can occur while decoding or encoding an exchange string.
///
/// Every variant names the pipeline stage it came from (see
/// [`CodecError::stage`]) and, where there is one, chains the underlying
/// cause through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum CodecError {
    /// The exchange string has no characters at all.
    #[error("exchange string is empty")]
    EmptyInput,

    /// The leading character is not a known version marker.
    #[error("unsupported version marker {0:?}")]
    UnsupportedVersion(char),

    /// The text after the marker is not valid base64.
    #[error("malformed base64 encoding: {0}")]
    MalformedEncoding(#[from] base64::DecodeError),

    /// The decoded bytes could not be inflated with any attempted convention.
    #[error("decompression failed (attempted {}): {source}", AttemptList(.attempted))]
    DecompressionFailure {
        attempted: Vec<Convention>,
        #[source]
        source: io::Error,
    },

    /// The inflated bytes are not UTF-8 JSON.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    /// The JSON document does not have the envelope shape.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The compressor failed while encoding.
    #[error("compression failed: {0}")]
    CompressionFailure(#[source] io::Error),

    /// The background task running the codec panicked or was cancelled.
    #[cfg(feature = "async")]
    #[error("codec task did not complete: {0}")]
    Interrupted(#[source] tokio::task::JoinError),
}

/// Why an inflated payload could not be read as JSON.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The step of the pipeline an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Version,
    Base64,
    Decompress,
    Payload,
    Schema,
    Compress,
    Task,
}

impl CodecError {
    /// Returns the pipeline stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            CodecError::EmptyInput | CodecError::UnsupportedVersion(_) => Stage::Version,
            CodecError::MalformedEncoding(_) => Stage::Base64,
            CodecError::DecompressionFailure { .. } => Stage::Decompress,
            CodecError::MalformedPayload(_) => Stage::Payload,
            CodecError::SchemaMismatch(_) => Stage::Schema,
            CodecError::CompressionFailure(_) => Stage::Compress,
            #[cfg(feature = "async")]
            CodecError::Interrupted(_) => Stage::Task,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Version => "version marker",
            Stage::Base64 => "base64",
            Stage::Decompress => "decompression",
            Stage::Payload => "payload",
            Stage::Schema => "schema",
            Stage::Compress => "compression",
            Stage::Task => "task",
        };
        f.write_str(name)
    }
}

/// Renders `[Zlib, Gzip]` as `zlib, gzip`.
struct AttemptList<'a>(&'a [Convention]);

impl fmt::Display for AttemptList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, convention) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{convention}")?;
        }
        Ok(())
    }
}
