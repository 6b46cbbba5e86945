//! Exchange-string decoder and encoder.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

pub mod decode;
pub mod encode;
pub mod error;
#[cfg(feature = "async")]
pub mod task;

pub use decode::{decode, decode_envelope, inspect, Inspection};
pub use encode::{encode, encode_envelope, encode_with, EncodeOptions};
pub use error::{CodecError, PayloadError, Stage};

/// Standard base64 alphabet; padding written on encode, optional on decode.
pub(crate) const EXCHANGE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);
