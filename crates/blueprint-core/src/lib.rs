//! # blueprint-core
//!
//! Codec for factory blueprint *exchange strings*: the compact text users
//! copy and paste to share a set of placed entities between editors and the
//! game itself.
//!
//! This crate is used by the `blueprint` command-line tool and by any editor
//! that needs to import or export blueprints.  It has no dependencies on the
//! file system, terminal, or UI; every operation is a pure function of its
//! input.
//!
//! # Wire format
//!
//! ```text
//! <version-char><base64(zlib(utf8(json-envelope)))>
//! ```
//!
//! - **`envelope`** – The JSON document inside the payload and the constants
//!   shared by both directions (version marker, packed game version, default
//!   icon list).
//!
//! - **`compression`** – Inflates a payload produced with either of the two
//!   historical stream conventions (zlib-wrapped or gzip-wrapped deflate) and
//!   deflates new payloads with the zlib convention.
//!
//! - **`codec`** – The decoder and encoder themselves, the error taxonomy, and
//!   (with the `async` feature) wrappers that run them on tokio's blocking
//!   pool.
//!
//! # Example
//!
//! ```rust
//! use blueprint_core::{decode, encode};
//! use serde_json::json;
//!
//! let entities = vec![json!({ "name": "transport-belt", "position": { "x": 0, "y": 0 } })];
//! let exchange = encode(&entities).unwrap();
//! assert!(exchange.starts_with('0'));
//! assert_eq!(decode(&exchange).unwrap(), entities);
//! ```

pub mod codec;
pub mod compression;
pub mod envelope;

pub use codec::decode::{decode, decode_envelope, inspect, Inspection};
pub use codec::encode::{encode, encode_envelope, encode_with, EncodeOptions};
pub use codec::error::{CodecError, PayloadError, Stage};
#[cfg(feature = "async")]
pub use codec::task::{
    decode_async, decode_envelope_async, encode_async, encode_envelope_async, inspect_async,
};
pub use compression::{CompressionLevel, Convention};
pub use envelope::{
    default_icons, Blueprint, Entity, Envelope, GameVersion, Icon, Signal, BLUEPRINT_ITEM,
    CODEC_GAME_VERSION, SUPPORTED_VERSION_MARKERS, VERSION_MARKER,
};
