//! Exchange string → blueprint data.
//!
//! ```text
//! "0eNqVkc..."  ──marker──▶ '0'
//!               ──base64──▶ compressed bytes
//!               ──inflate─▶ UTF-8 JSON text
//!               ──parse───▶ Envelope { blueprint: { entities, .. } }
//! ```
//!
//! Each arrow is one stage of [`CodecError`]; decoding is all-or-nothing.

use base64::Engine as _;
use serde_json::Value;
use tracing::debug;

use crate::codec::error::{CodecError, PayloadError};
use crate::codec::EXCHANGE_BASE64;
use crate::compression::{self, Convention};
use crate::envelope::{schema, Entity, Envelope, GameVersion, Icon, SUPPORTED_VERSION_MARKERS};

/// Summary of an exchange string, for display and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub marker: char,
    /// Stream convention the payload was compressed with.
    pub convention: Convention,
    pub compressed_len: usize,
    pub json_len: usize,
    pub entity_count: usize,
    pub game_version: Option<GameVersion>,
    pub label: Option<String>,
    pub icons: Vec<Icon>,
}

/// A payload that has been through every stage except schema validation.
struct RawDocument {
    marker: char,
    convention: Convention,
    compressed_len: usize,
    json_len: usize,
    json: Value,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes an exchange string into its ordered entity list.
///
/// # Errors
///
/// Returns the [`CodecError`] of the first stage that fails.
///
/// # Examples
///
/// ```rust
/// use blueprint_core::{decode, encode, CodecError};
/// use serde_json::json;
///
/// let exchange = encode(&[json!({ "name": "inserter" })]).unwrap();
/// assert_eq!(decode(&exchange).unwrap(), vec![json!({ "name": "inserter" })]);
///
/// assert!(matches!(decode(""), Err(CodecError::EmptyInput)));
/// ```
pub fn decode(exchange: &str) -> Result<Vec<Entity>, CodecError> {
    decode_envelope(exchange).map(Envelope::into_entities)
}

/// Decodes an exchange string, keeping icons, version and any other
/// blueprint metadata alongside the entities.
///
/// # Errors
///
/// Same as [`decode`].
pub fn decode_envelope(exchange: &str) -> Result<Envelope, CodecError> {
    let document = read_document(exchange)?;
    schema::into_envelope(document.json)
}

/// Decodes an exchange string and reports what it contains.
///
/// # Errors
///
/// Same as [`decode`].
pub fn inspect(exchange: &str) -> Result<Inspection, CodecError> {
    let RawDocument {
        marker,
        convention,
        compressed_len,
        json_len,
        json,
    } = read_document(exchange)?;
    let envelope = schema::into_envelope(json)?;

    Ok(Inspection {
        marker,
        convention,
        compressed_len,
        json_len,
        entity_count: envelope.entities().len(),
        game_version: envelope.blueprint.version,
        label: envelope.label().map(str::to_owned),
        icons: envelope.blueprint.icons,
    })
}

// ── Stages ────────────────────────────────────────────────────────────────────

fn read_document(exchange: &str) -> Result<RawDocument, CodecError> {
    let (marker, payload) = split_marker(exchange)?;

    let compressed = EXCHANGE_BASE64.decode(payload)?;
    let inflated = compression::inflate(&compressed)?;

    let text = std::str::from_utf8(&inflated.bytes).map_err(PayloadError::from)?;
    let json: Value = serde_json::from_str(text).map_err(PayloadError::from)?;

    debug!(
        %marker,
        convention = %inflated.convention,
        compressed = compressed.len(),
        json = text.len(),
        "decoded exchange string"
    );

    Ok(RawDocument {
        marker,
        convention: inflated.convention,
        compressed_len: compressed.len(),
        json_len: text.len(),
        json,
    })
}

/// Splits off and checks the version marker.
fn split_marker(exchange: &str) -> Result<(char, &str), CodecError> {
    let mut chars = exchange.chars();
    let marker = chars.next().ok_or(CodecError::EmptyInput)?;
    if !SUPPORTED_VERSION_MARKERS.contains(&marker) {
        return Err(CodecError::UnsupportedVersion(marker));
    }
    Ok((marker, chars.as_str()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::{deflate, CompressionLevel};
    use crate::envelope::CODEC_GAME_VERSION;
    use crate::{encode, encode_with, EncodeOptions};
    use serde_json::json;

    /// Builds an exchange string around arbitrary payload bytes.
    fn exchange_of(payload: &[u8]) -> String {
        let compressed = deflate(payload, CompressionLevel::default()).unwrap();
        format!("0{}", EXCHANGE_BASE64.encode(compressed))
    }

    // ── Version marker ────────────────────────────────────────────────────────

    #[test]
    fn test_decode_empty_string_returns_empty_input() {
        assert!(matches!(decode(""), Err(CodecError::EmptyInput)));
    }

    #[test]
    fn test_decode_unknown_marker_returns_unsupported_version() {
        let valid = encode(&[]).unwrap();
        let bumped = format!("1{}", &valid[1..]);
        assert!(matches!(
            decode(&bumped),
            Err(CodecError::UnsupportedVersion('1'))
        ));
    }

    #[test]
    fn test_decode_multibyte_marker_is_reported_whole() {
        assert!(matches!(
            decode("éabc"),
            Err(CodecError::UnsupportedVersion('é'))
        ));
    }

    #[test]
    fn test_decode_marker_only_fails_in_decompression() {
        assert!(matches!(
            decode("0"),
            Err(CodecError::DecompressionFailure { .. })
        ));
    }

    // ── Base64 ────────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_invalid_alphabet_returns_malformed_encoding() {
        assert!(matches!(
            decode("0abc!def"),
            Err(CodecError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_decode_url_safe_alphabet_is_rejected() {
        assert!(matches!(
            decode("0ab-_"),
            Err(CodecError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_decode_embedded_newline_is_rejected() {
        let valid = encode(&[json!({ "name": "pipe" })]).unwrap();
        let wrapped = format!("{}\n{}", &valid[..10], &valid[10..]);
        assert!(matches!(
            decode(&wrapped),
            Err(CodecError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_decode_accepts_unpadded_payload() {
        // Pick an entity list whose compressed size is not a multiple of 3 so
        // the encoded form carries padding.
        let mut entities = vec![];
        let mut exchange = encode(&entities).unwrap();
        while !exchange.ends_with('=') {
            entities.push(json!({ "entity_number": entities.len() + 1 }));
            exchange = encode(&entities).unwrap();
        }
        let unpadded = exchange.trim_end_matches('=');
        assert_eq!(decode(unpadded).unwrap(), entities);
    }

    // ── Decompression ─────────────────────────────────────────────────────────

    #[test]
    fn test_decode_uncompressed_payload_returns_decompression_failure() {
        let exchange = format!("0{}", EXCHANGE_BASE64.encode(b"{\"blueprint\":{}}"));
        match decode(&exchange) {
            Err(CodecError::DecompressionFailure { attempted, .. }) => {
                assert_eq!(attempted, vec![Convention::Zlib, Convention::Gzip]);
            }
            other => panic!("expected DecompressionFailure, got {other:?}"),
        }
    }

    // ── Payload ───────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_invalid_utf8_returns_malformed_payload() {
        let exchange = exchange_of(&[0xFF, 0xFE, 0xFD]);
        assert!(matches!(
            decode(&exchange),
            Err(CodecError::MalformedPayload(PayloadError::Utf8(_)))
        ));
    }

    #[test]
    fn test_decode_invalid_json_returns_malformed_payload() {
        let exchange = exchange_of(b"{\"blueprint\": ");
        assert!(matches!(
            decode(&exchange),
            Err(CodecError::MalformedPayload(PayloadError::Json(_)))
        ));
    }

    // ── Schema ────────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_missing_entities_returns_schema_mismatch() {
        let exchange = exchange_of(br#"{"blueprint":{"item":"blueprint","icons":[]}}"#);
        assert!(matches!(
            decode(&exchange),
            Err(CodecError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_decode_blueprint_book_returns_schema_mismatch() {
        let exchange = exchange_of(br#"{"blueprint_book":{"blueprints":[]}}"#);
        assert!(matches!(
            decode(&exchange),
            Err(CodecError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_decode_without_icons_succeeds() {
        let exchange = exchange_of(br#"{"blueprint":{"entities":[{"name":"wooden-chest"}]}}"#);
        assert_eq!(
            decode(&exchange).unwrap(),
            vec![json!({ "name": "wooden-chest" })]
        );
    }

    #[test]
    fn test_decode_passes_non_object_entities_through() {
        let exchange = exchange_of(br#"{"blueprint":{"entities":[null, 3, "x"]}}"#);
        assert_eq!(
            decode(&exchange).unwrap(),
            vec![Value::Null, json!(3), json!("x")]
        );
    }

    // ── Envelope / inspect ────────────────────────────────────────────────────

    #[test]
    fn test_decode_envelope_keeps_metadata() {
        let options = EncodeOptions {
            label: Some("Belt balancer".to_string()),
            ..EncodeOptions::default()
        };
        let exchange = encode_with(&[json!({ "name": "splitter" })], &options).unwrap();

        let envelope = decode_envelope(&exchange).unwrap();

        assert_eq!(envelope.blueprint.version, Some(CODEC_GAME_VERSION));
        assert_eq!(envelope.label(), Some("Belt balancer"));
        assert_eq!(envelope.blueprint.icons.len(), 1);
    }

    #[test]
    fn test_inspect_reports_sizes_and_counts() {
        let entities = vec![json!({ "name": "a" }), json!({ "name": "b" })];
        let exchange = encode(&entities).unwrap();

        let report = inspect(&exchange).unwrap();

        assert_eq!(report.marker, '0');
        assert_eq!(report.convention, Convention::Zlib);
        assert_eq!(report.entity_count, 2);
        assert_eq!(report.game_version, Some(CODEC_GAME_VERSION));
        assert_eq!(report.label, None);
        assert!(report.compressed_len > 0);
        assert!(report.json_len > report.compressed_len / 2);
    }
}
