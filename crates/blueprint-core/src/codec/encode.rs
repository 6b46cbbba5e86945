//! Blueprint data → exchange string.

use base64::Engine as _;
use tracing::debug;

use crate::codec::error::{CodecError, PayloadError};
use crate::codec::EXCHANGE_BASE64;
use crate::compression::{self, CompressionLevel};
use crate::envelope::{Entity, Envelope, Icon, VERSION_MARKER};

/// Caller choices for [`encode_with`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeOptions {
    /// Icons to show for the blueprint; `None` (or an empty list) uses the
    /// default icon list.
    pub icons: Option<Vec<Icon>>,
    /// Optional blueprint label.
    pub label: Option<String>,
    pub level: CompressionLevel,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an ordered entity list with the default icons.
///
/// # Errors
///
/// Returns [`CodecError::CompressionFailure`] if the compressor fails, which
/// does not happen for in-memory input in practice.
///
/// # Examples
///
/// ```rust
/// use blueprint_core::encode;
/// use serde_json::json;
///
/// let exchange = encode(&[json!({ "name": "transport-belt" })]).unwrap();
/// assert!(exchange.starts_with('0'));
/// ```
pub fn encode(entities: &[Entity]) -> Result<String, CodecError> {
    encode_with(entities, &EncodeOptions::default())
}

/// Encodes an ordered entity list with caller-supplied options.
///
/// # Errors
///
/// Same as [`encode`].
pub fn encode_with(entities: &[Entity], options: &EncodeOptions) -> Result<String, CodecError> {
    let mut envelope =
        Envelope::with_icons(entities.to_vec(), options.icons.clone().unwrap_or_default());
    if let Some(label) = &options.label {
        envelope.set_label(label.clone());
    }
    write_envelope(envelope, options.level)
}

/// Encodes a complete envelope, carrying its extra blueprint keys.
///
/// The envelope is [normalized](Envelope::normalized) first, so `item` and
/// `version` are always the codec constants and icons are never empty.
///
/// # Errors
///
/// Same as [`encode`].
pub fn encode_envelope(envelope: &Envelope, level: CompressionLevel) -> Result<String, CodecError> {
    write_envelope(envelope.clone(), level)
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

fn write_envelope(envelope: Envelope, level: CompressionLevel) -> Result<String, CodecError> {
    let envelope = envelope.normalized();

    let json = serde_json::to_vec(&envelope).map_err(PayloadError::from)?;
    let compressed = compression::deflate(&json, level)?;

    let mut exchange = String::with_capacity(1 + (compressed.len() + 2) / 3 * 4);
    exchange.push(VERSION_MARKER);
    EXCHANGE_BASE64.encode_string(&compressed, &mut exchange);

    debug!(
        entities = envelope.entities().len(),
        json = json.len(),
        compressed = compressed.len(),
        "encoded exchange string"
    );
    Ok(exchange)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
