//! Typed view of the envelope document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::envelope::format::{default_icons, GameVersion, BLUEPRINT_ITEM, CODEC_GAME_VERSION};

/// One placed entity.  The codec never looks inside it.
pub type Entity = Value;

/// A signal reference used by blueprint icons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Signal category, e.g. `"item"` or `"virtual"`.  Newer exports leave
    /// it out for items.
    #[serde(rename = "type", default = "default_signal_kind")]
    pub kind: String,
    pub name: String,
}

/// A display icon shown for the blueprint in the game's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    pub signal: Signal,
    /// 1-based icon slot.
    pub index: u32,
}

/// The `blueprint` object of the envelope.
///
/// Only `entities` must be well-formed.  An ill-typed `item`, `version` or
/// icon is dropped on read rather than failing the decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    #[serde(default = "default_item", deserialize_with = "lenient_item")]
    pub item: String,
    #[serde(
        default,
        deserialize_with = "lenient_version",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<GameVersion>,
    #[serde(default, deserialize_with = "lenient_icons")]
    pub icons: Vec<Icon>,
    pub entities: Vec<Entity>,
    /// Any other keys (`label`, `description`, `tiles`, ...), carried through
    /// unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The complete JSON document inside an exchange string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub blueprint: Blueprint,
}

fn default_item() -> String {
    BLUEPRINT_ITEM.to_string()
}

fn default_signal_kind() -> String {
    "item".to_string()
}

fn lenient_item<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(item) => Ok(item),
        other => {
            debug!(%other, "ignoring non-string blueprint item");
            Ok(default_item())
        }
    }
}

fn lenient_version<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<GameVersion>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let version = raw.as_u64().map(GameVersion::from_packed);
    if version.is_none() && !raw.is_null() {
        debug!(%raw, "ignoring unreadable blueprint version");
    }
    Ok(version)
}

fn lenient_icons<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Icon>, D::Error> {
    let Value::Array(raw) = Value::deserialize(deserializer)? else {
        debug!("ignoring non-array blueprint icons");
        return Ok(Vec::new());
    };
    Ok(raw
        .into_iter()
        .filter_map(|icon| match serde_json::from_value(icon) {
            Ok(icon) => Some(icon),
            Err(e) => {
                debug!("ignoring unreadable blueprint icon: {e}");
                None
            }
        })
        .collect())
}

impl Envelope {
    /// Builds the envelope the encoder writes for `entities`: constant item
    /// and version, default icons.
    pub fn new(entities: Vec<Entity>) -> Self {
        Self::with_icons(entities, default_icons())
    }

    /// Like [`Envelope::new`] with a caller-chosen icon list.
    pub fn with_icons(entities: Vec<Entity>, icons: Vec<Icon>) -> Self {
        Self {
            blueprint: Blueprint {
                item: default_item(),
                version: Some(CODEC_GAME_VERSION),
                icons,
                entities,
                extra: Map::new(),
            },
        }
    }

    /// Returns the form written on encode.
    ///
    /// `item` and `version` are codec constants regardless of what was read,
    /// and an empty icon list is replaced by [`default_icons`].  Entities and
    /// extra keys are untouched.
    pub fn normalized(mut self) -> Self {
        self.blueprint.item = default_item();
        self.blueprint.version = Some(CODEC_GAME_VERSION);
        if self.blueprint.icons.is_empty() {
            self.blueprint.icons = default_icons();
        }
        self
    }

    pub fn entities(&self) -> &[Entity] {
        &self.blueprint.entities
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.blueprint.entities
    }

    /// The blueprint's `label`, if it has a string one.
    pub fn label(&self) -> Option<&str> {
        self.blueprint.extra.get("label").and_then(Value::as_str)
    }

    /// Sets (or replaces) the blueprint's `label`.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.blueprint
            .extra
            .insert("label".to_string(), Value::String(label.into()));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
