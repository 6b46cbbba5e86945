//! Constants shared by the decoder and the encoder.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::envelope::model::{Icon, Signal};

// ── Exchange-string constants ─────────────────────────────────────────────────

/// Leading character written in front of every exchange string we produce.
pub const VERSION_MARKER: char = '0';

/// Leading characters accepted on decode.
pub const SUPPORTED_VERSION_MARKERS: &[char] = &[VERSION_MARKER];

/// Value of `blueprint.item` for a single blueprint.
pub const BLUEPRINT_ITEM: &str = "blueprint";

/// Game version stamped into every encoded envelope (0.15.40.0).
pub const CODEC_GAME_VERSION: GameVersion = GameVersion::new(0, 15, 40, 0);

/// Icon list used when the caller does not supply one.
pub fn default_icons() -> Vec<Icon> {
    vec![Icon {
        signal: Signal {
            kind: "item".to_string(),
            name: "transport-belt".to_string(),
        },
        index: 1,
    }]
}

// ── Packed game version ───────────────────────────────────────────────────────

/// A game version packed into a single integer.
///
/// The envelope's `version` field stores four 16-bit components in one `u64`:
///
/// ```text
/// [major:16][minor:16][patch:16][build:16]
/// ```
///
/// so `0.15.40.0` is `15 << 32 | 40 << 16`.  On the wire it is a plain JSON
/// number.
///
/// # Examples
///
/// ```rust
/// use blueprint_core::GameVersion;
///
/// let v = GameVersion::new(0, 17, 53, 0);
/// assert_eq!(v.packed(), 73_017_917_440);
/// assert_eq!(v.to_string(), "0.17.53.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameVersion(u64);

impl GameVersion {
    /// Packs the four components.
    pub const fn new(major: u16, minor: u16, patch: u16, build: u16) -> Self {
        Self(
            (major as u64) << 48 | (minor as u64) << 32 | (patch as u64) << 16 | build as u64,
        )
    }

    /// Wraps an already-packed value.
    pub const fn from_packed(packed: u64) -> Self {
        Self(packed)
    }

    /// The packed integer as written to the envelope.
    pub const fn packed(self) -> u64 {
        self.0
    }

    pub const fn major(self) -> u16 {
        (self.0 >> 48) as u16
    }

    pub const fn minor(self) -> u16 {
        (self.0 >> 32) as u16
    }

    pub const fn patch(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn build(self) -> u16 {
        self.0 as u16
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major(),
            self.minor(),
            self.patch(),
            self.build()
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
