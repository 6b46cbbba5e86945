//! The JSON envelope carried inside an exchange string.
//!
//! Once the payload has been base64-decoded and inflated it is a UTF-8 JSON
//! document of this shape:
//!
//! ```json
//! {
//!   "blueprint": {
//!     "item": "blueprint",
//!     "version": 64427130880,
//!     "icons": [{ "signal": { "type": "item", "name": "transport-belt" }, "index": 1 }],
//!     "entities": [ ... ]
//!   }
//! }
//! ```
//!
//! The codec only cares about `entities`; everything else is metadata that is
//! carried along.  Reading is permissive (only `blueprint.entities` is
//! required) while writing is strict (item, version and icons are always
//! present).

pub mod format;
pub mod model;
pub(crate) mod schema;

pub use format::{
    default_icons, GameVersion, BLUEPRINT_ITEM, CODEC_GAME_VERSION, SUPPORTED_VERSION_MARKERS,
    VERSION_MARKER,
};
pub use model::{Blueprint, Entity, Envelope, Icon, Signal};
