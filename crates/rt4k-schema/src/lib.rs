//! Settings schema and byte codec for RetroTINK 4K profiles.
//!
//! A profile is a fixed-layout binary image. This crate describes where each
//! named setting lives in that image, how its bytes are interpreted, and how
//! typed values move between bytes, primitives and JSON trees:
//!
//! - [`SettingDescriptor`]: byte ranges, [`DataType`], enum choices and an
//!   optional derivation for one setting
//! - [`SettingsSchema`]: the ordered, validated descriptor set for one
//!   [`SchemaVersion`]
//! - [`SettingValue`] / [`SettingValues`]: descriptors bound to owned bytes
//! - [`codec`]: per-type encode/decode
//! - [`tree`]: dotted names to nested JSON objects and back
//!
//! # Example
//!
//! ```
//! use rt4k_schema::{SchemaVersion, SettingValue, SettingsSchema};
//!
//! let schema = SettingsSchema::for_version(SchemaVersion::V1_4_2);
//! let descriptor = schema.get("advanced.effects.mask.strength").unwrap();
//! let value = SettingValue::from_input(descriptor.clone(), -4).unwrap();
//! assert_eq!(value.bytes(), &[252]);
//! ```

pub mod codec;
pub mod descriptor;
pub mod error;
pub mod schema;
pub mod tree;
pub mod types;
pub mod value;
pub mod versions;

pub use codec::SettingInput;
pub use descriptor::{DeriveFn, SettingDescriptor, SettingDescriptorBuilder, SettingKind};
pub use error::{ErrorKind, ProfileError, Result};
pub use schema::{SchemaVersion, SettingsSchema};
pub use tree::TreeError;
pub use types::{ByteRange, DataType, EnumChoice};
pub use value::{SettingValue, SettingValues};

/// Name of the read-only header setting present in every schema.
pub const HEADER_SETTING: &str = "header";

/// Literal every valid profile starts with.
pub const HEADER_MARKER: &str = "RT4K Profile";
