//! RetroTINK 4K profile documents.
//!
//! [`ProfileDocument`] owns a profile image and reads, writes, merges and
//! (de)serializes its settings through the schema in `rt4k-schema`:
//!
//! ```
//! use rt4k_profile::{ProfileDocument, SchemaVersion, Scope};
//!
//! let mut profile = ProfileDocument::new_default(SchemaVersion::V1_4_2).unwrap();
//! profile.set("advanced.effects.mask.strength", -4).unwrap();
//!
//! let mask = profile.get_values(&[Scope::prefix("advanced.effects.mask")]).unwrap();
//! assert_eq!(mask.get("advanced.effects.mask.strength").unwrap().as_int().unwrap(), -4);
//! ```
//!
//! Files are read and written through [`io`]; enable the `async` feature for
//! the tokio-based variants.

pub mod constants;
pub mod crc;
pub mod document;
pub mod io;
pub mod merge;
pub mod scope;

pub use document::ProfileDocument;
pub use io::{WriteOptions, read_profile_bytes, write_profile_bytes};
#[cfg(feature = "async")]
pub use io::{read_profile_bytes_async, write_profile_bytes_async};
pub use merge::MergeSource;
pub use scope::Scope;

pub use rt4k_schema::{
    DataType, ErrorKind, ProfileError, Result, SchemaVersion, SettingInput, SettingValue,
    SettingValues, SettingsSchema,
};
