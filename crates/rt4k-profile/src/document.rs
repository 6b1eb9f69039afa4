//! The profile document: one image buffer plus the schema of its version.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use rt4k_schema::tree::flatten;
use rt4k_schema::{
    HEADER_MARKER, HEADER_SETTING, ProfileError, Result, SchemaVersion, SettingDescriptor,
    SettingInput, SettingValue, SettingValues, SettingsSchema, codec,
};

use crate::constants::{CRC_OFFSET, CRC_START};
use crate::crc::crc16;
use crate::io::{WriteOptions, read_profile_bytes, write_profile_bytes};
use crate::merge::MergeSource;
use crate::scope::{Scope, matches_any};

/// A profile image bound to its settings schema.
///
/// Reads return independent [`SettingValue`] copies. Every write validates
/// its input, splices the bytes into a copy of the buffer, recomputes the
/// derived settings and only then replaces the buffer, so a failed write
/// leaves the document unchanged.
#[derive(Clone)]
pub struct ProfileDocument {
    schema: &'static SettingsSchema,
    bytes: Vec<u8>,
}

impl ProfileDocument {
    /// Wrap a 1.4.2 image after checking its header.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_version(bytes, SchemaVersion::default())
    }

    /// Wrap an image of the given version after checking its header and size.
    pub fn from_bytes_with_version(bytes: Vec<u8>, version: SchemaVersion) -> Result<Self> {
        let schema = SettingsSchema::for_version(version);
        let header = schema.get(HEADER_SETTING)?;
        let header_text = codec::decode_string(&slice_setting(header, &bytes));
        if header_text != HEADER_MARKER {
            return Err(ProfileError::invalid_format(format!(
                "Header is invalid: {header_text}"
            )));
        }
        if bytes.len() < schema.required_len() {
            return Err(ProfileError::invalid_format(format!(
                "image is {} bytes, version {version} needs at least {}",
                bytes.len(),
                schema.required_len()
            )));
        }
        debug!(%version, len = bytes.len(), "loaded profile image");
        Ok(Self { schema, bytes })
    }

    /// Factory-default image: zero-filled, with the header and every derived
    /// setting computed.
    pub fn new_default(version: SchemaVersion) -> Result<Self> {
        let schema = SettingsSchema::for_version(version);
        let mut bytes = vec![0; schema.image_len()];
        refresh_derived(schema, &mut bytes)?;
        Ok(Self { schema, bytes })
    }

    /// Load and validate a profile file.
    pub fn build(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(read_profile_bytes(path)?)
    }

    #[cfg(feature = "async")]
    pub async fn build_async(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(crate::io::read_profile_bytes_async(path).await?)
    }

    #[must_use]
    pub fn schema(&self) -> &'static SettingsSchema {
        self.schema
    }

    #[must_use]
    pub fn version(&self) -> SchemaVersion {
        self.schema.version()
    }

    /// Every setting name of the schema, in schema order.
    #[must_use]
    pub fn setting_names(&self) -> Vec<&'static str> {
        self.schema.names().collect()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Current value of one setting.
    pub fn get_value(&self, name: &str) -> Result<SettingValue> {
        let descriptor = self.schema.get(name)?;
        SettingValue::with_bytes(descriptor.clone(), slice_setting(descriptor, &self.bytes))
    }

    /// Values of every setting selected by `scopes`, in schema order.
    ///
    /// No scopes selects everything.
    pub fn get_values(&self, scopes: &[Scope]) -> Result<SettingValues> {
        let mut values = SettingValues::new();
        for descriptor in self.schema.iter() {
            if matches_any(scopes, descriptor.name()) {
                values.insert(SettingValue::with_bytes(
                    descriptor.clone(),
                    slice_setting(descriptor, &self.bytes),
                )?);
            }
        }
        Ok(values)
    }

    /// Splice every stored value of `values` into the image at its own
    /// descriptor's ranges. Derived values in the collection are skipped.
    pub fn set_values(&mut self, values: &SettingValues) -> Result<()> {
        self.commit(|bytes| {
            for value in values.iter().filter(|value| !value.descriptor().is_read_only()) {
                splice(value.descriptor(), value.bytes(), bytes)?;
            }
            Ok(())
        })
    }

    /// Write one value. Its name must belong to the schema and must not be a
    /// derived setting.
    pub fn set_value(&mut self, value: &SettingValue) -> Result<()> {
        let descriptor = self.writable(value.name())?;
        let checked = SettingValue::with_bytes(descriptor.clone(), value.bytes().to_vec())?;
        self.commit(|bytes| splice(descriptor, checked.bytes(), bytes))
    }

    /// Encode `input` into the named setting.
    pub fn set(&mut self, name: &str, input: impl Into<SettingInput>) -> Result<()> {
        let descriptor = self.writable(name)?;
        let current = slice_setting(descriptor, &self.bytes);
        let mut value = SettingValue::with_bytes(descriptor.clone(), current)
            .unwrap_or_else(|_| SettingValue::new(descriptor.clone()));
        value.set(input)?;
        self.commit(|bytes| splice(descriptor, value.bytes(), bytes))
    }

    /// Apply a nested JSON object of setting names to primitives.
    ///
    /// Either every leaf is applied or, on the first failure, none is.
    pub fn apply_tree(&mut self, tree: &Value) -> Result<()> {
        let entries = flatten(tree).map_err(ProfileError::deserialization)?;
        let mut next = self.clone();
        for (name, input) in entries {
            next.set(&name, input)?;
        }
        *self = next;
        Ok(())
    }

    /// JSON of every stored setting; derived settings are left out.
    pub fn serialize_values(&self, pretty: bool) -> Result<String> {
        let tree = self.get_values(&[])?.as_plain_object()?;
        Ok(if pretty {
            format!("{tree:#}")
        } else {
            tree.to_string()
        })
    }

    /// Apply a JSON document produced by [`serialize_values`](Self::serialize_values)
    /// or written by hand. Any failure is reported as a single
    /// [`ProfileError::Deserialization`] and leaves the document unchanged.
    pub fn deserialize_values(&mut self, json: &str) -> Result<()> {
        let tree: Value = serde_json::from_str(json).map_err(ProfileError::deserialization)?;
        self.apply_tree(&tree).map_err(|error| match error {
            ProfileError::Deserialization { .. } => error,
            other => ProfileError::deserialization(other),
        })
    }

    /// A new document with every source applied in order over a copy of this
    /// one. Neither `self` nor any source is modified.
    pub fn merge<'a, I, S>(&self, sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<MergeSource<'a>>,
    {
        let mut merged = self.clone();
        for source in sources {
            match source.into() {
                MergeSource::Document(document) => {
                    merged.set_values(&document.get_values(&[])?)?;
                }
                MergeSource::Values(values) => merged.set_values(values)?,
                MergeSource::Value(value) => merged.set_value(value)?,
                MergeSource::Tree(tree) => merged.apply_tree(tree)?,
            }
        }
        debug!(version = %merged.version(), "merged profile sources");
        Ok(merged)
    }

    /// CRC-16/CCITT of the image from [`CRC_START`] to the end.
    #[must_use]
    pub fn crc(&self) -> u16 {
        crc16(&self.bytes, CRC_START)
    }

    /// The checksum as `0x` plus four uppercase hex digits.
    #[must_use]
    pub fn crc_string(&self) -> String {
        format!("0x{:04X}", self.crc())
    }

    /// Store the checksum little-endian at [`CRC_OFFSET`].
    pub fn write_crc(&mut self) {
        let crc = self.crc();
        self.bytes[CRC_OFFSET..CRC_OFFSET + 2].copy_from_slice(&crc.to_le_bytes());
        trace!(crc = %self.crc_string(), "wrote checksum");
    }

    /// Write the checksum, then persist the image.
    pub fn save(&mut self, path: impl AsRef<Path>, options: WriteOptions) -> Result<()> {
        self.write_crc();
        write_profile_bytes(path, &self.bytes, options)
    }

    #[cfg(feature = "async")]
    pub async fn save_async(&mut self, path: impl AsRef<Path>, options: WriteOptions) -> Result<()> {
        self.write_crc();
        crate::io::write_profile_bytes_async(path, &self.bytes, options).await
    }

    fn writable(&self, name: &str) -> Result<&'static Arc<SettingDescriptor>> {
        let descriptor = self.schema.get(name)?;
        if descriptor.is_read_only() {
            return Err(ProfileError::validation(name, "write", "setting is read-only"));
        }
        Ok(descriptor)
    }

    fn commit(&mut self, apply: impl FnOnce(&mut [u8]) -> Result<()>) -> Result<()> {
        let mut next = self.bytes.clone();
        apply(&mut next)?;
        refresh_derived(self.schema, &mut next)?;
        self.bytes = next;
        Ok(())
    }
}

impl PartialEq for ProfileDocument {
    fn eq(&self, other: &Self) -> bool {
        self.version() == other.version() && self.bytes == other.bytes
    }
}

impl Eq for ProfileDocument {}

impl fmt::Debug for ProfileDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileDocument")
            .field("version", &self.version())
            .field("len", &self.bytes.len())
            .field("crc", &self.crc_string())
            .finish()
    }
}

impl fmt::Display for ProfileDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.serialize_values(true).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Concatenate the bytes of every range of `descriptor`. Ranges past the end
/// of `bytes` read as zero.
fn slice_setting(descriptor: &SettingDescriptor, bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(descriptor.length());
    for range in descriptor.byte_ranges() {
        let start = range.address.min(bytes.len());
        let end = range.end().min(bytes.len());
        out.extend_from_slice(&bytes[start..end]);
        out.resize(out.len() + range.length - (end - start), 0);
    }
    out
}

fn splice(descriptor: &SettingDescriptor, value: &[u8], bytes: &mut [u8]) -> Result<()> {
    if value.len() != descriptor.length() {
        return Err(ProfileError::validation(
            descriptor.name(),
            format!("{} bytes", value.len()),
            format!("value must be {} bytes", descriptor.length()),
        ));
    }
    let mut offset = 0;
    for range in descriptor.byte_ranges() {
        let target = bytes.get_mut(range.address..range.end()).ok_or_else(|| {
            ProfileError::validation(descriptor.name(), range, "range is outside the image")
        })?;
        target.copy_from_slice(&value[offset..offset + range.length]);
        offset += range.length;
    }
    trace!(setting = descriptor.name(), ?value, "spliced setting");
    Ok(())
}

fn refresh_derived(schema: &SettingsSchema, bytes: &mut [u8]) -> Result<()> {
    for descriptor in schema.derived() {
        let inputs = descriptor
            .derived_from()
            .iter()
            .map(|name| {
                let prerequisite = schema.get(name)?;
                SettingValue::with_bytes(prerequisite.clone(), slice_setting(prerequisite, bytes))
            })
            .collect::<Result<Vec<_>>>()?;
        let derived = descriptor.derive_value(&inputs)?;
        splice(descriptor, &derived, bytes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rt4k_schema::ErrorKind;

    use super::*;

    fn default_document() -> ProfileDocument {
        ProfileDocument::new_default(SchemaVersion::V1_4_2).unwrap()
    }

    #[test]
    fn test_default_image() {
        let document = default_document();
        assert_eq!(document.as_bytes().len(), 0x5870);
        assert_eq!(&document.as_bytes()[..12], b"RT4K Profile");
        assert_eq!(document.get_value("input").unwrap().as_string().unwrap(), "HDMI");
        assert_eq!(document.get_value("input.audio").unwrap().as_int().unwrap(), 5);
    }

    #[test]
    fn test_derived_setting_follows_writes() {
        let mut document = default_document();
        document.set("input", "SCART|RGsB").unwrap();
        assert_eq!(document.get_value("input.audio").unwrap().as_int().unwrap(), 2);
        document
            .set("advanced.acquisition.audio_input.source.input_override", "Front")
            .unwrap();
        assert_eq!(document.get_value("input.audio").unwrap().as_int().unwrap(), 3);
    }

    #[test]
    fn test_derived_setting_is_read_only() {
        let mut document = default_document();
        let err = document.set("input.audio", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("read-only"));
        let err = document.set("header", "Not a profile").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_failed_write_leaves_document_unchanged() {
        let mut document = default_document();
        let before = document.clone();
        assert!(document.set("advanced.effects.mask.strength", 500).is_err());
        assert_eq!(document, before);
    }

    #[test]
    fn test_truncated_image_is_invalid() {
        let mut bytes = default_document().to_bytes();
        bytes.truncate(0x1000);
        let err = ProfileDocument::from_bytes(bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_slice_concatenates_ranges() {
        let descriptor = SettingDescriptor::builder("split", rt4k_schema::DataType::String)
            .range(4, 2)
            .range(0, 2)
            .build()
            .unwrap();
        assert_eq!(slice_setting(&descriptor, b"abcdef"), b"efab");
        assert_eq!(slice_setting(&descriptor, b"ab"), vec![0, 0, b'a', b'b']);

        let mut bytes = *b"......";
        splice(&descriptor, b"XYZW", &mut bytes).unwrap();
        assert_eq!(&bytes, b"ZW..XY");
    }
}
