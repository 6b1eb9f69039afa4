//! Setting descriptors bound to concrete bytes.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::codec::{self, SettingInput};
use crate::descriptor::SettingDescriptor;
use crate::error::{ProfileError, Result};
use crate::tree;
use crate::types::DataType;

/// A descriptor plus an owned byte buffer of exactly the descriptor's length.
///
/// Enum values always hold one of the declared patterns: explicit bytes are
/// checked on construction and every [`set`](Self::set) validates before it
/// replaces the buffer.
#[derive(Debug, Clone)]
pub struct SettingValue {
    descriptor: Arc<SettingDescriptor>,
    bytes: Vec<u8>,
}

impl SettingValue {
    /// Zero-filled value. Enum settings whose zero pattern is not a declared
    /// choice start at their first choice instead.
    #[must_use]
    pub fn new(descriptor: Arc<SettingDescriptor>) -> Self {
        let mut bytes = vec![0; descriptor.length()];
        if descriptor.data_type() == DataType::Enum
            && descriptor.choice_for_bytes(&bytes).is_none()
            && let Some(first) = descriptor.enums().first()
        {
            bytes.clone_from(&first.value);
        }
        Self { descriptor, bytes }
    }

    /// Bind explicit bytes, validating length and enum membership.
    pub fn with_bytes(descriptor: Arc<SettingDescriptor>, bytes: Vec<u8>) -> Result<Self> {
        codec::validate(&descriptor, &bytes)?;
        Ok(Self { descriptor, bytes })
    }

    /// Zero-filled value with `input` applied.
    pub fn from_input(
        descriptor: Arc<SettingDescriptor>,
        input: impl Into<SettingInput>,
    ) -> Result<Self> {
        let mut value = Self::new(descriptor);
        value.set(input)?;
        Ok(value)
    }

    #[must_use]
    pub fn descriptor(&self) -> &Arc<SettingDescriptor> {
        &self.descriptor
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.descriptor.data_type()
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encode `input` into this value. On error the value is unchanged.
    pub fn set(&mut self, input: impl Into<SettingInput>) -> Result<()> {
        let input = input.into();
        let mut next = self.bytes.clone();
        codec::encode(&self.descriptor, &input, &mut next)?;
        codec::validate(&self.descriptor, &next)?;
        self.bytes = next;
        Ok(())
    }

    /// Text form: the string itself, the enum choice name, the number, or
    /// `"true"`/`"false"`.
    pub fn as_string(&self) -> Result<String> {
        Ok(match self.data_type() {
            DataType::String => codec::decode_string(&self.bytes),
            DataType::Enum => codec::decode_enum(&self.descriptor, &self.bytes)?
                .name
                .clone(),
            DataType::Bit => codec::decode_bit(&self.bytes).to_string(),
            DataType::UnsignedInt | DataType::SignedInt => {
                codec::decode_int(&self.descriptor, &self.bytes)?.to_string()
            }
        })
    }

    /// Integer form. Enum and bit settings yield their raw byte.
    pub fn as_int(&self) -> Result<i64> {
        codec::decode_int(&self.descriptor, &self.bytes)
    }

    /// Truthiness: non-empty strings and nonzero bytes are true.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self.data_type() {
            DataType::String => !codec::decode_string(&self.bytes).is_empty(),
            DataType::UnsignedInt | DataType::SignedInt | DataType::Bit | DataType::Enum => {
                codec::decode_bit(&self.bytes)
            }
        }
    }

    /// The JSON leaf for this value: strings and enum names as strings, bits
    /// as booleans, integers as numbers.
    pub fn as_json(&self) -> Result<Value> {
        Ok(match self.data_type() {
            DataType::String | DataType::Enum => Value::String(self.as_string()?),
            DataType::Bit => Value::Bool(self.as_bool()),
            DataType::UnsignedInt | DataType::SignedInt => Value::from(self.as_int()?),
        })
    }

    /// The value as a nested object along its dotted name.
    pub fn as_plain_object(&self) -> Result<Value> {
        let mut tree = Map::new();
        tree::insert_path(&mut tree, self.name(), self.as_json()?);
        Ok(Value::Object(tree))
    }

    /// Whether both values hold identical bytes.
    #[must_use]
    pub fn bytes_equal(&self, other: &SettingValue) -> bool {
        self.bytes == other.bytes
    }
}

/// Ordered collection of setting values keyed by name.
///
/// Inserting a name that is already present replaces the value in place, so
/// iteration order is first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct SettingValues {
    values: Vec<SettingValue>,
}

impl SettingValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: SettingValue) {
        match self.values.iter_mut().find(|existing| existing.name() == value.name()) {
            Some(existing) => *existing = value,
            None => self.values.push(value),
        }
    }

    /// Look up a value; unknown names fail with NotSupported.
    pub fn get(&self, name: &str) -> Result<&SettingValue> {
        self.values
            .iter()
            .find(|value| value.name() == name)
            .ok_or_else(|| ProfileError::not_supported(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SettingValue> {
        self.values.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(SettingValue::name)
    }

    /// Deep-merge every stored value's single-path tree into one object.
    ///
    /// Derived settings are left out since they cannot be written back.
    pub fn as_plain_object(&self) -> Result<Value> {
        let mut tree = Map::new();
        for value in self.values.iter().filter(|value| !value.descriptor().is_read_only()) {
            tree::insert_path(&mut tree, value.name(), value.as_json()?);
        }
        Ok(Value::Object(tree))
    }
}

impl FromIterator<SettingValue> for SettingValues {
    fn from_iter<I: IntoIterator<Item = SettingValue>>(iter: I) -> Self {
        let mut values = Self::new();
        for value in iter {
            values.insert(value);
        }
        values
    }
}

impl Extend<SettingValue> for SettingValues {
    fn extend<I: IntoIterator<Item = SettingValue>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl IntoIterator for SettingValues {
    type Item = SettingValue;
    type IntoIter = std::vec::IntoIter<SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a SettingValues {
    type Item = &'a SettingValue;
    type IntoIter = std::slice::Iter<'a, SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
