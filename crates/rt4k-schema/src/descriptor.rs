//! Static metadata for one named setting.
//!
//! Descriptors are built once through [`SettingDescriptorBuilder`], which
//! checks the structural invariants (non-empty ranges, enum patterns sized to
//! the setting and pairwise distinct, bit settings one byte wide) so that the
//! codec never has to deal with an ambiguous layout.

use std::collections::HashSet;
use std::fmt;

use tracing::trace;

use crate::error::{ProfileError, Result};
use crate::types::{ByteRange, DataType, EnumChoice};
use crate::value::SettingValue;

/// Pure derivation: prerequisite values in declared order to raw bytes.
pub type DeriveFn = fn(&[SettingValue]) -> Result<Vec<u8>>;

/// Whether a setting is stored directly or computed from other settings.
#[derive(Clone)]
pub enum SettingKind {
    /// Written and read directly at the descriptor's byte ranges.
    Stored,
    /// Read-only; recomputed from `prerequisites` whenever the profile changes.
    Derived {
        prerequisites: Vec<String>,
        derive: DeriveFn,
    },
}

impl fmt::Debug for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored => f.write_str("Stored"),
            Self::Derived { prerequisites, .. } => f
                .debug_struct("Derived")
                .field("prerequisites", prerequisites)
                .finish_non_exhaustive(),
        }
    }
}

/// Static description of one setting in a profile image.
#[derive(Debug, Clone)]
pub struct SettingDescriptor {
    name: String,
    description: String,
    byte_ranges: Vec<ByteRange>,
    data_type: DataType,
    enums: Vec<EnumChoice>,
    kind: SettingKind,
}

impl SettingDescriptor {
    /// Start building a descriptor.
    pub fn builder(name: impl Into<String>, data_type: DataType) -> SettingDescriptorBuilder {
        SettingDescriptorBuilder {
            name: name.into(),
            description: String::new(),
            byte_ranges: Vec::new(),
            data_type,
            enums: Vec::new(),
            kind: SettingKind::Stored,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn byte_ranges(&self) -> &[ByteRange] {
        &self.byte_ranges
    }

    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Declared choices; empty unless the data type is [`DataType::Enum`].
    #[must_use]
    pub fn enums(&self) -> &[EnumChoice] {
        &self.enums
    }

    #[must_use]
    pub fn kind(&self) -> &SettingKind {
        &self.kind
    }

    /// Total length in bytes across all ranges.
    #[must_use]
    pub fn length(&self) -> usize {
        self.byte_ranges.iter().map(|range| range.length).sum()
    }

    /// Derived settings never accept direct writes.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(self.kind, SettingKind::Derived { .. })
    }

    /// Names of the settings this one is computed from, in call order.
    #[must_use]
    pub fn derived_from(&self) -> &[String] {
        match &self.kind {
            SettingKind::Stored => &[],
            SettingKind::Derived { prerequisites, .. } => prerequisites,
        }
    }

    /// Find the choice whose pattern matches `bytes` exactly.
    #[must_use]
    pub fn choice_for_bytes(&self, bytes: &[u8]) -> Option<&EnumChoice> {
        self.enums.iter().find(|choice| choice.value == bytes)
    }

    /// Find a choice by name, ignoring ASCII case.
    #[must_use]
    pub fn choice_by_name(&self, name: &str) -> Option<&EnumChoice> {
        self.enums
            .iter()
            .find(|choice| choice.name.eq_ignore_ascii_case(name))
    }

    /// Human-readable list of accepted inputs, for help text and diagnostics.
    #[must_use]
    pub fn valid_values(&self) -> Vec<String> {
        match self.data_type {
            DataType::Enum => self.enums.iter().map(|choice| choice.name.clone()).collect(),
            DataType::UnsignedInt => vec!["number between 0 and 255".to_string()],
            DataType::SignedInt => vec!["number between -128 and 128".to_string()],
            DataType::Bit => vec![
                "boolean".to_string(),
                "number between 0 and 1".to_string(),
            ],
            DataType::String => vec!["string".to_string()],
        }
    }

    /// Compute the raw bytes of a derived setting.
    ///
    /// `inputs` must hold one value per prerequisite, in declared order.
    pub fn derive_value(&self, inputs: &[SettingValue]) -> Result<Vec<u8>> {
        let SettingKind::Derived {
            prerequisites,
            derive,
        } = &self.kind
        else {
            return Err(ProfileError::wrong_type(
                &self.name,
                self.data_type,
                "derivation of a stored setting",
            ));
        };
        if inputs.len() != prerequisites.len() {
            return Err(ProfileError::validation(
                &self.name,
                format!("{} inputs", inputs.len()),
                format!("expected {} prerequisite values", prerequisites.len()),
            ));
        }
        for (input, expected) in inputs.iter().zip(prerequisites) {
            if input.name() != expected {
                return Err(ProfileError::validation(
                    &self.name,
                    input.name(),
                    format!("expected prerequisite '{expected}'"),
                ));
            }
        }
        let bytes = derive(inputs)?;
        if bytes.len() != self.length() {
            return Err(ProfileError::validation(
                &self.name,
                format!("{bytes:?}"),
                format!("derived value must be {} bytes", self.length()),
            ));
        }
        trace!(setting = %self.name, ?bytes, "derived setting value");
        Ok(bytes)
    }
}

/// Builder for [`SettingDescriptor`]; validation happens in [`build`](Self::build).
#[derive(Debug)]
pub struct SettingDescriptorBuilder {
    name: String,
    description: String,
    byte_ranges: Vec<ByteRange>,
    data_type: DataType,
    enums: Vec<EnumChoice>,
    kind: SettingKind,
}

impl SettingDescriptorBuilder {
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a byte range; multiple ranges are concatenated in call order.
    #[must_use]
    pub fn range(mut self, address: usize, length: usize) -> Self {
        self.byte_ranges.push(ByteRange::new(address, length));
        self
    }

    #[must_use]
    pub fn choices(mut self, choices: impl IntoIterator<Item = EnumChoice>) -> Self {
        self.enums.extend(choices);
        self
    }

    /// Mark the setting as derived from `prerequisites` through `derive`.
    #[must_use]
    pub fn derived_from(mut self, prerequisites: &[&str], derive: DeriveFn) -> Self {
        self.kind = SettingKind::Derived {
            prerequisites: prerequisites.iter().map(|name| (*name).to_string()).collect(),
            derive,
        };
        self
    }

    /// Validate and produce the descriptor.
    pub fn build(self) -> Result<SettingDescriptor> {
        let name = self.name;
        if name.is_empty() || name.split('.').any(str::is_empty) {
            return Err(ProfileError::validation(
                &name,
                format!("'{name}'"),
                "setting names must be non-empty dotted paths",
            ));
        }
        if self.byte_ranges.is_empty() {
            return Err(ProfileError::validation(
                &name,
                "no byte ranges",
                "a setting needs at least one byte range",
            ));
        }
        if let Some(range) = self.byte_ranges.iter().find(|range| range.length == 0) {
            return Err(ProfileError::validation(
                &name,
                range,
                "byte ranges must be at least one byte long",
            ));
        }
        let length: usize = self.byte_ranges.iter().map(|range| range.length).sum();

        match self.data_type {
            DataType::Enum => validate_choices(&name, length, &self.enums)?,
            other if !self.enums.is_empty() => {
                return Err(ProfileError::wrong_type(
                    &name,
                    other,
                    "enum choices on a non-enum setting",
                ));
            }
            DataType::Bit if length != 1 => {
                return Err(ProfileError::validation(
                    &name,
                    format!("{length} bytes"),
                    "bit settings must be exactly one byte",
                ));
            }
            _ => {}
        }

        Ok(SettingDescriptor {
            name,
            description: self.description,
            byte_ranges: self.byte_ranges,
            data_type: self.data_type,
            enums: self.enums,
            kind: self.kind,
        })
    }
}

fn validate_choices(name: &str, length: usize, choices: &[EnumChoice]) -> Result<()> {
    if choices.is_empty() {
        return Err(ProfileError::wrong_type(
            name,
            DataType::Enum,
            "enum setting without choices",
        ));
    }
    let mut seen: HashSet<&[u8]> = HashSet::with_capacity(choices.len());
    for choice in choices {
        if choice.value.len() != length {
            return Err(ProfileError::wrong_type(
                name,
                DataType::Enum,
                format!(
                    "choice '{}' is {} bytes, setting is {length}",
                    choice.name,
                    choice.value.len()
                ),
            ));
        }
        if !seen.insert(choice.value.as_slice()) {
            return Err(ProfileError::wrong_type(
                name,
                DataType::Enum,
                format!("duplicate enum value {:?} ('{}')", choice.value, choice.name),
            ));
        }
    }
    Ok(())
}
