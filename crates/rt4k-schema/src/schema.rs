//! Ordered, immutable settings schemas, one per supported profile version.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::descriptor::{SettingDescriptor, SettingKind};
use crate::error::{ProfileError, Result};
use crate::versions;

/// Supported profile file-format versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemaVersion {
    #[default]
    V1_4_2,
}

impl SchemaVersion {
    /// Every supported version, oldest first.
    pub const ALL: &'static [SchemaVersion] = &[SchemaVersion::V1_4_2];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V1_4_2 => "1.4.2",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches(['v', 'V']);
        Self::ALL
            .iter()
            .copied()
            .find(|version| version.as_str() == trimmed)
            .ok_or_else(|| ProfileError::not_supported(format!("schema version {s}")))
    }
}

/// Ordered mapping of setting name to descriptor.
///
/// Construction checks that names are unique, that no two settings share a
/// byte, and that every derived setting's prerequisites are stored settings
/// of the same schema.
#[derive(Debug)]
pub struct SettingsSchema {
    version: SchemaVersion,
    settings: Vec<Arc<SettingDescriptor>>,
    index: HashMap<String, usize>,
    required_len: usize,
}

impl SettingsSchema {
    pub fn new(version: SchemaVersion, descriptors: Vec<SettingDescriptor>) -> Result<Self> {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (position, descriptor) in descriptors.iter().enumerate() {
            if index.insert(descriptor.name().to_string(), position).is_some() {
                return Err(ProfileError::validation(
                    descriptor.name(),
                    version,
                    "duplicate setting name in schema",
                ));
            }
        }

        let mut ranges: Vec<_> = descriptors
            .iter()
            .flat_map(|descriptor| {
                descriptor
                    .byte_ranges()
                    .iter()
                    .map(move |range| (*range, descriptor.name()))
            })
            .collect();
        ranges.sort_by_key(|(range, _)| range.address);
        for pair in ranges.windows(2) {
            let (first, first_name) = pair[0];
            let (second, second_name) = pair[1];
            if first.overlaps(&second) {
                return Err(ProfileError::validation(
                    second_name,
                    second,
                    format!("overlaps {first_name} at {first}"),
                ));
            }
        }

        for descriptor in &descriptors {
            for prerequisite in descriptor.derived_from() {
                let Some(&position) = index.get(prerequisite) else {
                    return Err(ProfileError::not_supported(prerequisite.as_str()));
                };
                if descriptors[position].is_read_only() {
                    return Err(ProfileError::validation(
                        descriptor.name(),
                        prerequisite,
                        "prerequisites must be stored settings",
                    ));
                }
            }
        }

        let required_len = ranges
            .iter()
            .map(|(range, _)| range.end())
            .max()
            .unwrap_or(0);
        debug!(
            %version,
            settings = descriptors.len(),
            required_len,
            "built settings schema"
        );
        Ok(Self {
            version,
            settings: descriptors.into_iter().map(Arc::new).collect(),
            index,
            required_len,
        })
    }

    /// The process-wide schema for `version`.
    #[must_use]
    pub fn for_version(version: SchemaVersion) -> &'static SettingsSchema {
        match version {
            SchemaVersion::V1_4_2 => versions::v1_4_2::schema(),
        }
    }

    #[must_use]
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Look up a descriptor; unknown names fail with NotSupported.
    pub fn get(&self, name: &str) -> Result<&Arc<SettingDescriptor>> {
        self.index
            .get(name)
            .map(|&position| &self.settings[position])
            .ok_or_else(|| ProfileError::not_supported(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<SettingDescriptor>> {
        self.settings.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.settings.iter().map(|descriptor| descriptor.name())
    }

    /// Derived descriptors in declaration order.
    pub fn derived(&self) -> impl Iterator<Item = &Arc<SettingDescriptor>> {
        self.settings
            .iter()
            .filter(|descriptor| matches!(descriptor.kind(), SettingKind::Derived { .. }))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Smallest buffer that holds every setting.
    #[must_use]
    pub fn required_len(&self) -> usize {
        self.required_len
    }

    /// Length of a freshly created image: the required length rounded up to
    /// a 16-byte boundary.
    #[must_use]
    pub fn image_len(&self) -> usize {
        self.required_len.next_multiple_of(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::DataType;

    fn stored(name: &str, address: usize) -> SettingDescriptor {
        SettingDescriptor::builder(name, DataType::UnsignedInt)
            .range(address, 1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!("1.4.2".parse::<SchemaVersion>().unwrap(), SchemaVersion::V1_4_2);
        assert_eq!("v1.4.2".parse::<SchemaVersion>().unwrap(), SchemaVersion::V1_4_2);
        let err = "9.9.9".parse::<SchemaVersion>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
        assert_eq!(SchemaVersion::V1_4_2.to_string(), "1.4.2");
    }

    #[test]
    fn test_lookup_and_order() {
        let schema = SettingsSchema::new(
            SchemaVersion::V1_4_2,
            vec![stored("b.second", 4), stored("a.first", 2)],
        )
        .unwrap();
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["b.second", "a.first"]);
        assert_eq!(schema.get("a.first").unwrap().byte_ranges()[0].address, 2);
        let err = schema.get("c.missing").unwrap_err();
        assert_eq!(err.to_string(), "setting not supported: c.missing");
        assert_eq!(schema.required_len(), 5);
        assert_eq!(schema.image_len(), 16);
    }

    #[test]
    fn test_rejects_duplicates_and_overlaps() {
        let err = SettingsSchema::new(
            SchemaVersion::V1_4_2,
            vec![stored("a", 0), stored("a", 1)],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let wide = SettingDescriptor::builder("wide", DataType::String)
            .range(0, 4)
            .build()
            .unwrap();
        let err = SettingsSchema::new(SchemaVersion::V1_4_2, vec![wide, stored("inner", 2)])
            .unwrap_err();
        assert!(err.to_string().contains("overlaps wide"));
    }

    #[test]
    fn test_rejects_unknown_prerequisite() {
        let derived = SettingDescriptor::builder("derived", DataType::UnsignedInt)
            .range(0, 1)
            .derived_from(&["missing"], |_| Ok(vec![0]))
            .build()
            .unwrap();
        let err = SettingsSchema::new(SchemaVersion::V1_4_2, vec![derived]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }
}
