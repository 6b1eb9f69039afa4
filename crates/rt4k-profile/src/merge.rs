//! Sources accepted by [`ProfileDocument::merge`](crate::ProfileDocument::merge).

use rt4k_schema::{SettingValue, SettingValues};
use serde_json::Value;

use crate::document::ProfileDocument;

/// One input to a merge; later sources win over earlier ones.
#[derive(Debug, Clone, Copy)]
pub enum MergeSource<'a> {
    /// Every stored setting of another document.
    Document(&'a ProfileDocument),
    /// A collection of values.
    Values(&'a SettingValues),
    /// A single value.
    Value(&'a SettingValue),
    /// A nested JSON object of setting names to primitives.
    Tree(&'a Value),
}

impl<'a> From<&'a ProfileDocument> for MergeSource<'a> {
    fn from(document: &'a ProfileDocument) -> Self {
        Self::Document(document)
    }
}

impl<'a> From<&'a SettingValues> for MergeSource<'a> {
    fn from(values: &'a SettingValues) -> Self {
        Self::Values(values)
    }
}

impl<'a> From<&'a SettingValue> for MergeSource<'a> {
    fn from(value: &'a SettingValue) -> Self {
        Self::Value(value)
    }
}

impl<'a> From<&'a Value> for MergeSource<'a> {
    fn from(tree: &'a Value) -> Self {
        Self::Tree(tree)
    }
}
