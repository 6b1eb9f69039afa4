//! Conversion between flat dotted setting names and nested JSON trees.
//!
//! `"output.transmitter.hdr" = "Off"` becomes
//! `{"output": {"transmitter": {"hdr": "Off"}}}` and back. Arrays are never
//! valid in a settings tree.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::codec::SettingInput;

/// Reasons a JSON tree cannot be flattened into setting inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("arrays are not valid setting values (at '{path}')")]
    ArrayValue { path: String },

    #[error("null is not a valid setting value (at '{path}')")]
    NullValue { path: String },

    #[error("settings document must be a JSON object")]
    NotAnObject,

    #[error("number at '{path}' is not an integer")]
    NonIntegerNumber { path: String },

    #[error("number {number} at '{path}' is too large")]
    NumberOutOfRange { path: String, number: String },
}

/// Insert `leaf` at the dotted `name`, creating intermediate objects.
///
/// An existing non-object node on the path is replaced by an object.
pub fn insert_path(tree: &mut Map<String, Value>, name: &str, leaf: Value) {
    let mut segments = name.split('.').peekable();
    let mut level = tree;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            level.insert(segment.to_string(), leaf);
            return;
        }
        let child = level
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !child.is_object() {
            *child = Value::Object(Map::new());
        }
        let Value::Object(next) = child else {
            return;
        };
        level = next;
    }
}

/// Build a nested tree from `(dotted name, leaf)` pairs, in iteration order.
pub fn expand<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    let mut tree = Map::new();
    for (name, leaf) in entries {
        insert_path(&mut tree, name, leaf);
    }
    Value::Object(tree)
}

/// Merge `source` into `target`.
///
/// Objects merge key by key; any other node in `source` overwrites the
/// corresponding node in `target`.
pub fn deep_merge(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, source_child) in source_map {
                match target_map.get_mut(key) {
                    Some(target_child) => deep_merge(target_child, source_child),
                    None => {
                        target_map.insert(key.clone(), source_child.clone());
                    }
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

/// Flatten a nested tree into `(dotted name, input)` pairs in document order.
pub fn flatten(tree: &Value) -> Result<Vec<(String, SettingInput)>, TreeError> {
    let Value::Object(map) = tree else {
        return Err(TreeError::NotAnObject);
    };
    let mut out = Vec::new();
    flatten_into(map, "", &mut out)?;
    Ok(out)
}

fn flatten_into(
    map: &Map<String, Value>,
    prefix: &str,
    out: &mut Vec<(String, SettingInput)>,
) -> Result<(), TreeError> {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(child) => flatten_into(child, &path, out)?,
            leaf => {
                let input = leaf_input(&path, leaf)?;
                out.push((path, input));
            }
        }
    }
    Ok(())
}

/// Convert one JSON leaf into a [`SettingInput`].
pub fn leaf_input(path: &str, leaf: &Value) -> Result<SettingInput, TreeError> {
    match leaf {
        Value::String(text) => Ok(SettingInput::Text(text.clone())),
        Value::Bool(flag) => Ok(SettingInput::Bool(*flag)),
        Value::Number(number) => {
            let out_of_range = || TreeError::NumberOutOfRange {
                path: path.to_string(),
                number: number.to_string(),
            };
            if let Some(int) = number.as_i64() {
                Ok(SettingInput::Number(int))
            } else if number.is_u64() {
                Err(out_of_range())
            } else {
                match number.as_f64() {
                    Some(float) if float.fract() == 0.0 && float.abs() < 9.0e15 => {
                        Ok(SettingInput::Number(float as i64))
                    }
                    Some(float) if float.fract() == 0.0 => Err(out_of_range()),
                    _ => Err(TreeError::NonIntegerNumber {
                        path: path.to_string(),
                    }),
                }
            }
        }
        Value::Array(_) => Err(TreeError::ArrayValue {
            path: path.to_string(),
        }),
        Value::Null => Err(TreeError::NullValue {
            path: path.to_string(),
        }),
        Value::Object(_) => Err(TreeError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_expand_and_flatten() {
        let tree = expand([
            ("output.transmitter.hdr", json!("Off")),
            ("output.resolution", json!("4K60")),
            ("advanced.effects.mask.strength", json!(-4)),
        ]);
        assert_eq!(
            tree,
            json!({
                "output": {"transmitter": {"hdr": "Off"}, "resolution": "4K60"},
                "advanced": {"effects": {"mask": {"strength": -4}}}
            })
        );

        let flat = flatten(&tree).unwrap();
        assert_eq!(
            flat,
            vec![
                ("output.transmitter.hdr".to_string(), SettingInput::from("Off")),
                ("output.resolution".to_string(), SettingInput::from("4K60")),
                ("advanced.effects.mask.strength".to_string(), SettingInput::Number(-4)),
            ]
        );
    }

    #[test]
    fn test_deep_merge_last_wins() {
        let mut target = json!({"a": {"b": 1, "c": {"d": true}}, "e": "x"});
        deep_merge(&mut target, &json!({"a": {"c": {"d": false, "f": 2}}, "e": {"g": 3}}));
        assert_eq!(
            target,
            json!({"a": {"b": 1, "c": {"d": false, "f": 2}}, "e": {"g": 3}})
        );
    }

    #[test]
    fn test_flatten_rejects_arrays_and_nulls() {
        let err = flatten(&json!({"input": ["HDMI"]})).unwrap_err();
        assert_eq!(err, TreeError::ArrayValue { path: "input".to_string() });

        let err = flatten(&json!({"output": {"resolution": null}})).unwrap_err();
        assert_eq!(
            err,
            TreeError::NullValue {
                path: "output.resolution".to_string()
            }
        );

        assert_eq!(flatten(&json!([1, 2])).unwrap_err(), TreeError::NotAnObject);
    }

    #[test]
    fn test_leaf_numbers() {
        assert_eq!(leaf_input("n", &json!(4.0)).unwrap(), SettingInput::Number(4));
        assert_eq!(
            leaf_input("n", &json!(1.5)).unwrap_err(),
            TreeError::NonIntegerNumber { path: "n".to_string() }
        );
        assert_eq!(
            leaf_input("n", &json!(u64::MAX)).unwrap_err(),
            TreeError::NumberOutOfRange {
                path: "n".to_string(),
                number: u64::MAX.to_string(),
            }
        );
        assert_eq!(
            leaf_input("n", &json!(i64::MIN)).unwrap(),
            SettingInput::Number(i64::MIN)
        );
    }
}
