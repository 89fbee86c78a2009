//! Deep merging of manifest documents
//!
//! Manifests describing the same package are combined rather than replaced:
//!
//! - Mappings merge key by key, recursing into nested mappings.
//! - Sequences are unioned: items from the incoming document are appended
//!   unless an equal item is already present.
//! - Scalars keep the incoming (last-loaded) value.
//! - When the two sides have different shapes the incoming value wins and a
//!   warning is logged, since that usually means a typo in one manifest.

use log::warn;
use serde_yaml::Value as YamlValue;

/// Recursively merge `source` into `target`
///
/// `path` is the dotted location of `target` inside the document and
/// `source_name` identifies the incoming manifest; both only feed log
/// messages.
pub fn merge_values(target: &mut YamlValue, source: &YamlValue, path: &str, source_name: &str) {
    match (target, source) {
        (YamlValue::Mapping(target_map), YamlValue::Mapping(source_map)) => {
            for (key, value) in source_map {
                let new_path = child_path(path, key);
                match target_map.get_mut(key) {
                    Some(existing) => merge_values(existing, value, &new_path, source_name),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (YamlValue::Sequence(target_seq), YamlValue::Sequence(source_seq)) => {
            for item in source_seq {
                if !target_seq.contains(item) {
                    target_seq.push(item.clone());
                }
            }
        }
        (target @ (YamlValue::Mapping(_) | YamlValue::Sequence(_)), source) => {
            warn!(
                "{}: Type mismatch at '{}': replacing {} with {}",
                source_name,
                path,
                type_name(target),
                type_name(source)
            );
            *target = source.clone();
        }
        (target, source) => {
            if *target != *source && !target.is_null() {
                warn!(
                    "{}: Overwriting value at '{}': {} -> {}",
                    source_name,
                    path,
                    describe(target),
                    describe(source)
                );
            }
            *target = source.clone();
        }
    }
}

/// Human-readable type name of a YAML value, for log messages
pub fn type_name(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "Null",
        YamlValue::Bool(_) => "Bool",
        YamlValue::Number(_) => "Number",
        YamlValue::String(_) => "String",
        YamlValue::Sequence(_) => "Sequence",
        YamlValue::Mapping(_) => "Mapping",
        YamlValue::Tagged(_) => "Tagged",
    }
}

fn describe(value: &YamlValue) -> String {
    match value {
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::String(s) => format!("{:?}", s),
        other => type_name(other).to_string(),
    }
}

fn child_path(path: &str, key: &YamlValue) -> String {
    let key = match key {
        YamlValue::String(s) => s.clone(),
        other => describe(other),
    };
    if path.is_empty() {
        key
    } else {
        format!("{}.{}", path, key)
    }
}
