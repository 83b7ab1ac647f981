//! Deterministic manifest serialization.
//!
//! The serializer owns output determinism: dependency bucket keys are sorted
//! by codepoint, everything else keeps the base manifest's declared order.
//! Two runs over equal inputs produce byte-identical documents.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::core::{DependencyBucket, PackageManifest};
use crate::util::OutputConfig;

/// Serialize a manifest to a JSON document.
///
/// `replacer` (when set) whitelists top-level fields; dependency buckets
/// always pass the filter. `space` is the indentation width, 0 meaning
/// compact output.
pub fn to_json(manifest: &PackageManifest, output: &OutputConfig) -> Result<String> {
    let mut fields = Map::new();

    for (key, value) in manifest.fields() {
        if !retain_field(key, output) {
            continue;
        }

        let value = if is_bucket(key) {
            sorted_object(value)
        } else {
            value.clone()
        };
        fields.insert(key.clone(), value);
    }

    let value = Value::Object(fields);

    if output.space == 0 {
        return serde_json::to_string(&value).context("failed to serialize manifest");
    }

    let indent = " ".repeat(output.space);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .context("failed to serialize manifest")?;

    String::from_utf8(buf).context("serialized manifest is not UTF-8")
}

fn is_bucket(key: &str) -> bool {
    DependencyBucket::ALL.iter().any(|bucket| bucket.key() == key)
}

fn retain_field(key: &str, output: &OutputConfig) -> bool {
    if is_bucket(key) {
        return true;
    }
    match &output.replacer {
        Some(keep) => keep.iter().any(|k| k == key),
        None => true,
    }
}

/// Rebuild an object value with its keys in codepoint order.
fn sorted_object(value: &Value) -> Value {
    match value.as_object() {
        Some(object) => {
            let sorted: BTreeMap<&String, &Value> = object.iter().collect();
            let mut out = Map::new();
            for (key, value) in sorted {
                out.insert(key.clone(), value.clone());
            }
            Value::Object(out)
        }
        None => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(json: &str) -> PackageManifest {
        PackageManifest::parse(json).unwrap()
    }

    #[test]
    fn test_dependency_keys_sorted() {
        let m = manifest(r#"{"dependencies": {"foo": "2.0.0", "bar": "1.0.0"}}"#);
        let json = to_json(&m, &OutputConfig::default()).unwrap();

        let bar = json.find("\"bar\"").unwrap();
        let foo = json.find("\"foo\"").unwrap();
        assert!(bar < foo, "keys must appear in codepoint order");
    }

    #[test]
    fn test_top_level_order_preserved() {
        let m = manifest(r#"{"version": "1.0.0", "name": "app", "main": "index.js"}"#);
        let json = to_json(&m, &OutputConfig::default()).unwrap();

        let version = json.find("\"version\"").unwrap();
        let name = json.find("\"name\"").unwrap();
        let main = json.find("\"main\"").unwrap();
        assert!(version < name && name < main);
    }

    #[test]
    fn test_default_indentation_is_two_spaces() {
        let m = manifest(r#"{"name": "app"}"#);
        let json = to_json(&m, &OutputConfig::default()).unwrap();
        assert_eq!(json, "{\n  \"name\": \"app\"\n}");
    }

    #[test]
    fn test_space_zero_is_compact() {
        let m = manifest(r#"{"name": "app", "dependencies": {"a": "1"}}"#);
        let output = OutputConfig {
            space: 0,
            replacer: None,
        };
        let json = to_json(&m, &output).unwrap();
        assert_eq!(json, r#"{"name":"app","dependencies":{"a":"1"}}"#);
    }

    #[test]
    fn test_replacer_filters_top_level_fields() {
        let m = manifest(
            r#"{"name": "app", "scripts": {"build": "x"}, "dependencies": {"a": "1.0.0"}}"#,
        );
        let output = OutputConfig {
            space: 2,
            replacer: Some(vec!["name".to_string()]),
        };
        let json = to_json(&m, &output).unwrap();

        assert!(json.contains("\"name\""));
        assert!(!json.contains("\"scripts\""));
        // Buckets always pass the filter.
        assert!(json.contains("\"dependencies\""));
    }

    #[test]
    fn test_byte_identical_across_runs() {
        let m = manifest(r#"{"name": "app", "dependencies": {"z": "1", "a": "2"}}"#);
        let first = to_json(&m, &OutputConfig::default()).unwrap();
        let second = to_json(&m, &OutputConfig::default()).unwrap();
        assert_eq!(first, second);
    }
}
