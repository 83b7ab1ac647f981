//! `package.json` manifest model.
//!
//! The manifest is carried as an order-preserving JSON object so that the
//! user's own top-level fields round-trip in their declared order. Only the
//! three dependency buckets get typed access; everything else is opaque.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

/// The three dependency buckets of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyBucket {
    /// `dependencies`
    Runtime,
    /// `devDependencies`
    Development,
    /// `peerDependencies`
    Peer,
}

impl DependencyBucket {
    /// Fixed pass order for the merge engine.
    pub const ALL: [DependencyBucket; 3] = [
        DependencyBucket::Runtime,
        DependencyBucket::Development,
        DependencyBucket::Peer,
    ];

    /// The manifest field name for this bucket.
    pub fn key(&self) -> &'static str {
        match self {
            DependencyBucket::Runtime => "dependencies",
            DependencyBucket::Development => "devDependencies",
            DependencyBucket::Peer => "peerDependencies",
        }
    }
}

impl fmt::Display for DependencyBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A parsed `package.json` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageManifest {
    fields: Map<String, Value>,
}

impl PackageManifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse manifest content.
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).context("manifest is not valid JSON")?;

        match value {
            Value::Object(fields) => Ok(PackageManifest { fields }),
            other => bail!("manifest must be a JSON object, got {}", json_kind(&other)),
        }
    }

    /// Build a manifest from raw fields.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        PackageManifest { fields }
    }

    /// The underlying top-level fields, in declaration order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The `name` field, when present and a string.
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// The `version` field, when present and a string.
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").and_then(Value::as_str)
    }

    /// Whether the manifest declares the given bucket at all.
    pub fn declares(&self, bucket: DependencyBucket) -> bool {
        self.fields.contains_key(bucket.key())
    }

    /// Read a dependency bucket as a sorted name -> version map.
    ///
    /// Returns `None` when the bucket is absent. A bucket that is present but
    /// not an object of strings is a malformed manifest.
    pub fn bucket(&self, bucket: DependencyBucket) -> Result<Option<BTreeMap<String, String>>> {
        let value = match self.fields.get(bucket.key()) {
            Some(value) => value,
            None => return Ok(None),
        };

        let object = value
            .as_object()
            .with_context(|| format!("`{}` must be an object", bucket.key()))?;

        let mut entries = BTreeMap::new();
        for (name, version) in object {
            let version = version.as_str().with_context(|| {
                format!("`{}.{}` must be a version string", bucket.key(), name)
            })?;
            entries.insert(name.clone(), version.to_string());
        }

        Ok(Some(entries))
    }

    /// Return a copy with the given bucket replaced.
    ///
    /// Entries are written in sorted order. An existing bucket keeps its
    /// position among the top-level fields; a new one is appended. The
    /// receiver is not modified.
    pub fn with_bucket(
        &self,
        bucket: DependencyBucket,
        entries: &BTreeMap<String, String>,
    ) -> Self {
        let mut object = Map::new();
        for (name, version) in entries {
            object.insert(name.clone(), Value::String(version.clone()));
        }

        let mut fields = self.fields.clone();
        fields.insert(bucket.key().to_string(), Value::Object(object));

        PackageManifest { fields }
    }

    /// Non-empty declared versions across `dependencies` and
    /// `devDependencies`, used when this manifest acts as a version source.
    ///
    /// `devDependencies` entries override `dependencies` entries of the same
    /// name.
    pub fn declared_versions(&self) -> Result<BTreeMap<String, String>> {
        let mut versions = BTreeMap::new();

        for bucket in [DependencyBucket::Runtime, DependencyBucket::Development] {
            if let Some(entries) = self.bucket(bucket)? {
                for (name, version) in entries {
                    if !version.is_empty() {
                        versions.insert(name, version);
                    }
                }
            }
        }

        Ok(versions)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_manifest() {
        let manifest = PackageManifest::parse(
            r#"{"name": "my-app", "version": "1.0.0", "dependencies": {"lodash": "^4.17.0"}}"#,
        )
        .unwrap();

        assert_eq!(manifest.name(), Some("my-app"));
        assert_eq!(manifest.version(), Some("1.0.0"));

        let deps = manifest.bucket(DependencyBucket::Runtime).unwrap().unwrap();
        assert_eq!(deps.get("lodash").map(String::as_str), Some("^4.17.0"));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(PackageManifest::parse("[]").is_err());
        assert!(PackageManifest::parse("not json").is_err());
    }

    #[test]
    fn test_absent_bucket_is_none() {
        let manifest = PackageManifest::parse(r#"{"name": "x"}"#).unwrap();
        assert!(!manifest.declares(DependencyBucket::Development));
        assert!(manifest
            .bucket(DependencyBucket::Development)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_malformed_bucket_rejected() {
        let manifest =
            PackageManifest::parse(r#"{"dependencies": {"lodash": 4}}"#).unwrap();
        assert!(manifest.bucket(DependencyBucket::Runtime).is_err());

        let manifest = PackageManifest::parse(r#"{"dependencies": "lodash"}"#).unwrap();
        assert!(manifest.bucket(DependencyBucket::Runtime).is_err());
    }

    #[test]
    fn test_with_bucket_does_not_mutate_receiver() {
        let base = PackageManifest::parse(r#"{"name": "x", "dependencies": {}}"#).unwrap();

        let mut entries = BTreeMap::new();
        entries.insert("lodash".to_string(), "4.17.21".to_string());
        let updated = base.with_bucket(DependencyBucket::Runtime, &entries);

        assert!(base
            .bucket(DependencyBucket::Runtime)
            .unwrap()
            .unwrap()
            .is_empty());
        assert_eq!(
            updated
                .bucket(DependencyBucket::Runtime)
                .unwrap()
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_with_bucket_keeps_field_position() {
        let base = PackageManifest::parse(
            r#"{"name": "x", "dependencies": {"a": "1"}, "scripts": {"start": "node ."}}"#,
        )
        .unwrap();

        let mut entries = BTreeMap::new();
        entries.insert("b".to_string(), "2.0.0".to_string());
        let updated = base.with_bucket(DependencyBucket::Runtime, &entries);

        let keys: Vec<&String> = updated.fields().keys().collect();
        assert_eq!(keys, ["name", "dependencies", "scripts"]);
    }

    #[test]
    fn test_declared_versions_overlay() {
        let manifest = PackageManifest::parse(
            r#"{
                "dependencies": {"lodash": "4.17.21", "react": ""},
                "devDependencies": {"lodash": "4.17.20", "typescript": "5.0.0"}
            }"#,
        )
        .unwrap();

        let versions = manifest.declared_versions().unwrap();
        assert_eq!(versions.get("lodash").map(String::as_str), Some("4.17.20"));
        assert_eq!(
            versions.get("typescript").map(String::as_str),
            Some("5.0.0")
        );
        assert!(!versions.contains_key("react"));
    }
}
