//! Bundler stats-file adapter.
//!
//! Parses the JSON stats document bundlers emit after a build (webpack's
//! `--json` output and compatibles). Only two fields per module matter here:
//! the portable `identifier` and the `issuer` path of the importing module.
//! Stats shapes differ in where the module list lives: newer ones carry a
//! top-level `modules` array, older ones nest module lists per chunk; both
//! are accepted.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::host::{issuer_directory, BundleView, ModuleRecord};
use crate::util::fs;

/// A bundle backed by a stats JSON document.
#[derive(Debug, Clone)]
pub struct StatsBundle {
    modules: Vec<ModuleRecord>,
}

#[derive(Debug, Deserialize)]
struct RawStats {
    #[serde(default)]
    modules: Vec<RawModule>,

    #[serde(default)]
    chunks: Vec<RawChunk>,
}

#[derive(Debug, Deserialize)]
struct RawChunk {
    #[serde(default)]
    modules: Vec<RawModule>,
}

#[derive(Debug, Deserialize)]
struct RawModule {
    identifier: Option<String>,

    #[serde(default)]
    issuer: Option<String>,

    /// Concatenated modules nest their members one level down.
    #[serde(default)]
    modules: Vec<RawModule>,
}

impl StatsBundle {
    /// Load a stats document from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse stats document content.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawStats =
            serde_json::from_str(content).context("stats document is not valid JSON")?;

        let mut modules = Vec::new();
        collect(&raw.modules, &mut modules);
        for chunk in &raw.chunks {
            collect(&chunk.modules, &mut modules);
        }

        Ok(StatsBundle { modules })
    }

    /// Number of module records in the document.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the document carried no module records at all.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

fn collect(raw: &[RawModule], out: &mut Vec<ModuleRecord>) {
    for module in raw {
        if let Some(identifier) = &module.identifier {
            let mut record = ModuleRecord::new(identifier.clone());
            if let Some(issuer) = module.issuer.as_deref().and_then(issuer_directory) {
                record = record.with_issuer(issuer);
            }
            out.push(record);
        }
        collect(&module.modules, out);
    }
}

impl BundleView for StatsBundle {
    fn modules(&self) -> Vec<ModuleRecord> {
        self.modules.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_top_level_modules() {
        let bundle = StatsBundle::parse(
            r#"{
                "modules": [
                    {"identifier": "external \"lodash\"", "issuer": "/app/src/index.js"},
                    {"identifier": "./src/index.js"}
                ]
            }"#,
        )
        .unwrap();

        let modules = bundle.modules();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].identifier, "external \"lodash\"");
        assert_eq!(modules[0].issuer, Some(PathBuf::from("/app/src")));
        assert_eq!(modules[1].issuer, None);
    }

    #[test]
    fn test_chunk_nested_modules() {
        let bundle = StatsBundle::parse(
            r#"{
                "chunks": [
                    {"modules": [{"identifier": "external \"express\""}]},
                    {"modules": [{"identifier": "external \"react\""}]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn test_concatenated_modules_flattened() {
        let bundle = StatsBundle::parse(
            r#"{
                "modules": [
                    {
                        "identifier": "./src/index.js + 2 modules",
                        "modules": [
                            {"identifier": "external \"chalk\""},
                            {"identifier": "./src/util.js"}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(bundle.len(), 3);
    }

    #[test]
    fn test_modules_without_identifier_skipped() {
        let bundle = StatsBundle::parse(r#"{"modules": [{"issuer": "/a/b.js"}]}"#).unwrap();
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(StatsBundle::parse("{nope").is_err());
    }
}
