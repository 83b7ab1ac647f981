//! The precollected version source map.
//!
//! Built once at synthesizer construction from the ordered secondary manifest
//! list, then overlaid with the base manifest's own declared versions.
//! Immutable afterwards, so watch-mode rebuilds share it freely.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::PackageManifest;

/// Mapping from package name to declared version string.
#[derive(Debug, Clone, Default)]
pub struct VersionSourceMap {
    versions: BTreeMap<String, String>,
}

impl VersionSourceMap {
    /// Build a source map from an ordered list of manifest files.
    ///
    /// Later files take precedence over earlier ones; within one file,
    /// `devDependencies` take precedence over `dependencies`.
    pub fn from_manifest_files(paths: &[PathBuf]) -> Result<Self> {
        let mut map = VersionSourceMap::default();

        for path in paths {
            let manifest = PackageManifest::load(path)
                .with_context(|| format!("failed to load version source: {}", path.display()))?;
            let declared = manifest
                .declared_versions()
                .with_context(|| format!("invalid version source: {}", path.display()))?;

            map.versions.extend(declared);
        }

        Ok(map)
    }

    /// Overlay the base manifest's own non-empty declared versions.
    ///
    /// These take precedence over every secondary manifest.
    pub fn overlay(&mut self, base: &PackageManifest) -> Result<()> {
        self.versions
            .extend(base.declared_versions().context("invalid base manifest")?);
        Ok(())
    }

    /// Look up a declared version.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.versions.get(name).map(String::as_str)
    }

    /// Number of known versions.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the map holds no versions at all.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_manifest(dir: &TempDir, file: &str, content: &str) -> PathBuf {
        let path = dir.path().join(file);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_later_file_wins() {
        let tmp = TempDir::new().unwrap();
        let first = write_manifest(
            &tmp,
            "first.json",
            r#"{"dependencies": {"lodash": "4.17.20", "react": "17.0.0"}}"#,
        );
        let second = write_manifest(
            &tmp,
            "second.json",
            r#"{"dependencies": {"lodash": "4.17.21"}}"#,
        );

        let map = VersionSourceMap::from_manifest_files(&[first, second]).unwrap();
        assert_eq!(map.lookup("lodash"), Some("4.17.21"));
        assert_eq!(map.lookup("react"), Some("17.0.0"));
    }

    #[test]
    fn test_dev_dependencies_contribute() {
        let tmp = TempDir::new().unwrap();
        let path = write_manifest(
            &tmp,
            "package.json",
            r#"{"dependencies": {"a": "1.0.0"}, "devDependencies": {"b": "2.0.0"}}"#,
        );

        let map = VersionSourceMap::from_manifest_files(std::slice::from_ref(&path)).unwrap();
        assert_eq!(map.lookup("a"), Some("1.0.0"));
        assert_eq!(map.lookup("b"), Some("2.0.0"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_base_overlay_wins() {
        let tmp = TempDir::new().unwrap();
        let path = write_manifest(
            &tmp,
            "source.json",
            r#"{"dependencies": {"lodash": "4.17.20"}}"#,
        );

        let mut map = VersionSourceMap::from_manifest_files(std::slice::from_ref(&path)).unwrap();
        let base =
            PackageManifest::parse(r#"{"dependencies": {"lodash": "4.17.21"}}"#).unwrap();
        map.overlay(&base).unwrap();

        assert_eq!(map.lookup("lodash"), Some("4.17.21"));
    }

    #[test]
    fn test_empty_placeholders_do_not_pollute_sources() {
        let mut map = VersionSourceMap::default();
        let base = PackageManifest::parse(r#"{"dependencies": {"react": ""}}"#).unwrap();
        map.overlay(&base).unwrap();

        assert!(map.is_empty());
        assert_eq!(map.lookup("react"), None);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.json");
        assert!(VersionSourceMap::from_manifest_files(&[missing]).is_err());
    }

    #[test]
    fn test_unparseable_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = write_manifest(&tmp, "broken.json", "{not json");
        assert!(VersionSourceMap::from_manifest_files(&[path]).is_err());
    }
}
