//! Installed-tree version resolution.
//!
//! Mirrors how the runtime itself locates a package: walk the ancestor chain
//! of the importing module's directory looking for
//! `node_modules/<name>/package.json`, falling back to configured search
//! roots. The hit is canonicalized so symlinked stores resolve to the real
//! package directory, and the package's own manifest supplies the version.

use std::path::{Component, Path, PathBuf};

use semver::Version;
use serde_json::Value;

use crate::core::PackageName;
use crate::resolver::errors::SynthError;

/// Resolve the installed version of a package.
///
/// `Ok(None)` means the package is simply not installed anywhere along the
/// search chain; the caller logs and omits it. A manifest that is found but
/// unreadable, unparseable, or versionless is fatal.
pub fn resolve_installed(
    name: &PackageName,
    context: Option<&Path>,
    fallback_paths: &[PathBuf],
) -> Result<Option<String>, SynthError> {
    let manifest_path = match locate_manifest(name, context, fallback_paths) {
        Some(path) => path,
        None => return Ok(None),
    };

    let manifest_path = package_root(&manifest_path, name).join("package.json");
    read_version(name, &manifest_path).map(Some)
}

/// Search the context ancestors, then each fallback root's ancestors, for an
/// installed copy of the package.
fn locate_manifest(
    name: &PackageName,
    context: Option<&Path>,
    fallback_paths: &[PathBuf],
) -> Option<PathBuf> {
    let bases = context
        .into_iter()
        .map(Path::to_path_buf)
        .chain(fallback_paths.iter().cloned());

    for base in bases {
        for dir in base.ancestors() {
            let candidate = dir
                .join("node_modules")
                .join(name.install_path())
                .join("package.json");
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    None
}

/// Derive the real package root from a resolved manifest path.
///
/// After canonicalization the path still ends in
/// `node_modules/<name>` (or `node_modules/<scope>/<name>`); the last such
/// segment is the package root. Falls back to the manifest's parent directory
/// when the canonical path has no modules-root segment.
fn package_root(manifest_path: &Path, name: &PackageName) -> PathBuf {
    let dir = manifest_path
        .parent()
        .unwrap_or(manifest_path)
        .to_path_buf();
    let dir = std::fs::canonicalize(&dir).unwrap_or(dir);

    let components: Vec<&str> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    let mut expected = vec!["node_modules"];
    expected.extend(name.install_path().split('/'));

    let mut last_match = None;
    for start in 0..components.len() {
        let end = start + expected.len();
        if end <= components.len() && components[start..end] == expected[..] {
            last_match = Some(end);
        }
    }

    match last_match {
        Some(end) => {
            // Rebuild the prefix up to and including the matched segment.
            let keep = components.len() - end;
            let mut root = dir.clone();
            for _ in 0..keep {
                root.pop();
            }
            root
        }
        None => dir,
    }
}

/// Read and validate the `version` field of an installed manifest.
fn read_version(name: &PackageName, path: &Path) -> Result<String, SynthError> {
    let content =
        std::fs::read_to_string(path).map_err(|source| SynthError::InstalledManifestUnreadable {
            package: name.to_string(),
            path: path.to_path_buf(),
            source,
        })?;

    let manifest: Value =
        serde_json::from_str(&content).map_err(|source| SynthError::InstalledManifestParse {
            package: name.to_string(),
            path: path.to_path_buf(),
            source,
        })?;

    let version = manifest
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| SynthError::MissingVersionField {
            package: name.to_string(),
            path: path.to_path_buf(),
        })?;

    Version::parse(version).map_err(|source| SynthError::InvalidInstalledVersion {
        package: name.to_string(),
        version: version.to_string(),
        source,
    })?;

    Ok(version.to_string())
}
