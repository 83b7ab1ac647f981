//! Version resolution.
//!
//! Maps package names to version strings from one of two sources, selected at
//! configuration time:
//!
//! - **declared mode**: pure lookup in the precollected [`VersionSourceMap`],
//!   no filesystem access at resolution time;
//! - **installed mode**: probe the installed package tree relative to the
//!   importing module's directory, falling back to configured search roots.
//!
//! This is deliberately not a package-manager resolver: no ranges are
//! compared and no graph is walked.

pub mod errors;
pub mod installed;
pub mod sources;

use std::path::{Path, PathBuf};

use crate::core::PackageName;

pub use errors::SynthError;
pub use sources::VersionSourceMap;

/// How versions are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Look up versions in the precollected source map.
    Declared,
    /// Probe the installed package tree.
    Installed,
}

/// Mode-switched version resolver.
///
/// Borrows the source map and search paths from the synthesizer; cheap to
/// construct per build.
pub struct VersionResolver<'a> {
    mode: ResolutionMode,
    sources: &'a VersionSourceMap,
    fallback_paths: &'a [PathBuf],
}

impl<'a> VersionResolver<'a> {
    pub fn new(
        mode: ResolutionMode,
        sources: &'a VersionSourceMap,
        fallback_paths: &'a [PathBuf],
    ) -> Self {
        VersionResolver {
            mode,
            sources,
            fallback_paths,
        }
    }

    /// The active resolution mode.
    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Resolve a version for `name`, honoring the active mode.
    ///
    /// `Ok(None)` is an ordinary miss (caller warns and omits); `Err` is a
    /// corrupt version source and aborts the synthesis.
    pub fn resolve(
        &self,
        name: &PackageName,
        context: Option<&Path>,
    ) -> Result<Option<String>, SynthError> {
        match self.mode {
            ResolutionMode::Declared => Ok(self.resolve_declared(name)),
            ResolutionMode::Installed => {
                installed::resolve_installed(name, context, self.fallback_paths)
            }
        }
    }

    /// Look up `name` in the source map regardless of mode.
    ///
    /// Installed mode falls back to this for user-declared placeholders whose
    /// package is not actually installed.
    pub fn resolve_declared(&self, name: &PackageName) -> Option<String> {
        self.sources.lookup(name.as_str()).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::core::PackageManifest;

    fn source_map(json: &str) -> VersionSourceMap {
        let mut map = VersionSourceMap::default();
        map.overlay(&PackageManifest::parse(json).unwrap()).unwrap();
        map
    }

    #[test]
    fn test_declared_mode_is_a_map_lookup() {
        let sources = source_map(r#"{"dependencies": {"lodash": "4.17.21"}}"#);
        let resolver = VersionResolver::new(ResolutionMode::Declared, &sources, &[]);

        let name = PackageName::new("lodash").unwrap();
        assert_eq!(
            resolver.resolve(&name, None).unwrap().as_deref(),
            Some("4.17.21")
        );

        let ghost = PackageName::new("ghost").unwrap();
        assert_eq!(resolver.resolve(&ghost, None).unwrap(), None);
    }

    #[test]
    fn test_installed_mode_ignores_source_map() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("node_modules/lodash");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), r#"{"version": "4.17.10"}"#).unwrap();

        let sources = source_map(r#"{"dependencies": {"lodash": "4.17.21"}}"#);
        let fallback = vec![tmp.path().to_path_buf()];
        let resolver = VersionResolver::new(ResolutionMode::Installed, &sources, &fallback);

        let name = PackageName::new("lodash").unwrap();
        assert_eq!(
            resolver.resolve(&name, None).unwrap().as_deref(),
            Some("4.17.10")
        );
    }
}
