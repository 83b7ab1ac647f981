//! Configuration file support.
//!
//! All synthesis behavior is driven by a `SynthConfig`, usually loaded from a
//! project-local `pkgsynth.toml` and then overridden by CLI flags. Every
//! field has a default, so an absent file is a valid configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::resolver::ResolutionMode;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "pkgsynth.toml";

/// Synthesis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Record exclusion/extraction diagnostics, not just resolution warnings.
    pub debug: bool,

    /// Ordered secondary manifests merged into the version source map.
    /// Later entries take precedence over earlier ones.
    pub source_manifests: Vec<PathBuf>,

    /// Dependencies always injected into the result, bundle or not.
    pub additional_dependencies: BTreeMap<String, String>,

    /// Resolve versions from the installed tree instead of declared sources.
    pub use_installed_versions: bool,

    /// Fallback search roots when a module carries no issuer context.
    pub resolve_context_paths: Vec<PathBuf>,

    /// Names never emitted, whether detected or declared.
    pub exclude_dependencies: BTreeSet<String>,

    /// Abort instead of omitting when a detected dependency has no version.
    pub fail_on_missing_version: bool,

    /// Serializer settings.
    pub output: OutputConfig,
}

/// Serializer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indentation width in spaces; 0 emits compact JSON.
    pub space: usize,

    /// Optional whitelist of top-level fields to retain. Dependency buckets
    /// always pass.
    pub replacer: Option<Vec<String>>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            space: 2,
            replacer: None,
        }
    }
}

impl SynthConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is absent.
    ///
    /// A file that exists but fails to parse is an error; silently ignoring
    /// it would mask typos in real configs.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(SynthConfig::default())
        }
    }

    /// The resolution mode this configuration selects.
    pub fn resolution_mode(&self) -> ResolutionMode {
        if self.use_installed_versions {
            ResolutionMode::Installed
        } else {
            ResolutionMode::Declared
        }
    }
}
