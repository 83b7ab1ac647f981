//! Fatal resolution and configuration errors.
//!
//! Everything here aborts the synthesis: these conditions indicate a corrupt
//! or misconfigured environment, not an absent optional dependency. Missing
//! packages and undecipherable identifiers are diagnostics, not errors; see
//! `util::diagnostic`.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// A fatal synthesis error.
#[derive(Debug, Error, Diagnostic)]
pub enum SynthError {
    /// Declared-version mode was selected with nothing to resolve from.
    #[error("declared-version mode has no version source")]
    #[diagnostic(
        code(pkgsynth::config::no_version_source),
        help("pass --source <package.json> or set `source_manifests` in pkgsynth.toml")
    )]
    NoVersionSource,

    /// An installed package manifest exists but could not be read.
    #[error("failed to read installed manifest for `{package}` at {}", path.display())]
    #[diagnostic(code(pkgsynth::resolve::manifest_unreadable))]
    InstalledManifestUnreadable {
        package: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An installed package manifest exists but is not valid JSON.
    #[error("installed manifest for `{package}` at {} is not valid JSON", path.display())]
    #[diagnostic(
        code(pkgsynth::resolve::manifest_parse),
        help("the installed tree is corrupt; reinstall the package")
    )]
    InstalledManifestParse {
        package: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An installed package manifest parses but has no usable version field.
    #[error("installed manifest for `{package}` at {} has no version field", path.display())]
    #[diagnostic(
        code(pkgsynth::resolve::missing_version),
        help("the installed tree is corrupt; reinstall the package")
    )]
    MissingVersionField { package: String, path: PathBuf },

    /// An installed package manifest declares a version that is not semver.
    #[error("installed manifest for `{package}` declares invalid version `{version}`")]
    #[diagnostic(code(pkgsynth::resolve::invalid_version))]
    InvalidInstalledVersion {
        package: String,
        version: String,
        #[source]
        source: semver::Error,
    },
}
