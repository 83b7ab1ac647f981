//! The synthesis pass: extraction, resolution, and merge.
//!
//! A [`Synthesizer`] is built once per configuration: it loads the secondary
//! manifests into the version source map and validates that the selected
//! resolution mode has something to resolve from. Each completed build then
//! runs [`Synthesizer::synthesize`], which derives a fresh dependency set
//! from the bundle, merges it with the base manifest under the override
//! rules, and serializes the result. The base manifest is never mutated; the
//! same synthesizer serves watch-mode rebuilds.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::core::{
    builtins, extract_package_name, is_external, DependencyBucket, Extraction, PackageManifest,
    PackageName,
};
use crate::host::BundleView;
use crate::ops::serialize;
use crate::resolver::{ResolutionMode, SynthError, VersionResolver, VersionSourceMap};
use crate::util::diagnostic::{Diagnostic, DiagnosticLog};
use crate::util::SynthConfig;

/// Result of one synthesis pass.
#[derive(Debug)]
pub struct Synthesis {
    /// The merged output manifest.
    pub manifest: PackageManifest,
    /// The serialized document, ready to emit as `package.json`.
    pub json: String,
    /// Non-fatal diagnostics recorded during the pass.
    pub diagnostics: Vec<Diagnostic>,
}

/// Configured manifest synthesizer.
///
/// Immutable after construction; safe to reuse across rebuilds.
#[derive(Debug)]
pub struct Synthesizer {
    config: SynthConfig,
    base: PackageManifest,
    sources: VersionSourceMap,
}

impl Synthesizer {
    /// Build a synthesizer from configuration and a base manifest.
    ///
    /// Loads every secondary manifest eagerly; a missing or unparseable
    /// source file is fatal here, not at resolution time. Declared-version
    /// mode with no version source at all (no secondary manifests and no
    /// versions declared in the base) is a configuration error.
    pub fn new(config: SynthConfig, base: PackageManifest) -> Result<Self> {
        let mut sources = VersionSourceMap::from_manifest_files(&config.source_manifests)?;
        sources.overlay(&base)?;

        if config.resolution_mode() == ResolutionMode::Declared
            && config.source_manifests.is_empty()
            && sources.is_empty()
        {
            return Err(SynthError::NoVersionSource.into());
        }

        Ok(Synthesizer {
            config,
            base,
            sources,
        })
    }

    /// Run one synthesis pass over a completed bundle.
    pub fn synthesize(&self, bundle: &dyn BundleView) -> Result<Synthesis> {
        let mut log = DiagnosticLog::new(self.config.debug);
        let resolver = VersionResolver::new(
            self.config.resolution_mode(),
            &self.sources,
            &self.config.resolve_context_paths,
        );

        let externals = self.collect_externals(bundle, &mut log);
        let mut resolved = self.seed_additional(&mut log)?;
        self.resolve_externals(&externals, &resolver, &mut resolved, &mut log)?;
        let manifest = self.merge_buckets(&externals, &resolver, resolved, &mut log)?;

        let json = serialize::to_json(&manifest, &self.config.output)?;

        Ok(Synthesis {
            manifest,
            json,
            diagnostics: log.into_entries(),
        })
    }

    /// Extract external package names from the bundle, keeping the first
    /// issuer context seen per name.
    fn collect_externals(
        &self,
        bundle: &dyn BundleView,
        log: &mut DiagnosticLog,
    ) -> BTreeMap<PackageName, Option<PathBuf>> {
        let mut externals = BTreeMap::new();

        for module in bundle.modules() {
            if !is_external(&module.identifier) {
                continue;
            }

            match extract_package_name(&module.identifier) {
                Extraction::Name(name) => {
                    externals.entry(name).or_insert(module.issuer);
                }
                Extraction::SelfReference => {
                    log.note(Diagnostic::note(format!(
                        "skipping self-referential module `{}`",
                        module.identifier
                    )));
                }
                Extraction::Undecipherable => {
                    log.note(Diagnostic::note(format!(
                        "could not decipher module identifier `{}`",
                        module.identifier
                    )));
                }
            }
        }

        externals
    }

    /// Seed the result with explicitly configured additional dependencies.
    fn seed_additional(&self, log: &mut DiagnosticLog) -> Result<BTreeMap<String, String>> {
        let mut resolved = BTreeMap::new();

        for (name, version) in &self.config.additional_dependencies {
            if self.is_excluded(name, log) {
                continue;
            }
            if version.is_empty() {
                self.missing_version(name, log, "additional dependency has an empty version")?;
                continue;
            }
            resolved.insert(name.clone(), version.clone());
        }

        Ok(resolved)
    }

    /// Resolve every detected external name into the result set.
    fn resolve_externals(
        &self,
        externals: &BTreeMap<PackageName, Option<PathBuf>>,
        resolver: &VersionResolver<'_>,
        resolved: &mut BTreeMap<String, String>,
        log: &mut DiagnosticLog,
    ) -> Result<()> {
        for (name, issuer) in externals {
            if builtins::is_builtin(name.as_str()) {
                log.note(Diagnostic::note(format!(
                    "skipping runtime built-in `{name}`"
                )));
                continue;
            }
            if self.is_excluded(name.as_str(), log) {
                continue;
            }

            match resolver.resolve(name, issuer.as_deref())? {
                Some(version) => {
                    resolved.insert(name.to_string(), version);
                }
                None => {
                    self.missing_version(
                        name.as_str(),
                        log,
                        "detected in the bundle but no version source knows it",
                    )?;
                }
            }
        }

        Ok(())
    }

    /// Apply the base manifest's bucket declarations over the resolved set,
    /// in the fixed order runtime -> development -> peer.
    ///
    /// Returns a new manifest; the base manifest is left untouched.
    fn merge_buckets(
        &self,
        externals: &BTreeMap<PackageName, Option<PathBuf>>,
        resolver: &VersionResolver<'_>,
        mut resolved: BTreeMap<String, String>,
        log: &mut DiagnosticLog,
    ) -> Result<PackageManifest> {
        let mut output = self.base.clone();

        for bucket in DependencyBucket::ALL {
            let declared = match self.base.bucket(bucket)? {
                Some(declared) => declared,
                None => continue,
            };

            if bucket == DependencyBucket::Runtime {
                for (name, version) in declared {
                    if self.is_excluded(&name, log) {
                        resolved.remove(&name);
                        continue;
                    }
                    if !version.is_empty() {
                        // Explicit user version always wins over detection.
                        resolved.insert(name, version);
                        continue;
                    }
                    match self.resolve_placeholder(&name, externals, resolver, log)? {
                        Some(version) => {
                            resolved.insert(name, version);
                        }
                        None => {
                            log.warn(Diagnostic::warning(format!(
                                "no resolvable version for declared dependency `{name}`"
                            )));
                        }
                    }
                }
            } else {
                let mut entries = BTreeMap::new();
                for (name, version) in declared {
                    if self.is_excluded(&name, log) {
                        resolved.remove(&name);
                        continue;
                    }
                    if !version.is_empty() {
                        resolved.remove(&name);
                        entries.insert(name, version);
                        continue;
                    }
                    match self.resolve_placeholder(&name, externals, resolver, log)? {
                        Some(version) => {
                            // A name declared dev/peer never stays runtime.
                            resolved.remove(&name);
                            entries.insert(name, version);
                        }
                        None => {
                            log.warn(Diagnostic::warning(format!(
                                "no resolvable version for declared {bucket} entry `{name}`"
                            )));
                        }
                    }
                }
                output = output.with_bucket(bucket, &entries);
            }
        }

        Ok(output.with_bucket(DependencyBucket::Runtime, &resolved))
    }

    /// Resolve an empty "resolve for me" placeholder.
    ///
    /// Installed mode probes the install tree first and falls back to the
    /// declared source map with a warning; declared mode reads the source map
    /// directly.
    fn resolve_placeholder(
        &self,
        name: &str,
        externals: &BTreeMap<PackageName, Option<PathBuf>>,
        resolver: &VersionResolver<'_>,
        log: &mut DiagnosticLog,
    ) -> Result<Option<String>> {
        let name = match PackageName::new(name) {
            Ok(name) => name,
            Err(err) => {
                log.warn(Diagnostic::warning(format!(
                    "invalid dependency name in base manifest: {err}"
                )));
                return Ok(None);
            }
        };

        match resolver.mode() {
            ResolutionMode::Declared => Ok(resolver.resolve_declared(&name)),
            ResolutionMode::Installed => {
                let issuer = externals.get(&name).and_then(|i| i.as_deref());
                match resolver.resolve(&name, issuer)? {
                    Some(version) => Ok(Some(version)),
                    None => {
                        let fallback = resolver.resolve_declared(&name);
                        if fallback.is_some() {
                            log.warn(Diagnostic::warning(format!(
                                "`{name}` is not installed; using its declared version instead"
                            )));
                        }
                        Ok(fallback)
                    }
                }
            }
        }
    }

    /// Exclusion is absolute: detected or declared, an excluded name never
    /// reaches the output.
    fn is_excluded(&self, name: &str, log: &mut DiagnosticLog) -> bool {
        if self.config.exclude_dependencies.contains(name) {
            log.note(Diagnostic::note(format!("excluded dependency `{name}`")));
            true
        } else {
            false
        }
    }

    /// Handle a dependency with no resolvable version: warn and omit, or
    /// fail fast when configured to.
    fn missing_version(&self, name: &str, log: &mut DiagnosticLog, why: &str) -> Result<()> {
        if self.config.fail_on_missing_version {
            bail!("no version for dependency `{name}`: {why}");
        }
        log.warn(
            Diagnostic::warning(format!(
                "omitting `{name}`: no version could be resolved"
            ))
            .with_context(why.to_string()),
        );
        Ok(())
    }
}
