//! The bundler boundary.
//!
//! The core never talks to a bundler directly. It consumes a [`BundleView`]
//! (iterate modules, read their identifiers and issuer context) and produces
//! output through an [`AssetSink`]. One adapter per supported input shape
//! lives next to these traits; the core never branches on bundler version.

pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs;

/// One module of the completed bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    /// The bundler-assigned portable identifier.
    pub identifier: String,
    /// Directory of the module that imported this one, when known.
    pub issuer: Option<PathBuf>,
}

impl ModuleRecord {
    pub fn new(identifier: impl Into<String>) -> Self {
        ModuleRecord {
            identifier: identifier.into(),
            issuer: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<PathBuf>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// Read access to a completed bundle's module graph.
pub trait BundleView {
    /// Every module of the bundle, external or not.
    fn modules(&self) -> Vec<ModuleRecord>;
}

/// An in-memory bundle, used by tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct MemoryBundle {
    modules: Vec<ModuleRecord>,
}

impl MemoryBundle {
    pub fn new(modules: Vec<ModuleRecord>) -> Self {
        MemoryBundle { modules }
    }
}

impl BundleView for MemoryBundle {
    fn modules(&self) -> Vec<ModuleRecord> {
        self.modules.clone()
    }
}

/// Destination for emitted build assets.
pub trait AssetSink {
    /// Emit a named asset with the given contents.
    fn emit(&mut self, name: &str, contents: &str) -> Result<()>;
}

/// Writes assets into an output directory.
pub struct FsAssetSink {
    out_dir: PathBuf,
}

impl FsAssetSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        FsAssetSink {
            out_dir: out_dir.into(),
        }
    }

    /// The path an asset name maps to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.out_dir.join(name)
    }
}

impl AssetSink for FsAssetSink {
    fn emit(&mut self, name: &str, contents: &str) -> Result<()> {
        fs::write_string(&self.path_for(name), contents)
    }
}

/// Collects assets in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub assets: Vec<(String, String)>,
}

impl MemorySink {
    /// The contents of a previously emitted asset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.assets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, contents)| contents.as_str())
    }
}

impl AssetSink for MemorySink {
    fn emit(&mut self, name: &str, contents: &str) -> Result<()> {
        self.assets.push((name.to_string(), contents.to_string()));
        Ok(())
    }
}

/// Directory of the file a stats-style issuer string points at.
pub(crate) fn issuer_directory(issuer: &str) -> Option<PathBuf> {
    let path = Path::new(issuer);
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
