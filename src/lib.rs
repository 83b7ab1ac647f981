//! pkgsynth - deployment manifest synthesis for bundled applications
//!
//! This crate inspects a completed bundler build, determines which external
//! runtime dependencies it references, resolves a version for each from known
//! sources with override precedence, merges those with a base `package.json`,
//! and emits a deterministic manifest document.

pub mod core;
pub mod host;
pub mod ops;
pub mod resolver;
pub mod util;

pub use crate::core::{DependencyBucket, PackageManifest, PackageName};
pub use host::{AssetSink, BundleView, FsAssetSink, ModuleRecord};
pub use ops::{Synthesis, Synthesizer};
pub use resolver::{ResolutionMode, SynthError, VersionSourceMap};
pub use util::{Diagnostic, SynthConfig};
