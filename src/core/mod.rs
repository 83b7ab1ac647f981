//! Core domain types: package names, manifests, and module identifiers.

pub mod builtins;
pub mod manifest;
pub mod package_name;
pub mod portable_id;

pub use manifest::{DependencyBucket, PackageManifest};
pub use package_name::{InvalidPackageName, PackageName};
pub use portable_id::{extract_package_name, is_external, Extraction};
