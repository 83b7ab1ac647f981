//! Package-name extraction from bundler module identifiers.
//!
//! A bundler assigns every module a portable identifier: an opaque string
//! describing how the module was resolved, independent of machine-specific
//! absolute paths. External (unbundled) modules show up in one of two shapes:
//!
//! - quoted-fragment: `external commonjs "lodash"` or `external "@scope/pkg"`
//! - installed-module-path: `/app/node_modules/@scope/pkg/dist/index.js`
//!
//! Extraction is a pure function of the identifier string; no I/O happens
//! here.

use crate::core::package_name::PackageName;

/// Marker substring identifying external modules.
pub const EXTERNAL_MARKER: &str = "external";

/// Path segment under which installed packages live.
pub const MODULES_ROOT: &str = "node_modules/";

/// Outcome of extracting a package name from a module identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A well-formed `name` or `@scope/name`.
    Name(PackageName),
    /// The identifier points back into the bundle itself (`.` or `..`).
    SelfReference,
    /// No package name could be derived from the identifier.
    Undecipherable,
}

/// Whether an identifier denotes an external module.
///
/// Non-external identifiers are filtered out before extraction is attempted.
pub fn is_external(identifier: &str) -> bool {
    identifier.contains(EXTERNAL_MARKER) || normalize(identifier).contains(MODULES_ROOT)
}

/// Extract the canonical package name from an external module identifier.
pub fn extract_package_name(identifier: &str) -> Extraction {
    let identifier = normalize(identifier);

    let fragment = if identifier.contains('"') {
        match quoted_fragment(&identifier) {
            Some(fragment) => fragment,
            None => return Extraction::Undecipherable,
        }
    } else if let Some(tail) = installed_fragment(&identifier) {
        tail
    } else {
        return Extraction::Undecipherable;
    };

    if fragment.is_empty() {
        return Extraction::Undecipherable;
    }
    if fragment == "." || fragment == ".." {
        return Extraction::SelfReference;
    }

    match PackageName::new(fragment) {
        Ok(name) => Extraction::Name(name),
        Err(_) => Extraction::Undecipherable,
    }
}

/// Identifiers always use forward separators; stats emitted on Windows may
/// not.
fn normalize(identifier: &str) -> String {
    identifier.replace('\\', "/")
}

/// Quoted-fragment shape: the name lies between the first and last quote.
///
/// Trailing path segments are stripped until either a single separator
/// remains on a scoped name, or none remain at all. `lodash/fp/curry`
/// becomes `lodash`; `@scope/pkg/dist` becomes `@scope/pkg`.
fn quoted_fragment(identifier: &str) -> Option<String> {
    let first = identifier.find('"')?;
    let last = identifier.rfind('"')?;
    if last <= first {
        return None;
    }

    let mut cut = &identifier[first + 1..last];
    let mut separators = cut.matches('/').count();

    while (!cut.contains('@') && separators > 0) || separators > 1 {
        cut = &cut[..cut.rfind('/')?];
        separators -= 1;
    }

    Some(cut.to_string())
}

/// Installed-module-path shape: the name follows the last modules-root
/// segment, spanning two components when scoped.
fn installed_fragment(identifier: &str) -> Option<String> {
    let start = identifier.rfind(MODULES_ROOT)? + MODULES_ROOT.len();
    let tail = &identifier[start..];

    let mut components = tail.split('/').filter(|c| !c.is_empty());
    let head = components.next()?;

    if head.starts_with('@') {
        let name = components.next()?;
        Some(format!("{head}/{name}"))
    } else {
        Some(head.to_string())
    }
}
