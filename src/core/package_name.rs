//! Validated package names.
//!
//! A package name is either `name` or `@scope/name`. Everything downstream of
//! identifier extraction works in terms of this type, so a separator can never
//! leak past the scope separator.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not a well-formed package name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPackageName {
    #[error("package name is empty")]
    Empty,

    #[error("package name `{0}` has a path separator outside a scope")]
    StraySeparator(String),

    #[error("scoped package name `{0}` is missing its name part")]
    IncompleteScope(String),
}

/// A canonical package name: `name` or `@scope/name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// Validate and wrap a package name.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidPackageName> {
        let name = name.into();

        if name.is_empty() {
            return Err(InvalidPackageName::Empty);
        }

        let separators = name.matches('/').count();
        if name.starts_with('@') {
            match separators {
                1 => {
                    let (scope, rest) = name.split_once('/').expect("one separator");
                    if scope.len() < 2 || rest.is_empty() {
                        return Err(InvalidPackageName::IncompleteScope(name));
                    }
                }
                0 => return Err(InvalidPackageName::IncompleteScope(name)),
                _ => return Err(InvalidPackageName::StraySeparator(name)),
            }
        } else if separators > 0 {
            return Err(InvalidPackageName::StraySeparator(name));
        }

        Ok(PackageName(name))
    }

    /// The name as a plain string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a scoped (`@scope/name`) package.
    pub fn is_scoped(&self) -> bool {
        self.0.starts_with('@')
    }

    /// The relative path of this package under a modules root.
    ///
    /// `name` for plain packages, `scope/name` (two components) for scoped
    /// ones, which is how installed trees lay scoped packages out.
    pub fn install_path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PackageName {
    type Error = InvalidPackageName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PackageName::new(value)
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> String {
        name.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        let name = PackageName::new("lodash").unwrap();
        assert_eq!(name.as_str(), "lodash");
        assert!(!name.is_scoped());
    }

    #[test]
    fn test_scoped_name() {
        let name = PackageName::new("@aws-sdk/client-s3").unwrap();
        assert_eq!(name.as_str(), "@aws-sdk/client-s3");
        assert!(name.is_scoped());
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(PackageName::new(""), Err(InvalidPackageName::Empty));
    }

    #[test]
    fn test_stray_separator_rejected() {
        assert!(matches!(
            PackageName::new("lodash/fp"),
            Err(InvalidPackageName::StraySeparator(_))
        ));
        assert!(matches!(
            PackageName::new("@scope/pkg/deep"),
            Err(InvalidPackageName::StraySeparator(_))
        ));
    }

    #[test]
    fn test_incomplete_scope_rejected() {
        assert!(matches!(
            PackageName::new("@scope"),
            Err(InvalidPackageName::IncompleteScope(_))
        ));
        assert!(matches!(
            PackageName::new("@scope/"),
            Err(InvalidPackageName::IncompleteScope(_))
        ));
        assert!(matches!(
            PackageName::new("@/name"),
            Err(InvalidPackageName::IncompleteScope(_))
        ));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut names = vec![
            PackageName::new("foo").unwrap(),
            PackageName::new("bar").unwrap(),
            PackageName::new("@zed/a").unwrap(),
        ];
        names.sort();
        assert_eq!(names[0].as_str(), "@zed/a");
        assert_eq!(names[1].as_str(), "bar");
        assert_eq!(names[2].as_str(), "foo");
    }
}
