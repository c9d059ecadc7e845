//! # NodePath — Validated Node Locations
//!
//! This module defines `NodePath`, the sole representation of a node
//! location in the coordination namespace.
//!
//! ## Invariant
//!
//! The `NodePath` newtype has a private inner field. The only way to
//! construct one is through `NodePath::new()` (deserialization routes
//! through the same constructor), which enforces the full path grammar.
//! Any function accepting a `&NodePath` may therefore assume a valid
//! absolute path without re-checking, which keeps policy lookup and
//! matching free of defensive string handling.
//!
//! ## Path Grammar
//!
//! - non-empty, starts with `/`
//! - no trailing `/` (except the root path `/` itself)
//! - no empty segments (`//`)
//! - no `.` or `..` segments
//! - no NUL characters

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PathError;

/// An absolute path to a node in the coordination namespace.
///
/// # Invariants
///
/// - The only constructor is `NodePath::new()`.
/// - The inner string always satisfies the module-level path grammar.
///
/// These invariants are enforced by the constructor and cannot be violated
/// by downstream code because the inner `String` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodePath(String);

impl NodePath {
    /// Construct a node path, validating the full path grammar.
    ///
    /// # Errors
    ///
    /// Returns the [`PathError`] variant for the first grammar rule the
    /// candidate string breaks.
    pub fn new(path: impl Into<String>) -> Result<Self, PathError> {
        let path = path.into();
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if path.contains('\0') {
            return Err(PathError::IllegalCharacter);
        }
        if !path.starts_with('/') {
            return Err(PathError::NotAbsolute(path));
        }
        if path == "/" {
            return Ok(Self(path));
        }
        if path.ends_with('/') {
            return Err(PathError::TrailingSlash(path));
        }
        for segment in path[1..].split('/') {
            if segment.is_empty() {
                return Err(PathError::EmptySegment(path));
            }
            if segment == "." || segment == ".." {
                return Err(PathError::RelativeSegment(path));
            }
        }
        Ok(Self(path))
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Access the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root path `/`.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            // Unreachable: every non-root NodePath contains '/'.
            None => None,
        }
    }

    /// The final path segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit('/').next()
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for NodePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for NodePath {
    type Error = PathError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<String> for NodePath {
    type Error = PathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for NodePath {
    /// Deserialize through [`NodePath::new`] so that deserialized paths
    /// satisfy the same grammar as constructed ones.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NodePath::new(raw).map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for syntactically valid absolute paths.
    fn valid_path() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z0-9_-]{1,8}", 1..5)
            .prop_map(|segments| format!("/{}", segments.join("/")))
    }

    proptest! {
        /// Every generated valid path parses, and round-trips unchanged.
        #[test]
        fn valid_paths_parse(raw in valid_path()) {
            let path = NodePath::new(raw.clone());
            prop_assert!(path.is_ok(), "Failed to parse {raw:?}: {:?}", path.err());
            let parsed = path.unwrap();
            prop_assert_eq!(parsed.as_str(), raw);
        }

        /// Walking `parent()` from any valid path terminates at the root.
        #[test]
        fn parent_chain_terminates(raw in valid_path()) {
            let mut current = NodePath::new(raw).unwrap();
            let mut hops = 0usize;
            while let Some(parent) = current.parent() {
                current = parent;
                hops += 1;
                prop_assert!(hops <= 16, "parent() chain did not terminate");
            }
            prop_assert!(current.is_root());
        }
    }
}
