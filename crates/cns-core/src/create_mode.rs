//! # CreateMode — Node Creation Modes
//!
//! The four ways a node can be created in the coordination namespace:
//! persistent or ephemeral, each with or without a service-assigned
//! monotonically increasing suffix.
//!
//! Policies constrain the two underlying properties independently
//! (ephemeral-ness and sequential-ness), so the enum exposes them as
//! derived predicates rather than making callers match four variants.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// The creation mode of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateMode {
    /// The node persists until explicitly deleted.
    #[default]
    Persistent,
    /// Persistent, with a service-assigned monotonic suffix.
    PersistentSequential,
    /// The node is removed when the creating session ends.
    Ephemeral,
    /// Ephemeral, with a service-assigned monotonic suffix.
    EphemeralSequential,
}

impl CreateMode {
    /// Returns all create modes in canonical order.
    pub fn all() -> &'static [CreateMode] {
        &[
            Self::Persistent,
            Self::PersistentSequential,
            Self::Ephemeral,
            Self::EphemeralSequential,
        ]
    }

    /// Whether nodes created in this mode are bound to the creating session.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Ephemeral | Self::EphemeralSequential)
    }

    /// Whether nodes created in this mode receive a monotonic suffix.
    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::PersistentSequential | Self::EphemeralSequential)
    }

    /// The mode with the given ephemeral/sequential properties.
    ///
    /// Inverse of [`is_ephemeral`](Self::is_ephemeral) /
    /// [`is_sequential`](Self::is_sequential), for callers that hold the
    /// two properties as booleans.
    pub fn from_flags(is_ephemeral: bool, is_sequential: bool) -> CreateMode {
        match (is_ephemeral, is_sequential) {
            (false, false) => Self::Persistent,
            (false, true) => Self::PersistentSequential,
            (true, false) => Self::Ephemeral,
            (true, true) => Self::EphemeralSequential,
        }
    }

    /// Returns the snake_case string identifier for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persistent => "persistent",
            Self::PersistentSequential => "persistent_sequential",
            Self::Ephemeral => "ephemeral",
            Self::EphemeralSequential => "ephemeral_sequential",
        }
    }
}

impl std::fmt::Display for CreateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`CreateMode`] from its string identifier.
#[derive(Error, Debug)]
#[error("unknown create mode: {0:?}")]
pub struct ParseCreateModeError(pub String);

impl FromStr for CreateMode {
    type Err = ParseCreateModeError;

    /// Parse a create mode from its snake_case string identifier.
    ///
    /// Accepts the same identifiers produced by [`CreateMode::as_str()`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "persistent" => Ok(Self::Persistent),
            "persistent_sequential" => Ok(Self::PersistentSequential),
            "ephemeral" => Ok(Self::Ephemeral),
            "ephemeral_sequential" => Ok(Self::EphemeralSequential),
            other => Err(ParseCreateModeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_unique() {
        let mut seen = std::collections::HashSet::new();
        for mode in CreateMode::all() {
            assert!(seen.insert(mode), "Duplicate mode: {mode}");
        }
        assert_eq!(CreateMode::all().len(), 4);
    }

    #[test]
    fn test_from_flags_roundtrip() {
        for &is_ephemeral in &[false, true] {
            for &is_sequential in &[false, true] {
                let mode = CreateMode::from_flags(is_ephemeral, is_sequential);
                assert_eq!(mode.is_ephemeral(), is_ephemeral);
                assert_eq!(mode.is_sequential(), is_sequential);
            }
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for mode in CreateMode::all() {
            let parsed: CreateMode = mode.as_str().parse().unwrap();
            assert_eq!(*mode, parsed);
        }
    }

    #[test]
    fn test_default_is_persistent() {
        let mode = CreateMode::default();
        assert!(!mode.is_ephemeral());
        assert!(!mode.is_sequential());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&CreateMode::EphemeralSequential).unwrap();
        assert_eq!(json, "\"ephemeral_sequential\"");
        let back: CreateMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CreateMode::EphemeralSequential);
    }
}
