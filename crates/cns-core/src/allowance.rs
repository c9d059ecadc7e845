//! # Allowance — Tri-State Permission Values
//!
//! Defines the `Allowance` enum used by path policies to constrain one
//! property of a node (ephemeral, sequential, watched). This is the ONE
//! definition used across the stack; every `match` on `Allowance` must be
//! exhaustive, so adding a value would force every consumer to handle it.
//!
//! ## Design
//!
//! Three discrete values rather than two booleans (required/forbidden):
//! the contradictory "both required and forbidden" state cannot be
//! represented, and each policy check reduces to a single equality
//! comparison against the requested operation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Tri-state permission for one property of a node.
///
/// `Can` is the unconstrained common case: most subtrees have no opinion
/// about a property. `Must` and `Cannot` are the two ways a subtree can
/// impose a hard requirement. Only equality against the requested operation
/// matters; the values carry no ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allowance {
    /// The property is permitted but not required.
    #[default]
    Can,
    /// The property is required; its absence is a violation.
    Must,
    /// The property is forbidden; its presence is a violation.
    Cannot,
}

/// Total number of allowance values. Used for exhaustive-iteration tests.
pub const ALLOWANCE_COUNT: usize = 3;

impl Allowance {
    /// Returns all allowance values in canonical order.
    pub fn all() -> &'static [Allowance] {
        &[Self::Can, Self::Must, Self::Cannot]
    }

    /// Returns the snake_case string identifier for this allowance.
    ///
    /// This must match the serde serialization format used by declarative
    /// policy documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Can => "can",
            Self::Must => "must",
            Self::Cannot => "cannot",
        }
    }
}

impl std::fmt::Display for Allowance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an [`Allowance`] from its string identifier.
#[derive(Error, Debug)]
#[error("unknown allowance: {0:?} (expected \"can\", \"must\", or \"cannot\")")]
pub struct ParseAllowanceError(pub String);

impl FromStr for Allowance {
    type Err = ParseAllowanceError;

    /// Parse an allowance from its snake_case string identifier.
    ///
    /// Accepts the same identifiers produced by [`Allowance::as_str()`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "can" => Ok(Self::Can),
            "must" => Ok(Self::Must),
            "cannot" => Ok(Self::Cannot),
            other => Err(ParseAllowanceError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_count() {
        assert_eq!(Allowance::all().len(), ALLOWANCE_COUNT);
    }

    #[test]
    fn test_all_unique() {
        let mut seen = std::collections::HashSet::new();
        for a in Allowance::all() {
            assert!(seen.insert(a), "Duplicate allowance: {a}");
        }
    }

    #[test]
    fn test_default_is_can() {
        assert_eq!(Allowance::default(), Allowance::Can);
    }

    #[test]
    fn test_as_str_roundtrip() {
        for allowance in Allowance::all() {
            let s = allowance.as_str();
            let parsed: Allowance = s.parse().unwrap_or_else(|e| {
                panic!("Failed to parse {s:?}: {e}")
            });
            assert_eq!(*allowance, parsed);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "may".parse::<Allowance>().unwrap_err();
        assert!(err.to_string().contains("may"));
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Allowance::Can).unwrap(), "\"can\"");
        assert_eq!(serde_json::to_string(&Allowance::Must).unwrap(), "\"must\"");
        assert_eq!(serde_json::to_string(&Allowance::Cannot).unwrap(), "\"cannot\"");
        let back: Allowance = serde_json::from_str("\"cannot\"").unwrap();
        assert_eq!(back, Allowance::Cannot);
    }
}
