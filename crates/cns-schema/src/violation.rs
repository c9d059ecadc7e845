//! # Schema Violations — The Runtime Error of the Policy Subsystem
//!
//! A violation is raised when an attempted operation contradicts the
//! schema governing its path. It carries the violated schema and one of a
//! fixed, enumerable set of reasons, so the caller aborting the operation
//! can report exactly which policy was broken and why.
//!
//! Construction-stage problems (a malformed schema definition or policy
//! document) are a different error class entirely, see
//! [`SchemaDefinitionError`](crate::SchemaDefinitionError), and can never
//! surface here: a malformed schema is rejected before registration.

use thiserror::Error;

use crate::schema::Schema;

/// The fixed set of reasons an operation can violate a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Deletion attempted on a path whose schema forbids it.
    CannotBeDeleted,
    /// A watch was requested but the schema forbids watching.
    CannotBeWatched,
    /// No watch was requested but the schema requires watching.
    MustBeWatched,
    /// An ephemeral create on a path whose schema forbids ephemeral nodes.
    CannotBeEphemeral,
    /// A persistent create on a path whose schema requires ephemeral nodes.
    MustBeEphemeral,
    /// A sequential create on a path whose schema forbids sequential nodes.
    CannotBeSequential,
    /// A plain create on a path whose schema requires sequential nodes.
    MustBeSequential,
    /// Node content rejected by the schema's data validator.
    DataNotValid,
}

impl ViolationKind {
    /// The human-readable reason string for this violation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CannotBeDeleted => "cannot be deleted",
            Self::CannotBeWatched => "cannot be watched",
            Self::MustBeWatched => "must be watched",
            Self::CannotBeEphemeral => "cannot be ephemeral",
            Self::MustBeEphemeral => "must be ephemeral",
            Self::CannotBeSequential => "cannot be sequential",
            Self::MustBeSequential => "must be sequential",
            Self::DataNotValid => "data is not valid",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attempted operation contradicted the schema governing its path.
///
/// Carries the violated [`Schema`] so the failure is attributable: the
/// caller gets the governed path (or pattern) and its documentation, not
/// just a reason string.
#[derive(Error, Debug, Clone)]
#[error("schema violation at '{}': {}", .schema.raw_path(), .kind)]
pub struct SchemaViolation {
    schema: Schema,
    kind: ViolationKind,
}

impl SchemaViolation {
    pub(crate) fn new(schema: Schema, kind: ViolationKind) -> Self {
        Self { schema, kind }
    }

    /// The schema that was violated.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Which policy rule was broken.
    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// The human-readable reason string.
    pub fn reason(&self) -> &'static str {
        self.kind.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        let expected = [
            (ViolationKind::CannotBeDeleted, "cannot be deleted"),
            (ViolationKind::CannotBeWatched, "cannot be watched"),
            (ViolationKind::MustBeWatched, "must be watched"),
            (ViolationKind::CannotBeEphemeral, "cannot be ephemeral"),
            (ViolationKind::MustBeEphemeral, "must be ephemeral"),
            (ViolationKind::CannotBeSequential, "cannot be sequential"),
            (ViolationKind::MustBeSequential, "must be sequential"),
            (ViolationKind::DataNotValid, "data is not valid"),
        ];
        for (kind, reason) in expected {
            assert_eq!(kind.as_str(), reason);
            assert_eq!(kind.to_string(), reason);
        }
    }

    #[test]
    fn test_violation_display_names_path_and_reason() {
        let schema = Schema::exact("/a/b")
            .documentation("test node")
            .build()
            .unwrap();
        let violation = SchemaViolation::new(schema, ViolationKind::CannotBeDeleted);
        let display = violation.to_string();
        assert!(display.contains("/a/b"), "missing path: {display}");
        assert!(display.contains("cannot be deleted"), "missing reason: {display}");
    }
}
