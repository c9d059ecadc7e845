//! # SchemaBuilder — Policy Construction
//!
//! The only way to construct a [`Schema`]. The builder separates the two
//! error stages of the subsystem: everything that can be wrong with a
//! policy *definition* is caught here, before registration, so a malformed
//! schema can never be consulted at validation time.
//!
//! ## Defaults
//!
//! Unset optional fields take the permissive defaults: every allowance is
//! `can`, deletion is allowed, and the data validator accepts everything.
//! `documentation` has no default: a policy nobody can explain is a
//! definition error.

use std::sync::Arc;

use thiserror::Error;

use cns_core::{Allowance, NodePath, PathError};

use crate::schema::{PathPattern, PathSelector, Schema};
use crate::validator::{default_validator, DataValidator};

/// Error defining a schema. Construction-stage: raised by
/// [`SchemaBuilder::build`], never at validation time.
#[derive(Error, Debug)]
pub enum SchemaDefinitionError {
    /// No documentation was supplied.
    #[error("schema for {selector:?} has no documentation")]
    MissingDocumentation {
        /// Raw selector text of the schema being defined.
        selector: String,
    },

    /// The supplied documentation was empty or blank.
    #[error("schema for {selector:?} has blank documentation")]
    BlankDocumentation {
        /// Raw selector text of the schema being defined.
        selector: String,
    },

    /// The path selector was empty or blank.
    #[error("schema path selector is empty")]
    EmptySelector,

    /// The exact path did not satisfy the path grammar.
    #[error("invalid exact path: {0}")]
    InvalidPath(#[from] PathError),

    /// The path pattern did not compile.
    #[error("invalid path pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The pattern text that failed to compile.
        pattern: String,
        /// The underlying compile error.
        #[source]
        source: regex::Error,
    },
}

/// The selector a builder was started with, not yet validated.
#[derive(Debug, Clone)]
pub(crate) enum SelectorInput {
    Exact(String),
    Pattern(String),
}

impl SelectorInput {
    fn raw(&self) -> &str {
        match self {
            Self::Exact(s) | Self::Pattern(s) => s,
        }
    }
}

/// Builder for [`Schema`]. Start with [`Schema::exact`] or
/// [`Schema::pattern`]; the entry points make the selector duality
/// structural (one selector, always).
#[derive(Clone)]
pub struct SchemaBuilder {
    selector: SelectorInput,
    documentation: Option<String>,
    data_validator: Arc<dyn DataValidator>,
    ephemeral: Allowance,
    sequential: Allowance,
    watched: Allowance,
    can_be_deleted: bool,
}

impl SchemaBuilder {
    pub(crate) fn new(selector: SelectorInput) -> Self {
        Self {
            selector,
            documentation: None,
            data_validator: default_validator(),
            ephemeral: Allowance::Can,
            sequential: Allowance::Can,
            watched: Allowance::Can,
            can_be_deleted: true,
        }
    }

    /// Operator-facing description of the governed subtree. Required.
    pub fn documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Content validator for governed nodes. Default: accept everything.
    pub fn data_validator(mut self, validator: Arc<dyn DataValidator>) -> Self {
        self.data_validator = validator;
        self
    }

    /// Constraint on ephemeral creation. Default: `can`.
    pub fn ephemeral(mut self, allowance: Allowance) -> Self {
        self.ephemeral = allowance;
        self
    }

    /// Constraint on sequential creation. Default: `can`.
    pub fn sequential(mut self, allowance: Allowance) -> Self {
        self.sequential = allowance;
        self
    }

    /// Constraint on watching. Default: `can`.
    pub fn watched(mut self, allowance: Allowance) -> Self {
        self.watched = allowance;
        self
    }

    /// Whether governed nodes may ever be deleted. Default: `true`.
    pub fn can_be_deleted(mut self, can_be_deleted: bool) -> Self {
        self.can_be_deleted = can_be_deleted;
        self
    }

    /// Validate the definition and produce the immutable [`Schema`].
    ///
    /// # Errors
    ///
    /// [`SchemaDefinitionError`] if the selector is blank or malformed,
    /// or the documentation is missing or blank.
    pub fn build(self) -> Result<Schema, SchemaDefinitionError> {
        if self.selector.raw().trim().is_empty() {
            return Err(SchemaDefinitionError::EmptySelector);
        }

        let documentation = match self.documentation {
            None => {
                return Err(SchemaDefinitionError::MissingDocumentation {
                    selector: self.selector.raw().to_string(),
                })
            }
            Some(doc) if doc.trim().is_empty() => {
                return Err(SchemaDefinitionError::BlankDocumentation {
                    selector: self.selector.raw().to_string(),
                })
            }
            Some(doc) => doc,
        };

        let selector = match self.selector {
            SelectorInput::Exact(path) => PathSelector::Exact(NodePath::new(path)?),
            SelectorInput::Pattern(pattern) => {
                let compiled = PathPattern::new(pattern.clone()).map_err(|source| {
                    SchemaDefinitionError::InvalidPattern { pattern, source }
                })?;
                PathSelector::Pattern(compiled)
            }
        };

        Ok(Schema::from_parts(
            selector,
            documentation,
            self.data_validator,
            self.ephemeral,
            self.sequential,
            self.watched,
            self.can_be_deleted,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cns_core::CreateMode;

    #[test]
    fn test_defaults() {
        let schema = Schema::exact("/a").documentation("d").build().unwrap();
        assert_eq!(schema.ephemeral(), Allowance::Can);
        assert_eq!(schema.sequential(), Allowance::Can);
        assert_eq!(schema.watched(), Allowance::Can);
        assert!(schema.can_be_deleted());
        // Default validator accepts empty and non-empty content alike.
        schema.validate_data(b"").unwrap();
        schema.validate_data(b"payload").unwrap();
    }

    #[test]
    fn test_documentation_required() {
        let err = Schema::exact("/a").build().unwrap_err();
        assert!(matches!(
            err,
            SchemaDefinitionError::MissingDocumentation { .. }
        ));
    }

    #[test]
    fn test_blank_documentation_rejected() {
        let err = Schema::exact("/a").documentation("   ").build().unwrap_err();
        assert!(matches!(
            err,
            SchemaDefinitionError::BlankDocumentation { .. }
        ));
    }

    #[test]
    fn test_blank_selector_rejected() {
        assert!(matches!(
            Schema::exact("").documentation("d").build().unwrap_err(),
            SchemaDefinitionError::EmptySelector
        ));
        assert!(matches!(
            Schema::pattern("  ").documentation("d").build().unwrap_err(),
            SchemaDefinitionError::EmptySelector
        ));
    }

    #[test]
    fn test_invalid_exact_path_rejected() {
        let err = Schema::exact("relative/path")
            .documentation("d")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaDefinitionError::InvalidPath(_)));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = Schema::pattern("/a/(unclosed")
            .documentation("d")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaDefinitionError::InvalidPattern { .. }));
    }

    #[test]
    fn test_explicit_settings_survive_build() {
        let schema = Schema::pattern("/locks/.*")
            .documentation("lock nodes")
            .ephemeral(Allowance::Must)
            .sequential(Allowance::Cannot)
            .watched(Allowance::Cannot)
            .can_be_deleted(false)
            .build()
            .unwrap();
        assert_eq!(schema.ephemeral(), Allowance::Must);
        assert_eq!(schema.sequential(), Allowance::Cannot);
        assert_eq!(schema.watched(), Allowance::Cannot);
        assert!(!schema.can_be_deleted());
        assert!(schema
            .validate_create(CreateMode::Persistent, b"")
            .is_err());
    }
}
