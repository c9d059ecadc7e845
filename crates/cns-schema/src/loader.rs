//! # Declarative Policy Documents
//!
//! A schema set can be declared as data instead of code: a JSON or YAML
//! document listing the schemas to register, with unset keys taking the
//! builder defaults. Operators keep policy in configuration; the loader
//! turns it into a ready [`SchemaSet`].
//!
//! Named validators resolve through a [`ValidatorRegistry`] pre-seeded
//! with the built-ins (`accept_all`, `utf8`, `json`); host code registers
//! its own implementations under additional names before loading.
//!
//! Every way a document can be wrong (unparseable text, an entry with
//! both or neither of `path`/`pattern`, an unknown validator name, a
//! malformed selector, a duplicate selector) is a load-stage error. A
//! malformed document never produces a partially registered set.
//!
//! ## Document Shape
//!
//! ```yaml
//! default: strict
//! schemas:
//!   - pattern: /locks/.*
//!     documentation: Lock nodes are session-bound and unordered.
//!     ephemeral: must
//!     sequential: cannot
//!   - path: /config/app
//!     documentation: Application configuration document.
//!     validator: json
//!     can_be_deleted: false
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use cns_core::Allowance;

use crate::builder::SchemaDefinitionError;
use crate::registry::{DefaultPolicy, RegistryError, SchemaSet};
use crate::schema::Schema;
use crate::validator::{AcceptAll, DataValidator, JsonValidator, Utf8Validator};

/// Error loading a schema set from a declarative document.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// The document was not valid JSON.
    #[error("policy document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document was not valid YAML.
    #[error("policy document is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An entry set both or neither of `path` and `pattern`.
    #[error("schema entry {index} must set exactly one of \"path\" and \"pattern\"")]
    SelectorConflict {
        /// Zero-based position of the offending entry.
        index: usize,
    },

    /// An entry named a validator the registry does not know.
    #[error("schema entry {index} names unknown validator {name:?}")]
    UnknownValidator {
        /// Zero-based position of the offending entry.
        index: usize,
        /// The unresolved validator name.
        name: String,
    },

    /// An entry failed schema definition validation.
    #[error(transparent)]
    Definition(#[from] SchemaDefinitionError),

    /// Two entries carried the same selector identity.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Resolves validator names in policy documents to implementations.
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn DataValidator>>,
}

impl ValidatorRegistry {
    /// A registry holding only the built-in validators.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            validators: HashMap::new(),
        };
        registry.register(Arc::new(AcceptAll));
        registry.register(Arc::new(Utf8Validator));
        registry.register(Arc::new(JsonValidator));
        registry
    }

    /// Register a validator under its own name, replacing any previous
    /// binding for that name.
    pub fn register(&mut self, validator: Arc<dyn DataValidator>) {
        self.validators
            .insert(validator.name().to_string(), validator);
    }

    /// The validator bound to the given name, if any.
    pub fn get(&self, name: &str) -> Option<Arc<dyn DataValidator>> {
        self.validators.get(name).map(Arc::clone)
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// One schema entry in a policy document. Unset keys take the builder
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Exact path to govern. Exactly one of `path`/`pattern` must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Path pattern to govern. Exactly one of `path`/`pattern` must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Operator-facing description. Required.
    pub documentation: String,
    /// Constraint on ephemeral creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<Allowance>,
    /// Constraint on sequential creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequential: Option<Allowance>,
    /// Constraint on watching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched: Option<Allowance>,
    /// Whether governed nodes may ever be deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_be_deleted: Option<bool>,
    /// Name of the content validator to bind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
}

/// A whole policy document: the default policy plus the schema entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSetDocument {
    /// Catch-all profile for unregistered paths.
    #[serde(default)]
    pub default: DefaultPolicy,
    /// Schemas to register, in order. Order is observable: it is the
    /// pattern-selection tie-break.
    #[serde(default)]
    pub schemas: Vec<SchemaDocument>,
}

impl SchemaSetDocument {
    /// Build the schema set this document declares.
    ///
    /// # Errors
    ///
    /// [`SchemaLoadError`] describing the first offending entry.
    pub fn build(self, validators: &ValidatorRegistry) -> Result<SchemaSet, SchemaLoadError> {
        let set = SchemaSet::new(self.default);
        for (index, entry) in self.schemas.into_iter().enumerate() {
            let builder = match (entry.path, entry.pattern) {
                (Some(path), None) => Schema::exact(path),
                (None, Some(pattern)) => Schema::pattern(pattern),
                _ => return Err(SchemaLoadError::SelectorConflict { index }),
            };
            let mut builder = builder.documentation(entry.documentation);
            if let Some(allowance) = entry.ephemeral {
                builder = builder.ephemeral(allowance);
            }
            if let Some(allowance) = entry.sequential {
                builder = builder.sequential(allowance);
            }
            if let Some(allowance) = entry.watched {
                builder = builder.watched(allowance);
            }
            if let Some(can_be_deleted) = entry.can_be_deleted {
                builder = builder.can_be_deleted(can_be_deleted);
            }
            if let Some(name) = entry.validator {
                let validator = validators
                    .get(&name)
                    .ok_or(SchemaLoadError::UnknownValidator { index, name })?;
                builder = builder.data_validator(validator);
            }
            set.register(builder.build()?)?;
        }
        info!(schemas = set.len(), "loaded schema set from policy document");
        Ok(set)
    }
}

/// Load a schema set from a JSON policy document.
///
/// # Errors
///
/// [`SchemaLoadError`] if the document is unparseable or any entry is
/// malformed.
pub fn load_json(
    document: &str,
    validators: &ValidatorRegistry,
) -> Result<SchemaSet, SchemaLoadError> {
    let parsed: SchemaSetDocument = serde_json::from_str(document)?;
    parsed.build(validators)
}

/// Load a schema set from a YAML policy document.
///
/// # Errors
///
/// [`SchemaLoadError`] if the document is unparseable or any entry is
/// malformed.
pub fn load_yaml(
    document: &str,
    validators: &ValidatorRegistry,
) -> Result<SchemaSet, SchemaLoadError> {
    let parsed: SchemaSetDocument = serde_yaml::from_str(document)?;
    parsed.build(validators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cns_core::{CreateMode, NodePath};

    fn path(s: &str) -> NodePath {
        NodePath::new(s).unwrap()
    }

    #[test]
    fn test_load_yaml_document() {
        let set = load_yaml(
            r#"
default: strict
schemas:
  - pattern: /locks/.*
    documentation: Lock nodes are session-bound and unordered.
    ephemeral: must
    sequential: cannot
    watched: cannot
  - path: /config/app
    documentation: Application configuration document.
    validator: json
    can_be_deleted: false
"#,
            &ValidatorRegistry::with_builtins(),
        )
        .unwrap();

        assert_eq!(set.len(), 2);

        let lock = set.lookup(&path("/locks/worker-1"));
        assert_eq!(
            lock.validate_create(CreateMode::Persistent, b"")
                .unwrap_err()
                .reason(),
            "must be ephemeral"
        );

        let config = set.lookup(&path("/config/app"));
        assert_eq!(
            config
                .validate_data(b"not json at all {")
                .unwrap_err()
                .reason(),
            "data is not valid"
        );
        assert!(config.validate_deletion().is_err());

        // Strict default governs everything else.
        let other = set.lookup(&path("/elsewhere"));
        assert!(other.validate_deletion().is_err());
    }

    #[test]
    fn test_load_json_document() {
        let set = load_json(
            r#"{
                "schemas": [
                    {
                        "pattern": "/queue/.*",
                        "documentation": "Queue entries.",
                        "sequential": "must"
                    }
                ]
            }"#,
            &ValidatorRegistry::with_builtins(),
        )
        .unwrap();

        let schema = set.lookup(&path("/queue/item"));
        assert_eq!(
            schema
                .validate_create(CreateMode::Persistent, b"")
                .unwrap_err()
                .reason(),
            "must be sequential"
        );
    }

    #[test]
    fn test_unset_keys_take_builder_defaults() {
        let set = load_yaml(
            r#"
schemas:
  - path: /plain
    documentation: No explicit settings.
"#,
            &ValidatorRegistry::with_builtins(),
        )
        .unwrap();
        let schema = set.lookup(&path("/plain"));
        assert_eq!(schema.ephemeral(), Allowance::Can);
        assert_eq!(schema.sequential(), Allowance::Can);
        assert_eq!(schema.watched(), Allowance::Can);
        assert!(schema.can_be_deleted());
        schema.validate_data(b"\xff\xfe").unwrap();
    }

    #[test]
    fn test_both_selectors_rejected() {
        let err = load_yaml(
            r#"
schemas:
  - path: /a
    pattern: /a/.*
    documentation: Conflicted.
"#,
            &ValidatorRegistry::with_builtins(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaLoadError::SelectorConflict { index: 0 }));
    }

    #[test]
    fn test_neither_selector_rejected() {
        let err = load_yaml(
            r#"
schemas:
  - documentation: Unbound.
"#,
            &ValidatorRegistry::with_builtins(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaLoadError::SelectorConflict { index: 0 }));
    }

    #[test]
    fn test_unknown_validator_rejected() {
        let err = load_yaml(
            r#"
schemas:
  - path: /a
    documentation: Uses a validator nobody registered.
    validator: protobuf
"#,
            &ValidatorRegistry::with_builtins(),
        )
        .unwrap_err();
        match err {
            SchemaLoadError::UnknownValidator { index, name } => {
                assert_eq!(index, 0);
                assert_eq!(name, "protobuf");
            }
            other => panic!("Expected UnknownValidator, got: {other}"),
        }
    }

    #[test]
    fn test_custom_validator_resolves() {
        struct NonEmpty;
        impl DataValidator for NonEmpty {
            fn is_valid(&self, data: &[u8]) -> bool {
                !data.is_empty()
            }
            fn name(&self) -> &str {
                "non_empty"
            }
        }

        let mut validators = ValidatorRegistry::with_builtins();
        validators.register(Arc::new(NonEmpty));
        let set = load_yaml(
            r#"
schemas:
  - path: /a
    documentation: Content must be present.
    validator: non_empty
"#,
            &validators,
        )
        .unwrap();
        let schema = set.lookup(&path("/a"));
        schema.validate_data(b"x").unwrap();
        assert!(schema.validate_data(b"").is_err());
    }

    #[test]
    fn test_duplicate_selector_rejected() {
        let err = load_yaml(
            r#"
schemas:
  - path: /a
    documentation: First.
  - path: /a
    documentation: Second.
"#,
            &ValidatorRegistry::with_builtins(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaLoadError::Registry(_)));
    }

    #[test]
    fn test_unparseable_document_rejected() {
        assert!(matches!(
            load_json("{not json", &ValidatorRegistry::with_builtins()),
            Err(SchemaLoadError::Json(_))
        ));
        assert!(matches!(
            load_yaml(": not yaml :", &ValidatorRegistry::with_builtins()),
            Err(SchemaLoadError::Yaml(_))
        ));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = load_yaml(
            r#"
schemas:
  - path: /a
    documentation: Has a typo'd key.
    epheremal: must
"#,
            &ValidatorRegistry::with_builtins(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaLoadError::Yaml(_)));
    }
}
