//! # SchemaSet — The Schema Registry
//!
//! Holds the registered schemas for a namespace and answers the one
//! question the coordination framework asks before every governed
//! operation: *which schema applies to this path?*
//!
//! ## Selection
//!
//! 1. A schema registered for the path as an **exact** match wins,
//!    regardless of any pattern that also matches.
//! 2. Otherwise pattern schemas are evaluated in registration order and
//!    the first full match wins. Registration order is the tie-break:
//!    selection must be deterministic, and first-registered-wins is the
//!    order operators can observe and control.
//! 3. Otherwise the registry-wide catch-all default applies. Lookup never
//!    fails.
//!
//! ## Concurrency
//!
//! Lookups are read-mostly; registration is rare. The lookup structure is
//! guarded by an `RwLock` so concurrent readers never observe a partially
//! updated set. Schemas themselves are immutable and shared as `Arc`s.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use cns_core::{Allowance, NodePath};

use crate::schema::{PathPattern, PathSelector, Schema};
use crate::validator::default_validator;

/// Profile of the catch-all schema applied to paths with no registered
/// schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPolicy {
    /// Unregistered paths are unconstrained: every allowance is `can`,
    /// deletion is allowed, any content is accepted.
    #[default]
    Permissive,
    /// Unregistered paths reject the operations that change namespace
    /// shape: ephemeral and sequential creation are forbidden and nodes
    /// cannot be deleted. Watching stays permitted; forbidding reads on
    /// ungoverned paths would break observers, not protect the tree.
    Strict,
}

impl DefaultPolicy {
    fn catch_all_schema(self) -> Schema {
        let selector = PathSelector::Pattern(PathPattern::catch_all());
        match self {
            Self::Permissive => Schema::from_parts(
                selector,
                "Catch-all for paths with no registered schema; imposes no constraints."
                    .to_string(),
                default_validator(),
                Allowance::Can,
                Allowance::Can,
                Allowance::Can,
                true,
            ),
            Self::Strict => Schema::from_parts(
                selector,
                "Catch-all for paths with no registered schema; forbids ephemeral and \
                 sequential creation and deletion."
                    .to_string(),
                default_validator(),
                Allowance::Cannot,
                Allowance::Cannot,
                Allowance::Can,
                false,
            ),
        }
    }
}

/// Error registering a schema into a [`SchemaSet`].
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A schema with the same selector identity is already registered.
    ///
    /// Silently replacing a registered policy would make selection depend
    /// on registration history invisible to operators; replacing a policy
    /// means building a new set.
    #[error("a schema is already registered for selector {selector:?}")]
    DuplicateSelector {
        /// Raw selector text of the rejected schema.
        selector: String,
    },
}

#[derive(Default)]
struct Inner {
    /// Exact-path schemas, ordered by path for deterministic listings.
    exact: BTreeMap<NodePath, Arc<Schema>>,
    /// Pattern schemas in registration order (the selection tie-break).
    patterns: Vec<Arc<Schema>>,
}

/// The set of registered schemas for a namespace.
pub struct SchemaSet {
    inner: RwLock<Inner>,
    default_schema: Arc<Schema>,
}

impl SchemaSet {
    /// An empty set whose catch-all follows the given default policy.
    pub fn new(default_policy: DefaultPolicy) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            default_schema: Arc::new(default_policy.catch_all_schema()),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register a schema.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateSelector`] if a schema with the same
    /// selector identity is already registered.
    pub fn register(&self, schema: Schema) -> Result<(), RegistryError> {
        let schema = Arc::new(schema);
        let mut inner = self.write();
        match schema.selector() {
            PathSelector::Exact(path) => {
                if inner.exact.contains_key(path) {
                    return Err(RegistryError::DuplicateSelector {
                        selector: schema.raw_path().to_string(),
                    });
                }
                inner.exact.insert(path.clone(), Arc::clone(&schema));
            }
            PathSelector::Pattern(_) => {
                if inner.patterns.iter().any(|existing| **existing == *schema) {
                    return Err(RegistryError::DuplicateSelector {
                        selector: schema.raw_path().to_string(),
                    });
                }
                inner.patterns.push(Arc::clone(&schema));
            }
        }
        info!(
            selector = %schema.raw_path(),
            exact = schema.selector().is_exact(),
            "registered schema"
        );
        Ok(())
    }

    /// The single schema applicable to the given path.
    ///
    /// Exact match first, then first-registered matching pattern, then the
    /// catch-all default. Never fails.
    pub fn lookup(&self, path: &NodePath) -> Arc<Schema> {
        let inner = self.read();
        if let Some(schema) = inner.exact.get(path) {
            debug!(path = %path, schema = %schema.raw_path(), "selected exact schema");
            return Arc::clone(schema);
        }
        if let Some(schema) = inner.patterns.iter().find(|s| s.matches(path)) {
            debug!(path = %path, schema = %schema.raw_path(), "selected pattern schema");
            return Arc::clone(schema);
        }
        debug!(path = %path, "no schema registered; using default");
        Arc::clone(&self.default_schema)
    }

    /// The catch-all schema applied to paths with no registered schema.
    pub fn default_schema(&self) -> Arc<Schema> {
        Arc::clone(&self.default_schema)
    }

    /// Number of registered schemas (the catch-all is not counted).
    pub fn len(&self) -> usize {
        let inner = self.read();
        inner.exact.len() + inner.patterns.len()
    }

    /// Whether no schemas have been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deterministic operator-facing listing of every registered schema,
    /// exact schemas first (ordered by path), then pattern schemas in
    /// registration order, then the catch-all default.
    pub fn to_documentation(&self) -> String {
        let inner = self.read();
        let mut out = String::from("Schema set:\n\n");
        for schema in inner.exact.values() {
            out.push_str(&schema.to_documentation());
            out.push('\n');
        }
        for schema in &inner.patterns {
            out.push_str(&schema.to_documentation());
            out.push('\n');
        }
        out.push_str(&self.default_schema.to_documentation());
        out
    }
}

impl std::fmt::Debug for SchemaSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("SchemaSet")
            .field("exact", &inner.exact.len())
            .field("patterns", &inner.patterns.len())
            .field("default_schema", &self.default_schema.raw_path())
            .finish()
    }
}
