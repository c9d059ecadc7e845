//! # Schema — Per-Path Operation Policies
//!
//! A `Schema` declares what operations are permissible on the nodes it
//! governs: whether content is well-formed, whether nodes may/must/must-not
//! be ephemeral or sequential, whether they may/must/must-not be watched,
//! and whether they may ever be deleted. Infrastructure code consults the
//! schema before issuing an operation and aborts loudly on a violation,
//! instead of silently creating nodes that break operational assumptions.
//!
//! ## Selector Invariant
//!
//! A schema is bound to exactly one of an exact path or a path pattern.
//! The binding is the [`PathSelector`] tagged union, so "never both, never
//! neither" holds structurally rather than by construction-time check.
//!
//! ## Identity Invariant
//!
//! Equality and hashing of a `Schema` consider the path selector ONLY.
//! Registries key schemas by the path identity they govern, not by their
//! full content; two schemas for the same selector are the same schema no
//! matter how their documentation, validator, or allowances differ. This
//! is deliberate and implemented as an explicit identity key below; do
//! not replace it with a derived all-fields equality.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use regex::Regex;

use cns_core::{Allowance, CreateMode, NodePath};

use crate::builder::{SchemaBuilder, SelectorInput};
use crate::validator::DataValidator;
use crate::violation::{SchemaViolation, ViolationKind};

/// A compiled path pattern.
///
/// The pattern applies to whole paths: matching is anchored at both ends,
/// so `/locks/.*` governs `/locks/a` but not `/other/locks/a`. The
/// original pattern text is preserved: it is the pattern's identity and
/// what operators see in listings.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    anchored: Regex,
}

impl PathPattern {
    /// Compile a path pattern from its textual source.
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let anchored = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self { source, anchored })
    }

    /// The pattern that matches every path. Backs the registry's
    /// catch-all default schema.
    pub(crate) fn catch_all() -> Self {
        Self {
            source: ".*".to_string(),
            anchored: Regex::new("^(?:.*)$").expect("static pattern"),
        }
    }

    /// The textual source of the pattern, as supplied (unanchored).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern matches the whole of the given path.
    pub fn matches(&self, path: &NodePath) -> bool {
        self.anchored.is_match(path.as_str())
    }
}

// Pattern identity is the source text; the compiled automaton is a cache.
impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathPattern {}

impl Hash for PathPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

/// What a schema is bound to: an exact path or a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSelector {
    /// Governs exactly one path.
    Exact(NodePath),
    /// Governs every path the pattern matches in full.
    Pattern(PathPattern),
}

impl PathSelector {
    /// The raw textual form: the exact path, or the pattern source.
    ///
    /// Used for logging and listings, not for matching.
    pub fn raw(&self) -> &str {
        match self {
            Self::Exact(path) => path.as_str(),
            Self::Pattern(pattern) => pattern.as_str(),
        }
    }

    /// Whether this selector is an exact-path binding.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    /// The exact path, if this is an exact-path binding.
    pub fn as_exact(&self) -> Option<&NodePath> {
        match self {
            Self::Exact(path) => Some(path),
            Self::Pattern(_) => None,
        }
    }

    /// Whether this selector applies to the given path.
    pub fn matches(&self, path: &NodePath) -> bool {
        match self {
            Self::Exact(exact) => exact == path,
            Self::Pattern(pattern) => pattern.matches(path),
        }
    }
}

impl std::fmt::Display for PathSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw())
    }
}

/// Immutable policy record for a path or path pattern.
///
/// Constructed once through [`SchemaBuilder`] at policy-definition time,
/// registered into a [`SchemaSet`](crate::SchemaSet), and consulted
/// read-only thereafter. There are no mutation operations; a policy change
/// is a new `Schema`. All validation operations are pure and safe to call
/// concurrently.
#[derive(Clone)]
pub struct Schema {
    selector: PathSelector,
    documentation: String,
    data_validator: Arc<dyn DataValidator>,
    ephemeral: Allowance,
    sequential: Allowance,
    watched: Allowance,
    can_be_deleted: bool,
}

impl Schema {
    /// Start a builder for a schema governing exactly the given path.
    ///
    /// Exact-path schemas take precedence over pattern schemas during
    /// registry selection.
    pub fn exact(path: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(SelectorInput::Exact(path.into()))
    }

    /// Start a builder for a schema governing every path the pattern
    /// matches in full.
    pub fn pattern(pattern: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(SelectorInput::Pattern(pattern.into()))
    }

    pub(crate) fn from_parts(
        selector: PathSelector,
        documentation: String,
        data_validator: Arc<dyn DataValidator>,
        ephemeral: Allowance,
        sequential: Allowance,
        watched: Allowance,
        can_be_deleted: bool,
    ) -> Self {
        Self {
            selector,
            documentation,
            data_validator,
            ephemeral,
            sequential,
            watched,
            can_be_deleted,
        }
    }

    /// The selector this schema is bound to.
    pub fn selector(&self) -> &PathSelector {
        &self.selector
    }

    /// The raw path for this schema: the exact path if one was used,
    /// otherwise the textual source of the pattern.
    pub fn raw_path(&self) -> &str {
        self.selector.raw()
    }

    /// Operator-facing description of the governed subtree.
    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// The bound content validator.
    pub fn data_validator(&self) -> &Arc<dyn DataValidator> {
        &self.data_validator
    }

    /// Constraint on ephemeral creation.
    pub fn ephemeral(&self) -> Allowance {
        self.ephemeral
    }

    /// Constraint on sequential creation.
    pub fn sequential(&self) -> Allowance {
        self.sequential
    }

    /// Constraint on watching.
    pub fn watched(&self) -> Allowance {
        self.watched
    }

    /// Whether nodes governed by this schema may ever be deleted.
    pub fn can_be_deleted(&self) -> bool {
        self.can_be_deleted
    }

    /// Whether this schema applies to the given path.
    pub fn matches(&self, path: &NodePath) -> bool {
        self.selector.matches(path)
    }

    fn violation(&self, kind: ViolationKind) -> SchemaViolation {
        SchemaViolation::new(self.clone(), kind)
    }

    /// Validate that this schema allows node deletion.
    ///
    /// # Errors
    ///
    /// `SchemaViolation` with reason "cannot be deleted" if the schema
    /// forbids deletion.
    pub fn validate_deletion(&self) -> Result<(), SchemaViolation> {
        if !self.can_be_deleted {
            return Err(self.violation(ViolationKind::CannotBeDeleted));
        }
        Ok(())
    }

    /// Validate a watch state against this schema's watching constraint.
    ///
    /// `Can` succeeds for either state; `Cannot` rejects an active watch;
    /// `Must` rejects the absence of one.
    ///
    /// # Errors
    ///
    /// `SchemaViolation` with reason "cannot be watched" or
    /// "must be watched".
    pub fn validate_watcher(&self, is_watching: bool) -> Result<(), SchemaViolation> {
        if is_watching && self.watched == Allowance::Cannot {
            return Err(self.violation(ViolationKind::CannotBeWatched));
        }
        if !is_watching && self.watched == Allowance::Must {
            return Err(self.violation(ViolationKind::MustBeWatched));
        }
        Ok(())
    }

    /// Validate a create operation: mode constraints, then content.
    ///
    /// Checks run in a fixed order (ephemeral forbidden, ephemeral
    /// required, sequential forbidden, sequential required) and the first
    /// violated check is the one reported. If all four pass, the content
    /// is handed to [`validate_data`](Self::validate_data).
    ///
    /// # Errors
    ///
    /// `SchemaViolation` naming the first violated constraint.
    pub fn validate_create(&self, mode: CreateMode, data: &[u8]) -> Result<(), SchemaViolation> {
        if mode.is_ephemeral() && self.ephemeral == Allowance::Cannot {
            return Err(self.violation(ViolationKind::CannotBeEphemeral));
        }
        if !mode.is_ephemeral() && self.ephemeral == Allowance::Must {
            return Err(self.violation(ViolationKind::MustBeEphemeral));
        }
        if mode.is_sequential() && self.sequential == Allowance::Cannot {
            return Err(self.violation(ViolationKind::CannotBeSequential));
        }
        if !mode.is_sequential() && self.sequential == Allowance::Must {
            return Err(self.violation(ViolationKind::MustBeSequential));
        }
        self.validate_data(data)
    }

    /// Validate node content against the bound data validator.
    ///
    /// # Errors
    ///
    /// `SchemaViolation` with reason "data is not valid".
    pub fn validate_data(&self, data: &[u8]) -> Result<(), SchemaViolation> {
        if !self.data_validator.is_valid(data) {
            return Err(self.violation(ViolationKind::DataNotValid));
        }
        Ok(())
    }

    /// Deterministic multi-line policy listing for operators.
    ///
    /// The exact formatting is informational, not a compatibility
    /// contract.
    pub fn to_documentation(&self) -> String {
        format!(
            "Path: {}\nDocumentation: {}\nValidator: {}\nephemeral: {} | sequential: {} | watched: {} | can_be_deleted: {}\n",
            self.raw_path(),
            self.documentation,
            self.data_validator.name(),
            self.ephemeral,
            self.sequential,
            self.watched,
            self.can_be_deleted,
        )
    }
}

// Identity is the selector only; see the module docs.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.selector == other.selector
    }
}

impl Eq for Schema {}

impl Hash for Schema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.selector.hash(state);
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("selector", &self.selector)
            .field("documentation", &self.documentation)
            .field("data_validator", &self.data_validator.name())
            .field("ephemeral", &self.ephemeral)
            .field("sequential", &self.sequential)
            .field("watched", &self.watched)
            .field("can_be_deleted", &self.can_be_deleted)
            .finish()
    }
}
