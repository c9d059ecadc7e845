//! # cns-schema — Path-Policy Schemas
//!
//! Declares and enforces per-path operation policies for a hierarchical
//! coordination namespace. An operator binds a [`Schema`] to an exact path
//! or a path pattern; infrastructure code consults the governing schema
//! before creating, deleting, or watching a node and aborts the operation
//! on a [`SchemaViolation`], failing fast and loudly instead of silently
//! creating nodes that break operational assumptions.
//!
//! ## Pieces
//!
//! - [`Schema`] / [`SchemaBuilder`] — the immutable policy record and its
//!   only construction path. Identity is the path selector alone.
//! - [`SchemaSet`] — the registry. Exact-path schemas beat pattern
//!   schemas; pattern ties break by registration order; unregistered
//!   paths get the configurable catch-all.
//! - [`DataValidator`] — pluggable content checks, with `accept_all`,
//!   `utf8`, and `json` built in.
//! - [`loader`] — declarative JSON/YAML policy documents.
//!
//! ## Two Error Stages
//!
//! Definition problems ([`SchemaDefinitionError`], [`SchemaLoadError`],
//! [`RegistryError`]) are caught before a schema is ever consulted.
//! The only runtime error is [`SchemaViolation`], carrying the violated
//! schema and one of a fixed set of reasons.
//!
//! ## Crate Policy
//!
//! - Depends only on `cns-core` internally.
//! - Validation operations are pure: no I/O, no locking, no blocking.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod builder;
pub mod loader;
pub mod registry;
pub mod schema;
pub mod validator;
pub mod violation;

// Re-export primary types for ergonomic imports.
pub use builder::{SchemaBuilder, SchemaDefinitionError};
pub use loader::{
    load_json, load_yaml, SchemaDocument, SchemaLoadError, SchemaSetDocument, ValidatorRegistry,
};
pub use registry::{DefaultPolicy, RegistryError, SchemaSet};
pub use schema::{PathPattern, PathSelector, Schema};
pub use validator::{AcceptAll, DataValidator, JsonValidator, Utf8Validator};
pub use violation::{SchemaViolation, ViolationKind};
