//! # cns-core — Foundational Types for the coordns Stack
//!
//! This crate is the bedrock of the coordns stack. It defines the value
//! types of the hierarchical coordination namespace that every other crate
//! speaks: node paths, create modes, and the tri-state allowance used by
//! path policies. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrapper for node paths.** `NodePath` has a private inner
//!    field and a single validating constructor. A value of type `NodePath`
//!    is a syntactically valid absolute path, always. No bare strings for
//!    node locations.
//!
//! 2. **Single `Allowance` enum.** Three discrete values (`Can`, `Must`,
//!    `Cannot`) instead of a pair of required/forbidden booleans. The
//!    impossible "both required and forbidden" state is unrepresentable,
//!    and every policy check is a single equality comparison.
//!
//! 3. **`CreateMode` as the namespace exposes it.** Persistent/ephemeral ×
//!    plain/sequential as one exhaustive enum with derived predicates, not
//!    two loose booleans threaded through call sites.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cns-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod allowance;
pub mod create_mode;
pub mod error;
pub mod path;

// Re-export primary types for ergonomic imports.
pub use allowance::Allowance;
pub use create_mode::CreateMode;
pub use error::PathError;
pub use path::NodePath;
