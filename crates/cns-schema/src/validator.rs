//! # Data Validators — Pluggable Content Checks
//!
//! A schema may constrain what a node's content looks like. The check is a
//! single-method capability, [`DataValidator`], supplied per schema and
//! invoked by [`Schema::validate_data`](crate::Schema::validate_data).
//!
//! Built-ins cover the common cases: accept everything (the default
//! binding, so a schema never lacks a validator), require UTF-8, or
//! require well-formed JSON. Anything else is a one-trait-impl away.

use std::sync::Arc;

/// Predicate deciding whether node content is well-formed.
///
/// Implementations must be cheap and pure: validation runs synchronously
/// on every create and data-set operation for a governed path. The name
/// identifies the validator in operator-facing policy listings.
pub trait DataValidator: Send + Sync {
    /// Whether the given content is acceptable for the governed path.
    fn is_valid(&self, data: &[u8]) -> bool;

    /// Short identifier for policy listings and diagnostics.
    fn name(&self) -> &str;
}

/// Accepts every byte sequence, including the empty one.
///
/// This is the default binding: a schema with no opinion about content
/// still carries a validator, keeping the validation path branch-free.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl DataValidator for AcceptAll {
    fn is_valid(&self, _data: &[u8]) -> bool {
        true
    }

    fn name(&self) -> &str {
        "accept_all"
    }
}

/// Accepts content that is valid UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Validator;

impl DataValidator for Utf8Validator {
    fn is_valid(&self, data: &[u8]) -> bool {
        std::str::from_utf8(data).is_ok()
    }

    fn name(&self) -> &str {
        "utf8"
    }
}

/// Accepts content that parses as JSON.
///
/// Empty content is accepted: nodes are routinely created empty before
/// their first write, and absent content is not malformed content.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValidator;

impl DataValidator for JsonValidator {
    fn is_valid(&self, data: &[u8]) -> bool {
        if data.is_empty() {
            return true;
        }
        serde_json::from_slice::<serde_json::Value>(data).is_ok()
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// The default validator binding: [`AcceptAll`], shared.
pub fn default_validator() -> Arc<dyn DataValidator> {
    Arc::new(AcceptAll)
}
