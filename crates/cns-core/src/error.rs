//! # Path Grammar Errors
//!
//! Errors produced when a string fails to parse as a [`NodePath`].
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! [`NodePath`]: crate::path::NodePath

use thiserror::Error;

/// Error constructing a [`NodePath`] from a string.
///
/// Each variant names the first rule the candidate string broke; the
/// variants are mutually exclusive for a given input because validation
/// stops at the first violation.
///
/// [`NodePath`]: crate::path::NodePath
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The candidate string was empty.
    #[error("path is empty")]
    Empty,

    /// The candidate string did not start with `/`.
    #[error("path {0:?} is not absolute (must start with '/')")]
    NotAbsolute(String),

    /// The candidate string ended with `/` and is not the root path.
    #[error("path {0:?} has a trailing slash")]
    TrailingSlash(String),

    /// The candidate string contained an empty segment (`//`).
    #[error("path {0:?} contains an empty segment")]
    EmptySegment(String),

    /// The candidate string contained a `.` or `..` segment.
    #[error("path {0:?} contains a relative segment ('.' or '..')")]
    RelativeSegment(String),

    /// The candidate string contained a NUL character.
    #[error("path contains a NUL character")]
    IllegalCharacter,
}
