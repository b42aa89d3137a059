//! Error types for style tree parsing, compilation and lookup.

use thiserror::Error;

/// Errors raised when a value cannot be compiled at all.
///
/// Structurally odd entries inside a mapping never produce this error; they
/// are dropped by the validating parse step. Only input that is not a mapping
/// in the first place is rejected.
///
/// # Examples
///
/// ```rust
/// use fcss::{compile_value, CompileError};
///
/// let err = compile_value(&serde_json::json!("color: red"), None).unwrap_err();
/// assert!(matches!(err, CompileError::NotAMapping { .. }));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The style declaration was a scalar or array instead of a mapping.
    #[error("style declaration must be a mapping, found {found}")]
    NotAMapping { found: &'static str },
}

/// Errors raised while reading a value out of a [`StyleTree`](crate::StyleTree).
///
/// These never leave the resolution layer: callers map them to "no value".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No entry exists at the requested path.
    #[error("no style entry at {path}")]
    MissingPath { path: String },

    /// An entry exists but is a leaf where a tree was expected, or vice versa.
    #[error("style entry at {path} has the wrong shape")]
    WrongShape { path: String },
}
