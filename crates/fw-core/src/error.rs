//! Error types for normalization and emission.
//!
//! Only conditions that abort a conversion call are errors. Recoverable
//! problems (unsupported kinds, placeholder images, child-count mismatches)
//! are recorded as warnings on the `Session` instead.

use thiserror::Error;

/// A color variable could not be turned into a display name.
///
/// `Clone` because one in-flight lookup is shared by every caller waiting on
/// the same variable id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("color variable `{id}` could not be resolved: {reason}")]
pub struct VariableError {
    pub id: String,
    pub reason: String,
}

/// Failures that abort normalization of the current conversion call.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The host could not produce a structured export for a top-level node.
    #[error("structured export failed for node `{id}`: {reason}")]
    Export { id: String, reason: String },

    /// A bound color variable lookup failed.
    #[error(transparent)]
    Variable(#[from] VariableError),

    /// Settings or snapshot JSON was malformed.
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures raised while emitting one node's markup.
///
/// These never abort a whole batch: the top-level emission boundary logs the
/// error and substitutes an empty fragment for the failing subtree.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("node `{node}` has a non-finite {field}")]
    InvalidGeometry { node: String, field: &'static str },

    #[error("vector markup for `{node}` is malformed: {reason}")]
    InvalidVector { node: String, reason: String },
}
