//! Error types.

use crate::state::FieldPath;
use thiserror::Error;

/// Errors raised while resolving a spec tree against the pointer.
///
/// These are fatal to the drag session that raised them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Nearest-of node at `{path}` has no children")]
    EmptyNearestOf { path: String },
    #[error("Continuous node at `{path}` drives `{field}`, which is not a numeric leaf")]
    MissingField { path: String, field: FieldPath },
    #[error("Span at `{path}` needs at least two states, found {states}")]
    DegenerateSpan { path: String, states: usize },
    #[error("Span at `{path}`: state {index} cannot be placed on screen")]
    UnplaceableSpanState { path: String, index: usize },
    #[error("Span at `{path}` joins states of different shapes")]
    IncompatibleStates { path: String },
    #[error("Drag session was aborted by an earlier error")]
    SessionAborted,
}

/// Result type for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors from candidate-generation helpers operating on JSON drafts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProduceError {
    #[error("No array at `{0}`")]
    MissingArray(FieldPath),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {value}")]
    Invalid { field: &'static str, value: f64 },
}
