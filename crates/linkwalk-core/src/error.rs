use linkwalk_sparql::ParseError;

use crate::transport::TransportError;

/// Errors raised while expanding or driving a traversal.
///
/// None of these are retried inside the core. `PatternNotFound`,
/// `MalformedQuery` and `UnknownPattern` mean an invariant broke and abort
/// the execution; `Transport` is surfaced to whoever drives the loop.
#[derive(Debug, thiserror::Error)]
pub enum TraversalError {
    #[error("path pattern `{signature}` not found in the prior query")]
    PatternNotFound { signature: String },

    #[error("malformed query: {0}")]
    MalformedQuery(#[from] ParseError),

    #[error("path pattern `{signature}` was never registered for this execution")]
    UnknownPattern { signature: String },

    #[error("node `{node}` has no recorded depth under its pattern/context")]
    NotVisited { node: String },

    #[error("no query execution is active")]
    NotStarted,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl TraversalError {
    /// Whether the error must abort the whole execution (as opposed to a
    /// caller misuse such as stepping before starting).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TraversalError::NotStarted)
    }
}
