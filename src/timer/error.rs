//! Timer error types.

use thiserror::Error;

/// A segment sequence the engine refused to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("cannot load an empty segment sequence")]
    EmptySequence,

    #[error("segment {index} is invalid: {reason}")]
    InvalidSegment { index: usize, reason: &'static str },
}

/// Errors returned by a runner handle.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The runner task has stopped.
    #[error("timer runner is no longer running")]
    Closed,

    #[error(transparent)]
    Load(#[from] LoadError),
}
