//! Cue playback error types.

use thiserror::Error;

/// Errors that can occur while playing a cue.
#[derive(Debug, Error)]
pub enum CueError {
    /// Writing to the output device failed.
    #[error("failed to write cue to output: {0}")]
    Output(#[from] std::io::Error),

    /// Generic playback failure.
    #[error("cue playback failed: {0}")]
    Playback(String),
}

impl CueError {
    /// Returns true if the output itself is gone (closed pipe, no terminal).
    #[must_use]
    pub fn is_output_error(&self) -> bool {
        matches!(self, Self::Output(_))
    }
}
