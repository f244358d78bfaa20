use std::fmt;

use serde::Serialize;

/// Which kind of automaton was being built when a bound was hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum GenerationMode {
    Forward,
    Backward,
    CaptureTracking,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::CaptureTracking => "capture-tracking",
        })
    }
}

/// Errors that abort DFA generation.
///
/// Callers are expected to fall back to another matching strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DfaError {
    /// A single DFA state would fold in too many NFA transitions.
    #[error("DFA state fan-in {size} exceeds limit {limit}")]
    StateFanInExceeded { size: usize, limit: usize },

    #[error("{mode} DFA explosion: more than {limit} states")]
    AutomatonSizeExceeded { mode: GenerationMode, limit: usize },

    #[error("capture transition ids exhausted (limit {limit})")]
    CaptureTransitionIdExhausted { limit: u16 },
}
