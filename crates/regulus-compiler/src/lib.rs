//! Regulus compiler: NFA to DFA subset construction.
//!
//! - `dfa` - transition sets, canonicalizer, state registry, capture-group
//!   transition synthesis, pruning and finalization
//! - `limits` - resource bounds and generation mode
//! - `error` - compilation failures

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod dfa;
pub mod error;
pub mod limits;

#[cfg(test)]
pub mod test_utils;

pub use dfa::DfaGenerator;
pub use error::{DfaError, GenerationMode};
pub use limits::{DfaLimits, Mode};

/// Result type for DFA generation.
pub type Result<T> = std::result::Result<T, DfaError>;
