#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for Regulus.
//!
//! - [`CharSet`]: the character-class algebra transitions are labeled with
//! - [`Nfa`]: the immutable automaton handed to the DFA compiler
//! - [`NfaBuilder`]: validated construction of an [`Nfa`]

mod builder;
mod charset;
mod nfa;

#[cfg(test)]
mod charset_tests;

pub use builder::{NfaBuilder, NfaError};
pub use charset::{CharRange, CharSet, MAX_CODE_POINT};
pub use nfa::{
    GroupBoundaries, Nfa, NfaState, NfaStateKind, NfaTransition, PreCalculatedResult, StateId,
    TransitionId,
};
