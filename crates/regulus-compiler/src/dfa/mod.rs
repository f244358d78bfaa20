//! NFA to DFA subset construction.
//!
//! - `transition_set` - NFA transition sets identifying DFA states
//! - `canonicalizer` - disjoint partitioning of a state's outgoing matchers
//! - `state` - per-state descriptors and the state registry
//! - `generator` - entry states, the expansion worklist and resource bounds
//! - `prune` - final-state pruning for trace-finder automata
//! - `capture` - capture-group transition programs
//! - `finalize` - conversion into immutable state nodes

mod canonicalizer;
mod capture;
mod finalize;
mod generator;
mod prune;
mod state;
mod transition_set;

#[cfg(test)]
mod capture_tests;

pub use generator::DfaGenerator;
