//! Mutable per-state bookkeeping during generation.

use indexmap::IndexMap;
use regulus_core::CharSet;

use super::transition_set::TransitionSet;

/// Registered states keyed by their transition set.
///
/// The insertion index is the state id.
pub(crate) type Registry = IndexMap<TransitionSet, StateDescriptor>;

#[derive(Debug, Default)]
pub(crate) struct StateDescriptor {
    pub id: u16,
    /// Successor per partition, parallel to `matchers`. Empty until expanded.
    pub successors: Vec<u16>,
    pub matchers: Vec<CharSet>,
    /// Reached from a final state, so it must never be pruned.
    pub final_state_successor: bool,
    /// Pruned: treated as final with `unanchored_result`.
    pub override_final: bool,
    pub unanchored_result: Option<u8>,
    pub anchored_result: Option<u8>,
    pub prefix_state: Option<u16>,
    /// Capture builders per outgoing edge, parallel to `successors`.
    pub capture_edges: Vec<usize>,
    /// Capture builders of every edge entering this state.
    pub preceding: Vec<usize>,
}

impl StateDescriptor {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn set_pruned(&mut self, result: u8) {
        self.override_final = true;
        self.unanchored_result = Some(result);
        self.successors.clear();
        self.matchers.clear();
        self.capture_edges.clear();
    }
}
