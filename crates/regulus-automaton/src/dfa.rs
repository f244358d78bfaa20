//! The finalized automaton.

use serde::Serialize;

use crate::DfaStateId;
use crate::capture::CaptureTransitionTable;
use crate::state::DfaStateNode;
use crate::verify::{self, VerifyError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn is_forward(self) -> bool {
        self == Self::Forward
    }
}

/// A compiled DFA.
///
/// State ids are dense indices into [`states`](Self::states). Entry tables
/// are index-aligned with the NFA's entry points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dfa {
    pub direction: Direction,
    pub states: Vec<DfaStateNode>,
    pub anchored_entries: Vec<DfaStateId>,
    /// `None` where an entry point cannot start an unanchored match.
    pub unanchored_entries: Vec<Option<DfaStateId>>,
    /// Present iff the automaton tracks capture groups.
    pub captures: Option<CaptureTransitionTable>,
    pub num_capture_groups: usize,
    /// Largest number of NFA transitions folded into one state.
    pub max_nfa_states_per_dfa_state: usize,
}

impl Dfa {
    pub fn states(&self) -> &[DfaStateNode] {
        &self.states
    }

    pub fn state(&self, id: DfaStateId) -> Option<&DfaStateNode> {
        self.states.get(usize::from(id))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn tracks_capture_groups(&self) -> bool {
        self.captures.is_some()
    }

    /// Check structural invariants: ids in range, partitions well formed,
    /// capture tables consistent.
    pub fn verify(&self) -> Result<(), VerifyError> {
        verify::verify(self)
    }
}
