//! Generation bounds and mode selection.

use regulus_automaton::{Direction, MAX_CAPTURE_TRANSITION_ID};
use regulus_core::Nfa;

use crate::error::GenerationMode;

/// Resource bounds for DFA generation.
///
/// Defaults are sized for patterns compiled from untrusted input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DfaLimits {
    /// Maximum number of DFA states (default: 2,400).
    pub(crate) max_dfa_size: usize,
    /// Maximum NFA transitions folded into one DFA state (default: 255).
    pub(crate) max_nfa_states_per_dfa_state: usize,
    /// Largest capture transition id (default and ceiling: `i16::MAX`).
    pub(crate) max_capture_transition_id: u16,
}

impl Default for DfaLimits {
    fn default() -> Self {
        Self {
            max_dfa_size: 2400,
            max_nfa_states_per_dfa_state: 255,
            max_capture_transition_id: MAX_CAPTURE_TRANSITION_ID,
        }
    }
}

impl DfaLimits {
    /// Create new limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of DFA states.
    pub fn max_dfa_size(mut self, limit: usize) -> Self {
        self.max_dfa_size = limit;
        self
    }

    /// Set the maximum fan-in of a single DFA state.
    pub fn max_nfa_states_per_dfa_state(mut self, limit: usize) -> Self {
        self.max_nfa_states_per_dfa_state = limit;
        self
    }

    /// Set the largest capture transition id. Clamped to `i16::MAX`.
    pub fn max_capture_transition_id(mut self, limit: u16) -> Self {
        self.max_capture_transition_id = limit.min(MAX_CAPTURE_TRANSITION_ID);
        self
    }

    pub fn get_max_dfa_size(&self) -> usize {
        self.max_dfa_size
    }
    pub fn get_max_nfa_states_per_dfa_state(&self) -> usize {
        self.max_nfa_states_per_dfa_state
    }
    pub fn get_max_capture_transition_id(&self) -> u16 {
        self.max_capture_transition_id
    }
}

/// What kind of automaton to generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mode {
    pub(crate) direction: Direction,
    pub(crate) track_capture_groups: bool,
    pub(crate) prune_unambiguous_paths: Option<bool>,
}

impl Mode {
    pub fn forward() -> Self {
        Self {
            direction: Direction::Forward,
            track_capture_groups: false,
            prune_unambiguous_paths: None,
        }
    }

    pub fn backward() -> Self {
        Self {
            direction: Direction::Backward,
            track_capture_groups: false,
            prune_unambiguous_paths: None,
        }
    }

    /// Track capture groups. Only honored for forward automata.
    pub fn track_capture_groups(mut self, track: bool) -> Self {
        self.track_capture_groups = track;
        self
    }

    /// Stop expanding states whose outcome is already determined.
    ///
    /// When unset, backward automata over trace-finder NFAs with an
    /// unanchored reverse entry prune and everything else does not. Never
    /// honored while tracking capture groups.
    pub fn prune_unambiguous_paths(mut self, prune: bool) -> Self {
        self.prune_unambiguous_paths = Some(prune);
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn tracks_capture_groups(&self) -> bool {
        self.direction.is_forward() && self.track_capture_groups
    }

    pub(crate) fn prunes(&self, nfa: &Nfa) -> bool {
        if self.tracks_capture_groups() {
            return false;
        }
        self.prune_unambiguous_paths.unwrap_or_else(|| {
            !self.direction.is_forward()
                && nfa.is_trace_finder()
                && nfa.has_reverse_unanchored_entry()
        })
    }

    pub(crate) fn generation_mode(&self) -> GenerationMode {
        if self.tracks_capture_groups() {
            GenerationMode::CaptureTracking
        } else if self.direction.is_forward() {
            GenerationMode::Forward
        } else {
            GenerationMode::Backward
        }
    }
}
