//! Finalized DFA state nodes.

use serde::Serialize;

use crate::matcher::Matcher;
use crate::{CaptureTransitionId, DfaStateId};

/// Variant-specific payload of a state node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum StateKind {
    /// Plain forward matching.
    Forward,
    /// Backward matching; `prefix_state` is where scanning resumes when the
    /// literal part alone does not determine the match start.
    Backward { prefix_state: Option<DfaStateId> },
    /// Backward start finding with precalculated results.
    TraceFinder {
        prefix_state: Option<DfaStateId>,
        /// Result reported when this state is reached (pruned states carry
        /// the shared result of everything beyond them).
        unanchored_result: Option<u8>,
        anchored_result: Option<u8>,
    },
    /// Forward matching that replays capture-group updates.
    CaptureTracking {
        /// Capture transition per outgoing edge, parallel to `successors`.
        transitions: Vec<CaptureTransitionId>,
        /// Capture transitions of every edge entering this state.
        preceding_transitions: Vec<CaptureTransitionId>,
    },
}

/// Immutable DFA state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DfaStateNode {
    pub id: DfaStateId,
    pub is_final: bool,
    pub is_anchored_final: bool,
    /// Some successor is the state itself.
    pub loop_to_self: bool,
    /// Set when the state is "this character, else stay here": the executor
    /// may scan ahead for the character instead of stepping.
    pub find_single_char: Option<u32>,
    /// Successor per partition, parallel to `matchers`.
    pub successors: Vec<DfaStateId>,
    pub matchers: Vec<Matcher>,
    pub kind: StateKind,
}

impl DfaStateNode {
    /// Successor taken on `c`, testing partitions in order.
    pub fn next_state(&self, c: u32) -> Option<DfaStateId> {
        self.matchers
            .iter()
            .position(|m| m.matches(c))
            .map(|i| self.successors[i])
    }

    pub fn prefix_state(&self) -> Option<DfaStateId> {
        match &self.kind {
            StateKind::Backward { prefix_state } | StateKind::TraceFinder { prefix_state, .. } => {
                *prefix_state
            }
            _ => None,
        }
    }

    /// Capture transitions for outgoing edges; empty unless capture tracking.
    pub fn capture_transitions(&self) -> &[CaptureTransitionId] {
        match &self.kind {
            StateKind::CaptureTracking { transitions, .. } => transitions,
            _ => &[],
        }
    }

    pub fn preceding_transitions(&self) -> &[CaptureTransitionId] {
        match &self.kind {
            StateKind::CaptureTracking {
                preceding_transitions,
                ..
            } => preceding_transitions,
            _ => &[],
        }
    }

    pub fn unanchored_result(&self) -> Option<u8> {
        match &self.kind {
            StateKind::TraceFinder {
                unanchored_result, ..
            } => *unanchored_result,
            _ => None,
        }
    }

    pub fn anchored_result(&self) -> Option<u8> {
        match &self.kind {
            StateKind::TraceFinder {
                anchored_result, ..
            } => *anchored_result,
            _ => None,
        }
    }
}
