//! NFA input model consumed by the DFA compiler.
//!
//! The NFA is an arena of states and transitions addressed by compact ids.
//! Transitions are shared between the `next` list of their source and the
//! `prev` list of their target, so the same graph can be walked forward (for
//! the matching automaton) and backward (for the start-finding automaton).
//!
//! Construction goes through [`NfaBuilder`](crate::NfaBuilder), which
//! validates the graph and derives the lists.

use std::fmt;

use serde::Serialize;

use crate::charset::CharSet;

/// Index of a state in [`Nfa::states`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StateId(pub u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Index of a transition in [`Nfa::transitions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TransitionId(pub u32);

impl TransitionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// What an NFA state does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NfaStateKind {
    /// Consumes one character from the set.
    Matcher(CharSet),
    /// Unanchored start of an entry point.
    Initial,
    /// Anchored start of an entry point.
    AnchoredInitial,
    /// Accepting state.
    Final,
    /// Accepting state reachable only at the end of input.
    AnchoredFinal,
}

#[derive(Clone, Debug)]
pub struct NfaState {
    pub(crate) id: StateId,
    pub(crate) kind: NfaStateKind,
    pub(crate) next: Vec<TransitionId>,
    pub(crate) prev: Vec<TransitionId>,
    pub(crate) possible_results: Vec<u8>,
    pub(crate) has_prefix_states: bool,
}

impl NfaState {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn kind(&self) -> &NfaStateKind {
        &self.kind
    }

    pub fn matcher(&self) -> Option<&CharSet> {
        match &self.kind {
            NfaStateKind::Matcher(set) => Some(set),
            _ => None,
        }
    }

    /// Outgoing transitions, in priority order.
    pub fn next(&self) -> &[TransitionId] {
        &self.next
    }

    /// Incoming transitions, in priority order.
    pub fn prev(&self) -> &[TransitionId] {
        &self.prev
    }

    /// Transitions followed after this state consumed a character.
    pub fn successors(&self, forward: bool) -> &[TransitionId] {
        if forward { &self.next } else { &self.prev }
    }

    /// Indices into [`Nfa::pre_calculated_results`] still possible from here.
    pub fn possible_results(&self) -> &[u8] {
        &self.possible_results
    }

    pub fn has_possible_results(&self) -> bool {
        !self.possible_results.is_empty()
    }

    /// Whether the state belongs to an implicit or lazy prefix construct.
    pub fn has_prefix_states(&self) -> bool {
        self.has_prefix_states
    }

    /// Whether reaching this state completes a match when walking in the
    /// given direction. Backward walks end at the initial states.
    pub fn is_final(&self, forward: bool) -> bool {
        if forward {
            self.kind == NfaStateKind::Final
        } else {
            self.kind == NfaStateKind::Initial
        }
    }

    pub fn is_anchored_final(&self, forward: bool) -> bool {
        if forward {
            self.kind == NfaStateKind::AnchoredFinal
        } else {
            self.kind == NfaStateKind::AnchoredInitial
        }
    }
}

/// Capture-array indices touched when a transition is taken.
///
/// Index `2 * g` is the start of group `g`, `2 * g + 1` its end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct GroupBoundaries {
    updates: Vec<u16>,
    clears: Vec<u16>,
}

impl GroupBoundaries {
    pub fn new(updates: impl IntoIterator<Item = u16>, clears: impl IntoIterator<Item = u16>) -> Self {
        let mut updates: Vec<u16> = updates.into_iter().collect();
        let mut clears: Vec<u16> = clears.into_iter().collect();
        updates.sort_unstable();
        updates.dedup();
        clears.sort_unstable();
        clears.dedup();
        Self { updates, clears }
    }

    /// Indices set to the current position.
    pub fn updates(&self) -> &[u16] {
        &self.updates
    }

    /// Indices reset to "unset".
    pub fn clears(&self) -> &[u16] {
        &self.clears
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.clears.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct NfaTransition {
    pub(crate) id: TransitionId,
    pub(crate) source: StateId,
    pub(crate) target: StateId,
    pub(crate) group_boundaries: GroupBoundaries,
}

impl NfaTransition {
    pub fn id(&self) -> TransitionId {
        self.id
    }

    pub fn source(&self) -> StateId {
        self.source
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    /// The state this transition leads to when walked in the given direction.
    pub fn target_in(&self, forward: bool) -> StateId {
        if forward { self.target } else { self.source }
    }

    pub fn group_boundaries(&self) -> &GroupBoundaries {
        &self.group_boundaries
    }
}

/// Capture positions known in advance for one way a match can end.
///
/// Offsets are relative to the end of the match; `None` marks an unset group
/// boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PreCalculatedResult {
    pub offsets: Vec<Option<u32>>,
}

impl PreCalculatedResult {
    pub fn new(offsets: impl IntoIterator<Item = Option<u32>>) -> Self {
        Self {
            offsets: offsets.into_iter().collect(),
        }
    }
}

/// Immutable, validated NFA.
#[derive(Clone, Debug)]
pub struct Nfa {
    pub(crate) states: Vec<NfaState>,
    pub(crate) transitions: Vec<NfaTransition>,
    pub(crate) anchored_entries: Vec<StateId>,
    pub(crate) unanchored_entries: Vec<StateId>,
    pub(crate) anchored_final: StateId,
    pub(crate) final_state: StateId,
    pub(crate) loop_back: Option<StateId>,
    pub(crate) pre_calculated_results: Vec<PreCalculatedResult>,
    pub(crate) trace_finder: bool,
    pub(crate) num_capture_groups: usize,
    pub(crate) sticky: bool,
}

impl Nfa {
    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    pub fn transitions(&self) -> &[NfaTransition] {
        &self.transitions
    }

    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id.index()]
    }

    pub fn transition(&self, id: TransitionId) -> &NfaTransition {
        &self.transitions[id.index()]
    }

    /// The state a transition leads to in the given direction.
    pub fn target(&self, id: TransitionId, forward: bool) -> &NfaState {
        self.state(self.transition(id).target_in(forward))
    }

    /// Anchored initial states, one per entry point.
    pub fn anchored_entries(&self) -> &[StateId] {
        &self.anchored_entries
    }

    /// Unanchored initial states, index-aligned with
    /// [`anchored_entries`](Self::anchored_entries).
    pub fn unanchored_entries(&self) -> &[StateId] {
        &self.unanchored_entries
    }

    pub fn entry_point_count(&self) -> usize {
        self.anchored_entries.len()
    }

    /// Start of a backward walk for matches that must end at end of input.
    pub fn reverse_anchored_entry(&self) -> StateId {
        self.anchored_final
    }

    /// Start of a backward walk for matches ending anywhere; absent when no
    /// transition enters the final state.
    pub fn reverse_unanchored_entry(&self) -> Option<StateId> {
        let state = self.state(self.final_state);
        (!state.prev.is_empty()).then_some(self.final_state)
    }

    pub fn has_reverse_unanchored_entry(&self) -> bool {
        self.reverse_unanchored_entry().is_some()
    }

    /// Matcher that accepts any character and loops back to the unanchored
    /// start of entry point 0.
    ///
    /// Its `next` list starts with entry point 0's unanchored transitions
    /// (the same transition ids) and ends with its self transition, so a
    /// DFA state built from them maps back onto the unanchored entry state.
    /// Absent for sticky NFAs and when entry point 0 has no unanchored start.
    pub fn loop_back_matcher(&self) -> Option<&NfaState> {
        self.loop_back.map(|id| self.state(id))
    }

    pub fn pre_calculated_results(&self) -> &[PreCalculatedResult] {
        &self.pre_calculated_results
    }

    /// Whether this NFA carries precalculated results for start finding.
    pub fn is_trace_finder(&self) -> bool {
        self.trace_finder
    }

    pub fn num_capture_groups(&self) -> usize {
        self.num_capture_groups
    }

    /// Sticky patterns may only match at the search start.
    pub fn is_sticky(&self) -> bool {
        self.sticky
    }
}
