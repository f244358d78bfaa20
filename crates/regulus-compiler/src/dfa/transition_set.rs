//! Sets of NFA transitions identifying DFA states.
//!
//! A DFA state is the set of NFA transitions that are "live" after reading
//! some input. The set keeps its transitions in priority order (earlier
//! wins under leftmost-first semantics) but compares and hashes as a set,
//! so two paths reaching the same transitions share one DFA state.

use std::hash::{Hash, Hasher};

use regulus_core::{Nfa, StateId, TransitionId};

#[derive(Clone, Debug)]
pub(crate) struct TransitionSet {
    forward: bool,
    /// Priority order.
    transitions: Vec<TransitionId>,
    /// Same members, ascending; the identity of the set.
    sorted: Vec<TransitionId>,
    contains_final: bool,
    contains_anchored_final: bool,
    contains_prefix_states: bool,
    /// Forward only: an unanchored final state was entered, nothing of
    /// lower priority can win anymore.
    closed: bool,
}

impl TransitionSet {
    pub fn new(forward: bool) -> Self {
        Self {
            forward,
            transitions: Vec::new(),
            sorted: Vec::new(),
            contains_final: false,
            contains_anchored_final: false,
            contains_prefix_states: false,
            closed: false,
        }
    }

    pub fn from_transitions(nfa: &Nfa, forward: bool, transitions: &[TransitionId]) -> Self {
        let mut set = Self::new(forward);
        set.add_all(nfa, transitions);
        set
    }

    /// Add `id` unless the set already reaches its target state or is closed.
    pub fn add(&mut self, nfa: &Nfa, id: TransitionId) -> bool {
        if self.closed {
            return false;
        }
        let transition = nfa.transition(id);
        let target = transition.target_in(self.forward);
        if self.index_of_target(nfa, target).is_some() {
            return false;
        }

        self.transitions.push(id);
        let pos = self.sorted.partition_point(|&t| t < id);
        self.sorted.insert(pos, id);

        let state = nfa.state(target);
        if state.is_final(self.forward) {
            self.contains_final = true;
            self.closed = self.forward;
        }
        if state.is_anchored_final(self.forward) {
            self.contains_anchored_final = true;
        }
        if !self.forward && nfa.state(transition.source()).has_prefix_states() {
            self.contains_prefix_states = true;
        }
        true
    }

    pub fn add_all(&mut self, nfa: &Nfa, ids: &[TransitionId]) {
        for &id in ids {
            self.add(nfa, id);
        }
    }

    pub fn transitions(&self) -> &[TransitionId] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn contains_final(&self) -> bool {
        self.contains_final
    }

    pub fn contains_anchored_final(&self) -> bool {
        self.contains_anchored_final
    }

    /// Backward only: some member starts in an implicit or lazy prefix state.
    pub fn contains_prefix_states(&self) -> bool {
        self.contains_prefix_states
    }

    /// Position of the member leading to `state`, if any.
    pub fn index_of_target(&self, nfa: &Nfa, state: StateId) -> Option<usize> {
        self.transitions
            .iter()
            .position(|&t| nfa.transition(t).target_in(self.forward) == state)
    }

    /// Equal as sets and in priority order.
    pub fn same_order(&self, other: &Self) -> bool {
        self.transitions == other.transitions
    }

    /// Precalculated result shared by every member entering an unanchored
    /// (or, with `anchored`, anchored) final state. A member's results are
    /// those of the state it leaves.
    ///
    /// `None` if no member enters such a state or their results disagree.
    pub fn shared_result(&self, nfa: &Nfa, anchored: bool) -> Option<u8> {
        let results = nfa.pre_calculated_results();
        let mut shared: Option<u8> = None;
        for &t in &self.transitions {
            let entered = nfa.target(t, self.forward);
            let enters = if anchored {
                entered.is_anchored_final(self.forward)
            } else {
                entered.is_final(self.forward)
            };
            if !enters {
                continue;
            }
            for &index in nfa.target(t, !self.forward).possible_results() {
                match shared {
                    None => shared = Some(index),
                    Some(first) if results[usize::from(first)] != results[usize::from(index)] => {
                        return None;
                    }
                    Some(_) => {}
                }
            }
        }
        shared
    }
}

impl PartialEq for TransitionSet {
    fn eq(&self, other: &Self) -> bool {
        self.sorted == other.sorted
    }
}

impl Eq for TransitionSet {}

impl Hash for TransitionSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted.hash(state);
    }
}
