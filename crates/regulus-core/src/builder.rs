//! Incremental NFA construction with validation.

use crate::charset::CharSet;
use crate::nfa::{
    GroupBoundaries, Nfa, NfaState, NfaStateKind, NfaTransition, PreCalculatedResult, StateId,
    TransitionId,
};

/// Errors reported by [`NfaBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NfaError {
    #[error("transition {transition} references unknown state {state}")]
    UnknownState {
        transition: TransitionId,
        state: StateId,
    },

    #[error("transition {transition} leaves final state {state}")]
    TransitionFromFinal {
        transition: TransitionId,
        state: StateId,
    },

    #[error("transition {transition} enters initial state {state}")]
    TransitionIntoInitial {
        transition: TransitionId,
        state: StateId,
    },

    #[error("state {state} refers to result {index}, but only {count} results exist")]
    UnknownResult { state: StateId, index: u8, count: usize },

    #[error("transition {transition} touches capture index {index}, but only {groups} groups exist")]
    GroupIndexOutOfRange {
        transition: TransitionId,
        index: u16,
        groups: usize,
    },
}

struct PendingState {
    kind: NfaStateKind,
    possible_results: Vec<u8>,
    has_prefix_states: bool,
}

struct PendingTransition {
    source: StateId,
    target: StateId,
    group_boundaries: GroupBoundaries,
}

/// Builder for [`Nfa`].
///
/// A new builder already holds entry point 0 (an anchored and an unanchored
/// initial state) and the two final states. Transition priority follows
/// creation order.
pub struct NfaBuilder {
    states: Vec<PendingState>,
    transitions: Vec<PendingTransition>,
    anchored_entries: Vec<StateId>,
    unanchored_entries: Vec<StateId>,
    anchored_final: StateId,
    final_state: StateId,
    pre_calculated_results: Option<Vec<PreCalculatedResult>>,
    num_capture_groups: usize,
    sticky: bool,
}

impl Default for NfaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NfaBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            states: Vec::new(),
            transitions: Vec::new(),
            anchored_entries: Vec::new(),
            unanchored_entries: Vec::new(),
            anchored_final: StateId(0),
            final_state: StateId(0),
            pre_calculated_results: None,
            num_capture_groups: 0,
            sticky: false,
        };
        builder.anchored_final = builder.add_state(NfaStateKind::AnchoredFinal);
        builder.final_state = builder.add_state(NfaStateKind::Final);
        builder.add_entry_point();
        builder
    }

    fn add_state(&mut self, kind: NfaStateKind) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(PendingState {
            kind,
            possible_results: Vec::new(),
            has_prefix_states: false,
        });
        id
    }

    /// Add an entry point and return its index.
    pub fn add_entry_point(&mut self) -> usize {
        let anchored = self.add_state(NfaStateKind::AnchoredInitial);
        let unanchored = self.add_state(NfaStateKind::Initial);
        self.anchored_entries.push(anchored);
        self.unanchored_entries.push(unanchored);
        self.anchored_entries.len() - 1
    }

    pub fn anchored_initial(&self, entry_point: usize) -> StateId {
        self.anchored_entries[entry_point]
    }

    pub fn initial(&self, entry_point: usize) -> StateId {
        self.unanchored_entries[entry_point]
    }

    pub fn anchored_final(&self) -> StateId {
        self.anchored_final
    }

    pub fn final_state(&self) -> StateId {
        self.final_state
    }

    pub fn matcher(&mut self, set: CharSet) -> StateId {
        self.add_state(NfaStateKind::Matcher(set))
    }

    pub fn connect(&mut self, source: StateId, target: StateId) -> TransitionId {
        self.connect_with(source, target, GroupBoundaries::default())
    }

    pub fn connect_with(
        &mut self,
        source: StateId,
        target: StateId,
        group_boundaries: GroupBoundaries,
    ) -> TransitionId {
        let id = TransitionId(self.transitions.len() as u32);
        self.transitions.push(PendingTransition {
            source,
            target,
            group_boundaries,
        });
        id
    }

    /// Record which precalculated results are still possible from `state`.
    pub fn possible_results(&mut self, state: StateId, results: &[u8]) -> &mut Self {
        if let Some(s) = self.states.get_mut(state.index()) {
            s.possible_results = results.to_vec();
        }
        self
    }

    /// Mark `state` as part of an implicit or lazy prefix.
    pub fn prefix_state(&mut self, state: StateId) -> &mut Self {
        if let Some(s) = self.states.get_mut(state.index()) {
            s.has_prefix_states = true;
        }
        self
    }

    /// Attach precalculated results, turning this into a trace-finder NFA.
    pub fn pre_calculated_results(&mut self, results: Vec<PreCalculatedResult>) -> &mut Self {
        self.pre_calculated_results = Some(results);
        self
    }

    pub fn capture_groups(&mut self, count: usize) -> &mut Self {
        self.num_capture_groups = count;
        self
    }

    pub fn sticky(&mut self, sticky: bool) -> &mut Self {
        self.sticky = sticky;
        self
    }

    /// Validate the graph and derive `next`/`prev` lists.
    pub fn build(self) -> Result<Nfa, NfaError> {
        let result_count = self.pre_calculated_results.as_ref().map_or(0, Vec::len);
        let capture_slots = self.num_capture_groups * 2;

        let mut states: Vec<NfaState> = self
            .states
            .into_iter()
            .enumerate()
            .map(|(i, s)| NfaState {
                id: StateId(i as u32),
                kind: s.kind,
                next: Vec::new(),
                prev: Vec::new(),
                possible_results: s.possible_results,
                has_prefix_states: s.has_prefix_states,
            })
            .collect();

        for state in &states {
            if let Some(&index) = state
                .possible_results
                .iter()
                .find(|&&r| usize::from(r) >= result_count)
            {
                return Err(NfaError::UnknownResult {
                    state: state.id,
                    index,
                    count: result_count,
                });
            }
        }

        let mut transitions = Vec::with_capacity(self.transitions.len() + 1);
        for (i, t) in self.transitions.into_iter().enumerate() {
            let id = TransitionId(i as u32);
            for state in [t.source, t.target] {
                if state.index() >= states.len() {
                    return Err(NfaError::UnknownState {
                        transition: id,
                        state,
                    });
                }
            }
            if matches!(
                states[t.source.index()].kind,
                NfaStateKind::Final | NfaStateKind::AnchoredFinal
            ) {
                return Err(NfaError::TransitionFromFinal {
                    transition: id,
                    state: t.source,
                });
            }
            if matches!(
                states[t.target.index()].kind,
                NfaStateKind::Initial | NfaStateKind::AnchoredInitial
            ) {
                return Err(NfaError::TransitionIntoInitial {
                    transition: id,
                    state: t.target,
                });
            }
            if let Some(&index) = t
                .group_boundaries
                .updates()
                .iter()
                .chain(t.group_boundaries.clears())
                .find(|&&idx| usize::from(idx) >= capture_slots)
            {
                return Err(NfaError::GroupIndexOutOfRange {
                    transition: id,
                    index,
                    groups: self.num_capture_groups,
                });
            }

            states[t.source.index()].next.push(id);
            states[t.target.index()].prev.push(id);
            transitions.push(NfaTransition {
                id,
                source: t.source,
                target: t.target,
                group_boundaries: t.group_boundaries,
            });
        }

        let loop_back = if self.sticky {
            None
        } else {
            add_loop_back(&mut states, &mut transitions, self.unanchored_entries[0])
        };

        Ok(Nfa {
            states,
            transitions,
            anchored_entries: self.anchored_entries,
            unanchored_entries: self.unanchored_entries,
            anchored_final: self.anchored_final,
            final_state: self.final_state,
            loop_back,
            trace_finder: self.pre_calculated_results.is_some(),
            pre_calculated_results: self.pre_calculated_results.unwrap_or_default(),
            num_capture_groups: self.num_capture_groups,
            sticky: self.sticky,
        })
    }
}

/// Append the any-character matcher that restarts an unanchored search.
fn add_loop_back(
    states: &mut Vec<NfaState>,
    transitions: &mut Vec<NfaTransition>,
    unanchored_entry: StateId,
) -> Option<StateId> {
    let entry_next = states[unanchored_entry.index()].next.clone();
    if entry_next.is_empty() {
        return None;
    }

    let id = StateId(states.len() as u32);
    let self_transition = TransitionId(transitions.len() as u32);
    transitions.push(NfaTransition {
        id: self_transition,
        source: id,
        target: id,
        group_boundaries: GroupBoundaries::default(),
    });

    let mut next = entry_next;
    next.push(self_transition);
    states.push(NfaState {
        id,
        kind: NfaStateKind::Matcher(CharSet::full()),
        next,
        prev: vec![self_transition],
        possible_results: Vec::new(),
        has_prefix_states: false,
    });
    Some(id)
}
