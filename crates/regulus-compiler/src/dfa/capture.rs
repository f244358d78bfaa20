//! Capture-group transition synthesis.
//!
//! Every DFA edge (and every entry) gets a builder remembering the source
//! state, the edge's target set in priority order and the target state.
//! Once all states exist, builders are turned into [`CaptureProgram`]s.
//! Structurally identical programs share one id.

use indexmap::IndexMap;
use regulus_automaton::{CaptureGroupTransition, CaptureProgram, CaptureTransitionTable, SlotUpdate};
use regulus_core::{Nfa, NfaState};

use super::state::Registry;
use super::transition_set::TransitionSet;
use crate::DfaError;

pub(crate) struct CaptureTransitionBuilder {
    /// `None` for entry transitions, which start from empty capture arrays.
    source: Option<u16>,
    edge: TransitionSet,
    target: u16,
    id: Option<u16>,
}

pub(crate) struct CaptureTransitions {
    builders: Vec<CaptureTransitionBuilder>,
    programs: IndexMap<CaptureProgram, u16>,
    max_id: u16,
}

impl CaptureTransitions {
    pub fn new(max_id: u16) -> Self {
        Self {
            builders: Vec::new(),
            programs: IndexMap::new(),
            max_id,
        }
    }

    /// Register a builder and return its index.
    pub fn add(&mut self, source: Option<u16>, edge: TransitionSet, target: u16) -> usize {
        self.builders.push(CaptureTransitionBuilder {
            source,
            edge,
            target,
            id: None,
        });
        self.builders.len() - 1
    }

    /// Id of the builder's program, assigning one on first use.
    pub fn materialize(
        &mut self,
        builder: usize,
        nfa: &Nfa,
        registry: &Registry,
    ) -> Result<u16, DfaError> {
        if let Some(id) = self.builders[builder].id {
            return Ok(id);
        }

        let program = build_program(&self.builders[builder], nfa, registry);
        let id = match self.programs.get(&program) {
            Some(&id) => id,
            None => {
                let next = self.programs.len();
                if next > usize::from(self.max_id) {
                    return Err(DfaError::CaptureTransitionIdExhausted { limit: self.max_id });
                }
                let id = next as u16;
                self.programs.insert(program, id);
                id
            }
        };
        self.builders[builder].id = Some(id);
        Ok(id)
    }

    pub fn into_table(
        self,
        anchored_initial: Vec<u16>,
        unanchored_initial: Vec<Option<u16>>,
    ) -> CaptureTransitionTable {
        CaptureTransitionTable {
            transitions: self
                .programs
                .into_iter()
                .map(|(program, id)| CaptureGroupTransition { id, program })
                .collect(),
            anchored_initial,
            unanchored_initial,
        }
    }
}

fn state_set(registry: &Registry, id: u16) -> Option<&TransitionSet> {
    registry.get_index(usize::from(id)).map(|(set, _)| set)
}

fn build_program(builder: &CaptureTransitionBuilder, nfa: &Nfa, registry: &Registry) -> CaptureProgram {
    let source = builder.source.and_then(|id| state_set(registry, id));
    let Some(target) = state_set(registry, builder.target) else {
        return CaptureProgram::default();
    };

    let slots = target
        .transitions()
        .iter()
        .map(|&t| {
            let transition = nfa.transition(t);
            let boundaries = transition.group_boundaries();
            SlotUpdate {
                source: source
                    .and_then(|s| s.index_of_target(nfa, transition.source()))
                    .map(|i| i as u16),
                updates: boundaries.updates().to_vec(),
                clears: boundaries.clears().to_vec(),
            }
        })
        .collect();

    CaptureProgram {
        slots,
        to_final: first_slot(builder, target, nfa, |s| s.is_final(true)),
        to_anchored_final: first_slot(builder, target, nfa, |s| s.is_anchored_final(true)),
    }
}

/// Slot in `target` of the highest-priority edge member entering a state
/// accepted by `enters`.
fn first_slot(
    builder: &CaptureTransitionBuilder,
    target: &TransitionSet,
    nfa: &Nfa,
    enters: impl Fn(&NfaState) -> bool,
) -> Option<u16> {
    let t = builder
        .edge
        .transitions()
        .iter()
        .find(|&&t| enters(nfa.target(t, true)))?;
    target
        .transitions()
        .iter()
        .position(|x| x == t)
        .map(|i| i as u16)
}
