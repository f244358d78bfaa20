//! Structural verification of finished automata.

use std::collections::HashSet;

use crate::dfa::Dfa;
use crate::state::StateKind;
use crate::{CaptureTransitionId, DfaStateId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("state at index {index} carries id {id}")]
    IdMismatch { index: usize, id: DfaStateId },

    #[error("entry refers to unknown state {entry}")]
    DanglingEntry { entry: DfaStateId },

    #[error("state {state} has {successors} successors but {matchers} matchers")]
    PartitionCountMismatch {
        state: DfaStateId,
        successors: usize,
        matchers: usize,
    },

    #[error("state {state} leads to unknown state {successor}")]
    DanglingSuccessor {
        state: DfaStateId,
        successor: DfaStateId,
    },

    #[error("state {state} links to unknown prefix state {prefix}")]
    DanglingPrefix { state: DfaStateId, prefix: DfaStateId },

    #[error("state {state} has a catch-all matcher before its last partition")]
    MisplacedAny { state: DfaStateId },

    #[error("state {state} has overlapping partitions")]
    OverlappingPartitions { state: DfaStateId },

    #[error("state {state} has unsorted partitions")]
    UnsortedPartitions { state: DfaStateId },

    #[error("state {state} is not reachable from any entry")]
    Unreachable { state: DfaStateId },

    #[error("state {state} does not carry capture transitions")]
    MissingCaptureTransitions { state: DfaStateId },

    #[error("state {state} has no preceding capture transitions")]
    MissingPrecedingTransitions { state: DfaStateId },

    #[error("state {state} refers to unknown capture transition {transition}")]
    DanglingCaptureTransition {
        state: DfaStateId,
        transition: CaptureTransitionId,
    },

    #[error("capture transition at index {index} carries id {id}")]
    CaptureIdMismatch {
        index: usize,
        id: CaptureTransitionId,
    },

    #[error("initial capture transitions do not match the entry tables")]
    InitialCaptureMismatch,
}

pub(crate) fn verify(dfa: &Dfa) -> Result<(), VerifyError> {
    let len = dfa.states.len();
    let in_range = |id: DfaStateId| usize::from(id) < len;

    for entry in dfa
        .anchored_entries
        .iter()
        .chain(dfa.unanchored_entries.iter().flatten())
    {
        if !in_range(*entry) {
            return Err(VerifyError::DanglingEntry { entry: *entry });
        }
    }

    for (index, state) in dfa.states.iter().enumerate() {
        if usize::from(state.id) != index {
            return Err(VerifyError::IdMismatch {
                index,
                id: state.id,
            });
        }
        let id = state.id;

        if state.successors.len() != state.matchers.len() {
            return Err(VerifyError::PartitionCountMismatch {
                state: id,
                successors: state.successors.len(),
                matchers: state.matchers.len(),
            });
        }
        if let Some(&successor) = state.successors.iter().find(|&&s| !in_range(s)) {
            return Err(VerifyError::DanglingSuccessor {
                state: id,
                successor,
            });
        }
        if let Some(prefix) = state.prefix_state()
            && !in_range(prefix)
        {
            return Err(VerifyError::DanglingPrefix { state: id, prefix });
        }

        verify_partitions(dfa, id)?;
    }

    if let Some(table) = &dfa.captures {
        for (index, transition) in table.transitions.iter().enumerate() {
            if usize::from(transition.id) != index {
                return Err(VerifyError::CaptureIdMismatch {
                    index,
                    id: transition.id,
                });
            }
        }

        for state in &dfa.states {
            let StateKind::CaptureTracking {
                transitions,
                preceding_transitions,
            } = &state.kind
            else {
                return Err(VerifyError::MissingCaptureTransitions { state: state.id });
            };
            if transitions.len() != state.successors.len() {
                return Err(VerifyError::MissingCaptureTransitions { state: state.id });
            }
            if preceding_transitions.is_empty() {
                return Err(VerifyError::MissingPrecedingTransitions { state: state.id });
            }
            if let Some(&transition) = transitions
                .iter()
                .chain(preceding_transitions)
                .find(|&&t| table.get(t).is_none())
            {
                return Err(VerifyError::DanglingCaptureTransition {
                    state: state.id,
                    transition,
                });
            }
        }

        let initial_ok = table.anchored_initial.len() == dfa.anchored_entries.len()
            && table.unanchored_initial.len() == dfa.unanchored_entries.len()
            && table
                .unanchored_initial
                .iter()
                .zip(&dfa.unanchored_entries)
                .all(|(t, e)| t.is_some() == e.is_some())
            && table
                .anchored_initial
                .iter()
                .chain(table.unanchored_initial.iter().flatten())
                .all(|&t| table.get(t).is_some());
        if !initial_ok {
            return Err(VerifyError::InitialCaptureMismatch);
        }
    }

    let reachable = compute_reachable(dfa);
    if let Some(state) = dfa.states.iter().find(|s| !reachable.contains(&s.id)) {
        return Err(VerifyError::Unreachable { state: state.id });
    }

    Ok(())
}

fn verify_partitions(dfa: &Dfa, id: DfaStateId) -> Result<(), VerifyError> {
    let state = &dfa.states[usize::from(id)];
    let last = state.matchers.len().saturating_sub(1);
    if state
        .matchers
        .iter()
        .enumerate()
        .any(|(i, m)| m.is_any() && i != last)
    {
        return Err(VerifyError::MisplacedAny { state: id });
    }

    let sets: Vec<_> = state
        .matchers
        .iter()
        .filter(|m| !m.is_any())
        .map(|m| m.to_set())
        .collect();
    for (i, a) in sets.iter().enumerate() {
        if sets[i + 1..].iter().any(|b| a.intersects(b)) {
            return Err(VerifyError::OverlappingPartitions { state: id });
        }
    }
    if sets.windows(2).any(|w| w[0] >= w[1]) {
        return Err(VerifyError::UnsortedPartitions { state: id });
    }
    Ok(())
}

/// States reachable from the entries through successors and prefix links.
fn compute_reachable(dfa: &Dfa) -> HashSet<DfaStateId> {
    let mut reachable = HashSet::new();
    let mut queue: Vec<DfaStateId> = dfa.anchored_entries.clone();
    queue.extend(dfa.unanchored_entries.iter().flatten().copied());

    while let Some(id) = queue.pop() {
        if !reachable.insert(id) {
            continue;
        }
        let state = &dfa.states[usize::from(id)];
        queue.extend(state.successors.iter().copied());
        queue.extend(state.prefix_state());
    }

    reachable
}
