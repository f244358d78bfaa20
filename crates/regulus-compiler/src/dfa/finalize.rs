//! Conversion of generator descriptors into immutable state nodes.

use regulus_automaton::{Dfa, DfaStateNode, Matcher, StateKind};
use regulus_core::CharSet;

use super::generator::{DfaGenerator, Entries};
use super::state::StateDescriptor;
use super::transition_set::TransitionSet;
use crate::error::DfaError;

impl DfaGenerator<'_> {
    pub(super) fn finish(mut self, entries: Entries) -> Result<Dfa, DfaError> {
        let mut states = Vec::with_capacity(self.registry.len());
        for index in 0..self.registry.len() {
            let kind = self.state_kind(index)?;
            let (set, descriptor) = self.entry(index);
            let id = descriptor.id;
            let successors = descriptor.successors.clone();
            let matchers = self.matchers(descriptor);
            states.push(DfaStateNode {
                id,
                is_final: set.contains_final() || descriptor.override_final,
                is_anchored_final: set.contains_anchored_final(),
                loop_to_self: successors.contains(&id),
                find_single_char: find_single_char(id, &matchers, &successors),
                matchers,
                successors,
                kind,
            });
        }

        let captures = if self.track_capture_groups {
            let nfa = self.nfa;
            let mut anchored_initial = Vec::with_capacity(entries.anchored_initial.len());
            for &builder in &entries.anchored_initial {
                anchored_initial.push(self.captures.materialize(builder, nfa, &self.registry)?);
            }
            let mut unanchored_initial = Vec::with_capacity(entries.unanchored_initial.len());
            for builder in &entries.unanchored_initial {
                unanchored_initial.push(match *builder {
                    Some(b) => Some(self.captures.materialize(b, nfa, &self.registry)?),
                    None => None,
                });
            }
            Some(self.captures.into_table(anchored_initial, unanchored_initial))
        } else {
            None
        };

        Ok(Dfa {
            direction: self.mode.direction(),
            states,
            anchored_entries: entries.anchored,
            unanchored_entries: entries.unanchored,
            captures,
            num_capture_groups: self.nfa.num_capture_groups(),
            max_nfa_states_per_dfa_state: self.max_fan_in,
        })
    }

    fn entry(&self, index: usize) -> (&TransitionSet, &StateDescriptor) {
        self.registry
            .get_index(index)
            .unwrap_or_else(|| unreachable!("state {index} is registered"))
    }

    /// Partition labels; the last one covers whatever is left when the
    /// partitions are exhaustive or the state may stop scanning anyway.
    fn matchers(&self, descriptor: &StateDescriptor) -> Vec<Matcher> {
        let mut acc = CharSet::empty();
        let last = descriptor.matchers.len().saturating_sub(1);
        descriptor
            .matchers
            .iter()
            .enumerate()
            .map(|(i, chars)| {
                acc = acc.union(chars);
                let catch_all = acc.matches_everything()
                    || (self.prune && !descriptor.final_state_successor);
                if i == last && catch_all {
                    Matcher::Any
                } else {
                    Matcher::from_set(chars.clone())
                }
            })
            .collect()
    }

    /// Variant payload; materializes capture programs in state order,
    /// preceding transitions first.
    fn state_kind(&mut self, index: usize) -> Result<StateKind, DfaError> {
        let descriptor = &self.registry[index];

        if self.track_capture_groups {
            let nfa = self.nfa;
            let mut preceding_transitions = Vec::with_capacity(descriptor.preceding.len());
            for &builder in &descriptor.preceding {
                preceding_transitions.push(self.captures.materialize(builder, nfa, &self.registry)?);
            }
            let mut transitions = Vec::with_capacity(descriptor.capture_edges.len());
            for &builder in &descriptor.capture_edges {
                transitions.push(self.captures.materialize(builder, nfa, &self.registry)?);
            }
            return Ok(StateKind::CaptureTracking {
                transitions,
                preceding_transitions,
            });
        }

        Ok(if self.nfa.is_trace_finder() {
            StateKind::TraceFinder {
                prefix_state: descriptor.prefix_state,
                unanchored_result: descriptor.unanchored_result,
                anchored_result: descriptor.anchored_result,
            }
        } else if self.forward {
            StateKind::Forward
        } else {
            StateKind::Backward {
                prefix_state: descriptor.prefix_state,
            }
        })
    }
}

/// "One character, otherwise stay here": the executor can scan ahead for
/// the character.
fn find_single_char(id: u16, matchers: &[Matcher], successors: &[u16]) -> Option<u32> {
    match (matchers, successors) {
        ([Matcher::Single(c), Matcher::Any], [_, rest]) if *rest == id => Some(*c),
        _ => None,
    }
}
