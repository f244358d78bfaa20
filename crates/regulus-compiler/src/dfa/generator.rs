//! Subset construction driver.

use log::{debug, trace};
use regulus_automaton::Dfa;
use regulus_core::{CharSet, Nfa};

use super::canonicalizer::{Canonicalizer, Connection};
use super::capture::CaptureTransitions;
use super::state::{Registry, StateDescriptor};
use super::transition_set::TransitionSet;
use crate::error::DfaError;
use crate::limits::{DfaLimits, Mode};

/// Entry states and their initial capture builders.
pub(super) struct Entries {
    pub anchored: Vec<u16>,
    pub unanchored: Vec<Option<u16>>,
    pub anchored_initial: Vec<usize>,
    pub unanchored_initial: Vec<Option<usize>>,
}

/// Builds a [`Dfa`] from an [`Nfa`].
///
/// A generator is single-use: [`generate`](Self::generate) consumes it. All
/// intermediate state is owned by the generator and dropped on failure.
pub struct DfaGenerator<'n> {
    pub(super) nfa: &'n Nfa,
    pub(super) mode: Mode,
    pub(super) limits: DfaLimits,
    pub(super) forward: bool,
    pub(super) track_capture_groups: bool,
    pub(super) prune: bool,
    pub(super) registry: Registry,
    pub(super) queue: Vec<u16>,
    canonicalizer: Canonicalizer,
    pub(super) captures: CaptureTransitions,
    pub(super) max_fan_in: usize,
    pub(super) frontier: Vec<u16>,
    pub(super) next_frontier: Vec<u16>,
}

impl<'n> DfaGenerator<'n> {
    pub fn new(nfa: &'n Nfa, mode: Mode, limits: DfaLimits) -> Self {
        let forward = mode.direction().is_forward();
        let track_capture_groups = mode.tracks_capture_groups();
        Self {
            nfa,
            mode,
            limits,
            forward,
            track_capture_groups,
            prune: mode.prunes(nfa),
            registry: Registry::default(),
            queue: Vec::new(),
            canonicalizer: Canonicalizer::new(forward, track_capture_groups),
            captures: CaptureTransitions::new(limits.max_capture_transition_id),
            max_fan_in: 0,
            frontier: Vec::new(),
            next_frontier: Vec::new(),
        }
    }

    /// Build the matching automaton for all entry points.
    pub fn forward(nfa: &'n Nfa, track_capture_groups: bool, limits: DfaLimits) -> Result<Dfa, DfaError> {
        let mode = Mode::forward().track_capture_groups(track_capture_groups);
        Self::new(nfa, mode, limits).generate()
    }

    /// Build the automaton that scans backward from a match end.
    pub fn backward(nfa: &'n Nfa, limits: DfaLimits) -> Result<Dfa, DfaError> {
        Self::new(nfa, Mode::backward(), limits).generate()
    }

    pub fn generate(mut self) -> Result<Dfa, DfaError> {
        let mode = self.mode.generation_mode();
        debug!(
            "generating {mode} DFA (prune: {}, entry points: {})",
            self.prune,
            self.nfa.entry_point_count()
        );

        match self.build().and_then(|entries| self.finish(entries)) {
            Ok(dfa) => {
                debug!(
                    "generated {mode} DFA: {} states, {} capture transitions, max fan-in {}",
                    dfa.len(),
                    dfa.captures.as_ref().map_or(0, |t| t.len()),
                    dfa.max_nfa_states_per_dfa_state
                );
                Ok(dfa)
            }
            Err(err) => {
                debug!("{mode} DFA generation aborted: {err}");
                Err(err)
            }
        }
    }

    /// Like [`generate`](Self::generate), also returning every state's
    /// transition set by id.
    #[cfg(test)]
    pub(super) fn generate_with_sets(mut self) -> Result<(Dfa, Vec<TransitionSet>), DfaError> {
        let entries = self.build()?;
        let sets = self.registry.keys().cloned().collect();
        Ok((self.finish(entries)?, sets))
    }

    fn build(&mut self) -> Result<Entries, DfaError> {
        let entries = if self.forward {
            self.create_forward_entries()?
        } else {
            self.create_backward_entries()?
        };
        while let Some(id) = self.queue.pop() {
            self.expand(id)?;
        }
        Ok(entries)
    }

    fn create_forward_entries(&mut self) -> Result<Entries, DfaError> {
        let nfa = self.nfa;
        let count = nfa.entry_point_count();
        let mut entries = Entries {
            anchored: Vec::with_capacity(count),
            unanchored: Vec::with_capacity(count),
            anchored_initial: Vec::with_capacity(count),
            unanchored_initial: Vec::with_capacity(count),
        };
        let add_loop_back = !self.track_capture_groups && !nfa.is_sticky();

        for i in 0..count {
            let anchored_start = nfa.state(nfa.anchored_entries()[i]);
            let unanchored_start = nfa.state(nfa.unanchored_entries()[i]);
            let mut anchored = TransitionSet::from_transitions(nfa, true, anchored_start.next());

            if unanchored_start.next().is_empty() {
                entries.unanchored.push(None);
                entries.unanchored_initial.push(None);
            } else {
                let mut unanchored = TransitionSet::from_transitions(nfa, true, unanchored_start.next());
                if add_loop_back && let Some(loop_back) = nfa.loop_back_matcher() {
                    if i == 0 {
                        unanchored.add_all(nfa, loop_back.next());
                    } else if let Some(&restart) = loop_back.next().last() {
                        unanchored.add(nfa, restart);
                    }
                }
                anchored.add_all(nfa, unanchored.transitions());

                let id = self.lookup_or_create(unanchored.clone())?;
                let builder = if self.track_capture_groups {
                    Some(self.add_initial_capture(unanchored, id))
                } else {
                    None
                };
                entries.unanchored.push(Some(id));
                entries.unanchored_initial.push(builder);
            }

            let id = self.lookup_or_create(anchored.clone())?;
            entries.anchored.push(id);
            if self.track_capture_groups {
                let builder = self.add_initial_capture(anchored, id);
                entries.anchored_initial.push(builder);
            }
        }
        Ok(entries)
    }

    fn create_backward_entries(&mut self) -> Result<Entries, DfaError> {
        let nfa = self.nfa;
        let mut anchored = TransitionSet::from_transitions(
            nfa,
            false,
            nfa.state(nfa.reverse_anchored_entry()).prev(),
        );

        let unanchored = match nfa.reverse_unanchored_entry() {
            Some(entry) => {
                let prev = nfa.state(entry).prev();
                anchored.add_all(nfa, prev);
                Some(self.lookup_or_create(TransitionSet::from_transitions(nfa, false, prev))?)
            }
            None => None,
        };
        let anchored = self.lookup_or_create(anchored)?;

        Ok(Entries {
            anchored: vec![anchored],
            unanchored: vec![unanchored],
            anchored_initial: Vec::new(),
            unanchored_initial: Vec::new(),
        })
    }

    fn add_initial_capture(&mut self, set: TransitionSet, state: u16) -> usize {
        let builder = self.captures.add(None, set, state);
        self.descriptor_mut(state).preceding.push(builder);
        builder
    }

    pub(super) fn descriptor(&self, id: u16) -> &StateDescriptor {
        &self.registry[usize::from(id)]
    }

    pub(super) fn descriptor_mut(&mut self, id: u16) -> &mut StateDescriptor {
        &mut self.registry[usize::from(id)]
    }

    pub(super) fn state_set(&self, id: u16) -> &TransitionSet {
        self.registry
            .get_index(usize::from(id))
            .map(|(set, _)| set)
            .unwrap_or_else(|| unreachable!("state {id} is registered"))
    }

    fn lookup_or_create(&mut self, set: TransitionSet) -> Result<u16, DfaError> {
        if let Some(index) = self.registry.get_index_of(&set) {
            return Ok(index as u16);
        }
        let id = self.create_state(set)?;
        self.queue.push(id);
        Ok(id)
    }

    /// Register a new state; backward states containing prefix transitions
    /// also get their prefix satellite.
    fn create_state(&mut self, set: TransitionSet) -> Result<u16, DfaError> {
        let id = self.create_state_inner(set)?;
        if self.forward || !self.state_set(id).contains_prefix_states() {
            return Ok(id);
        }

        let nfa = self.nfa;
        let mut prefix_set = TransitionSet::new(false);
        for &t in self.state_set(id).transitions() {
            if nfa.state(nfa.transition(t).source()).has_prefix_states() {
                prefix_set.add(nfa, t);
            }
        }
        let prefix = match self.registry.get_index_of(&prefix_set) {
            Some(index) => index as u16,
            None => {
                let prefix = self.create_state_inner(prefix_set)?;
                self.queue.push(prefix);
                prefix
            }
        };
        self.descriptor_mut(id).prefix_state = Some(prefix);
        self.descriptor_mut(prefix).prefix_state = Some(prefix);
        Ok(id)
    }

    fn create_state_inner(&mut self, set: TransitionSet) -> Result<u16, DfaError> {
        if set.len() > self.max_fan_in {
            self.max_fan_in = set.len();
            let limit = self.limits.max_nfa_states_per_dfa_state;
            if self.max_fan_in > limit {
                return Err(DfaError::StateFanInExceeded {
                    size: self.max_fan_in,
                    limit,
                });
            }
        }

        let id = self.registry.len() as u16;
        let mut descriptor = StateDescriptor::new(id);
        if self.nfa.is_trace_finder() {
            descriptor.unanchored_result = set.shared_result(self.nfa, false);
            descriptor.anchored_result = set.shared_result(self.nfa, true);
        }
        trace!("state {id}: {} transitions", set.len());
        self.registry.insert(set, descriptor);

        let limit = self.limits.max_dfa_size.min(usize::from(u16::MAX));
        let pending = if self.forward { self.queue.len() } else { 0 };
        if self.registry.len() + pending > limit {
            return Err(DfaError::AutomatonSizeExceeded {
                mode: self.mode.generation_mode(),
                limit,
            });
        }
        Ok(id)
    }

    fn expand(&mut self, id: u16) -> Result<(), DfaError> {
        if self.try_prune(id) {
            return Ok(());
        }

        let nfa = self.nfa;
        let forward = self.forward;
        let members = self.state_set(id).transitions().to_vec();
        let connections: Vec<Connection<'_>> = members
            .iter()
            .filter_map(|&t| {
                let state = nfa.target(t, forward);
                state.matcher().map(|chars| Connection {
                    chars,
                    successors: state.successors(forward),
                })
            })
            .collect();
        let partitions = self.canonicalizer.run(nfa, &connections);

        let from_final = self.prune && {
            let descriptor = self.descriptor(id);
            self.state_set(id).contains_final()
                || descriptor.override_final
                || descriptor.final_state_successor
        };

        let mut successors = Vec::with_capacity(partitions.len());
        let mut matchers: Vec<CharSet> = Vec::with_capacity(partitions.len());
        let mut capture_edges = Vec::new();
        for (chars, target) in partitions {
            let edge = self.track_capture_groups.then(|| target.clone());
            let successor = match self.registry.get_index_of(&target) {
                Some(index) => {
                    let successor = index as u16;
                    if from_final && !self.descriptor(successor).final_state_successor {
                        self.reschedule(successor);
                        self.propagate_final_state_successor(successor);
                    }
                    successor
                }
                None => {
                    let successor = self.create_state(target)?;
                    self.queue.push(successor);
                    successor
                }
            };
            if from_final {
                self.descriptor_mut(id).final_state_successor = true;
                self.descriptor_mut(successor).final_state_successor = true;
            }
            if let Some(edge) = edge {
                let builder = self.captures.add(Some(id), edge, successor);
                self.descriptor_mut(successor).preceding.push(builder);
                capture_edges.push(builder);
            }
            successors.push(successor);
            matchers.push(chars);
        }

        let descriptor = self.descriptor_mut(id);
        descriptor.successors = successors;
        descriptor.matchers = matchers;
        descriptor.capture_edges = capture_edges;
        Ok(())
    }
}
