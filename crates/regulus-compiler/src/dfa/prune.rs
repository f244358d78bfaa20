//! Final-state pruning.
//!
//! A backward trace-finder automaton only needs to scan until the outcome is
//! known. A state whose NFA states all lead to the same precalculated result
//! becomes a final leaf. States reached from a final state must keep
//! scanning (a longer match could still start earlier), so they are marked
//! and never pruned; if a pruned state gets marked later, it is rescheduled
//! and the mark spreads through everything already expanded behind it.

use log::trace;

use super::generator::DfaGenerator;

impl DfaGenerator<'_> {
    /// Prune `id` if every NFA state it reaches agrees on one result.
    pub(super) fn try_prune(&mut self, id: u16) -> bool {
        if !self.prune || self.descriptor(id).final_state_successor {
            return false;
        }

        let nfa = self.nfa;
        let results = nfa.pre_calculated_results();
        let mut first: Option<u8> = None;
        for &t in self.state_set(id).transitions() {
            let state = nfa.target(t, self.forward);
            if !state.has_possible_results() {
                return false;
            }
            for &index in state.possible_results() {
                match first {
                    None => first = Some(index),
                    Some(f) if results[usize::from(f)] != results[usize::from(index)] => {
                        return false;
                    }
                    Some(_) => {}
                }
            }
        }

        let Some(result) = first else {
            return false;
        };
        trace!("state {id}: pruned with result {result}");
        self.descriptor_mut(id).set_pruned(result);
        true
    }

    /// Mark `id` as a final-state successor and queue it for (re)expansion.
    pub(super) fn reschedule(&mut self, id: u16) {
        let result = self.state_set(id).shared_result(self.nfa, false);
        let descriptor = self.descriptor_mut(id);
        descriptor.final_state_successor = true;
        descriptor.override_final = false;
        descriptor.unanchored_result = result;
        trace!("state {id}: rescheduled as final-state successor");
        self.queue.push(id);
    }

    /// Spread the final-state-successor mark from `from` through already
    /// expanded successors, breadth first, until every reached state is
    /// marked.
    pub(super) fn propagate_final_state_successor(&mut self, from: u16) {
        let mut current = std::mem::take(&mut self.frontier);
        let mut next = std::mem::take(&mut self.next_frontier);
        current.clear();
        current.extend_from_slice(&self.descriptor(from).successors);

        while !current.is_empty() {
            next.clear();
            for &id in &current {
                if self.descriptor(id).final_state_successor {
                    continue;
                }
                next.extend_from_slice(&self.descriptor(id).successors);
                self.reschedule(id);
            }
            std::mem::swap(&mut current, &mut next);
        }

        self.frontier = current;
        self.next_frontier = next;
    }
}
