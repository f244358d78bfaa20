//! Turns overlapping matcher transitions into disjoint partitions.
//!
//! Input: the matcher NFA states reachable from one DFA state, each with its
//! character set and follow-up transitions, in priority order. Output: a list
//! of `(CharSet, TransitionSet)` with pairwise disjoint character sets,
//! sorted by set order, one entry per distinct target set.

use regulus_core::{CharRange, CharSet, Nfa, TransitionId};

use super::transition_set::TransitionSet;

/// One outgoing matcher transition of a DFA state before canonicalization.
pub(crate) struct Connection<'a> {
    pub chars: &'a CharSet,
    pub successors: &'a [TransitionId],
}

pub(crate) struct Canonicalizer {
    forward: bool,
    /// Merge only target sets with equal priority order.
    order_sensitive: bool,
    points: Vec<u32>,
    active: Vec<usize>,
    partitions: Vec<(Vec<CharRange>, TransitionSet)>,
}

impl Canonicalizer {
    pub fn new(forward: bool, order_sensitive: bool) -> Self {
        Self {
            forward,
            order_sensitive,
            points: Vec::new(),
            active: Vec::new(),
            partitions: Vec::new(),
        }
    }

    pub fn run(&mut self, nfa: &Nfa, connections: &[Connection<'_>]) -> Vec<(CharSet, TransitionSet)> {
        self.points.clear();
        self.partitions.clear();

        for c in connections {
            for r in c.chars.ranges() {
                self.points.push(r.lo);
                self.points.push(r.hi + 1);
            }
        }
        self.points.sort_unstable();
        self.points.dedup();

        for i in 0..self.points.len().saturating_sub(1) {
            let (lo, next) = (self.points[i], self.points[i + 1]);

            self.active.clear();
            self.active.extend(
                connections
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.chars.contains(lo))
                    .map(|(index, _)| index),
            );
            if self.active.is_empty() {
                continue;
            }

            let mut target = TransitionSet::new(self.forward);
            for &index in &self.active {
                target.add_all(nfa, connections[index].successors);
            }
            if target.is_empty() {
                continue;
            }

            let range = CharRange::new(lo, next - 1);
            let order_sensitive = self.order_sensitive;
            match self.partitions.iter_mut().find(|(_, existing)| {
                if order_sensitive {
                    existing.same_order(&target)
                } else {
                    *existing == target
                }
            }) {
                Some((ranges, _)) => ranges.push(range),
                None => self.partitions.push((vec![range], target)),
            }
        }

        let mut result: Vec<(CharSet, TransitionSet)> = self
            .partitions
            .drain(..)
            .map(|(ranges, set)| (CharSet::from_ranges(ranges), set))
            .collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }
}
