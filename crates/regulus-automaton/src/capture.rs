//! Capture-group transition programs.
//!
//! A capture-tracking executor keeps one capture array ("slot") per NFA
//! transition of the current DFA state, in the state's slot order. Taking an
//! edge runs the edge's [`CaptureProgram`] to build the successor's slots.

use serde::Serialize;

use crate::CaptureTransitionId;

/// How one successor slot is produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SlotUpdate {
    /// Slot of the previous state to copy from; `None` starts from an empty
    /// capture array.
    pub source: Option<u16>,
    /// Capture indices set to the current position.
    pub updates: Vec<u16>,
    /// Capture indices reset to unset.
    pub clears: Vec<u16>,
}

/// Slot rewrite performed when an edge is taken.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CaptureProgram {
    /// One entry per successor slot, in the successor's slot order.
    pub slots: Vec<SlotUpdate>,
    /// Slot holding the winning result if the successor is final.
    pub to_final: Option<u16>,
    /// Slot holding the winning result if the successor is anchored final.
    pub to_anchored_final: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CaptureGroupTransition {
    pub id: CaptureTransitionId,
    pub program: CaptureProgram,
}

/// Dense table of capture transitions indexed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CaptureTransitionTable {
    pub transitions: Vec<CaptureGroupTransition>,
    /// Initial transition per entry point for anchored searches.
    pub anchored_initial: Vec<CaptureTransitionId>,
    /// Initial transition per entry point for unanchored searches.
    pub unanchored_initial: Vec<Option<CaptureTransitionId>>,
}

impl CaptureTransitionTable {
    pub fn get(&self, id: CaptureTransitionId) -> Option<&CaptureGroupTransition> {
        self.transitions.get(usize::from(id))
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
