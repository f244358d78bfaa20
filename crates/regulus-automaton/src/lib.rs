#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Finalized DFA format for Regulus.
//!
//! This crate contains:
//! - State nodes and their matcher partitions (`DfaStateNode`, `Matcher`)
//! - Capture-group transition programs (`CaptureProgram`, `CaptureTransitionTable`)
//! - The automaton container (`Dfa`) and its structural verifier

mod capture;
mod dfa;
mod matcher;
mod state;
mod verify;

#[cfg(test)]
mod verify_tests;

pub use capture::{CaptureGroupTransition, CaptureProgram, CaptureTransitionTable, SlotUpdate};
pub use dfa::{Dfa, Direction};
pub use matcher::Matcher;
pub use state::{DfaStateNode, StateKind};
pub use verify::VerifyError;

/// Compact DFA state id.
pub type DfaStateId = u16;

/// Compact capture-group transition id.
pub type CaptureTransitionId = u16;

/// Largest capture-group transition id (the id space is 16-bit signed).
pub const MAX_CAPTURE_TRANSITION_ID: CaptureTransitionId = i16::MAX as u16;
