//! Test utilities and snapshot macros.

use std::fmt::Write as _;

use regulus_automaton::{CaptureProgram, Dfa, StateKind};
use regulus_core::{CharSet, NfaBuilder, StateId};

/// Inline snapshot of a DFA dump.
#[macro_export]
macro_rules! shot_dfa {
    ($dfa:expr, @$snapshot:literal) => {{
        let output = $crate::test_utils::dump(&$dfa);
        insta::assert_snapshot!(output, @$snapshot);
    }};
}

/// Chain one matcher per character of `text`, entered from every state in
/// `starts`. Returns the last matcher.
pub fn literal(b: &mut NfaBuilder, starts: &[StateId], text: &str) -> StateId {
    let mut chars = text.chars();
    let first = chars.next().expect("non-empty literal");
    let mut last = b.matcher(CharSet::single(first));
    for &start in starts {
        b.connect(start, last);
    }
    for c in chars {
        let next = b.matcher(CharSet::single(c));
        b.connect(last, next);
        last = next;
    }
    last
}

/// Both starts of entry point 0.
pub fn starts(b: &NfaBuilder) -> [StateId; 2] {
    [b.anchored_initial(0), b.initial(0)]
}

/// Whether a forward DFA finds a match anywhere in `input`.
///
/// Starts at entry point 0's anchored state, which is the state for a
/// search beginning at the start of input.
pub fn is_match(dfa: &Dfa, input: &str) -> bool {
    let mut id = dfa.anchored_entries[0];
    for c in input.chars() {
        let state = dfa.state(id).expect("valid state id");
        if state.is_final {
            return true;
        }
        match state.next_state(c as u32) {
            Some(next) => id = next,
            None => return false,
        }
    }
    let state = dfa.state(id).expect("valid state id");
    state.is_final || state.is_anchored_final
}

/// Plain-text rendering used by snapshot tests.
pub fn dump(dfa: &Dfa) -> String {
    let mut out = String::new();
    let entries = |ids: Vec<String>| ids.join(", ");
    writeln!(
        out,
        "anchored: {}",
        entries(dfa.anchored_entries.iter().map(|e| format!("S{e}")).collect())
    )
    .unwrap();
    writeln!(
        out,
        "unanchored: {}",
        entries(
            dfa.unanchored_entries
                .iter()
                .map(|e| e.map_or("-".to_string(), |e| format!("S{e}")))
                .collect()
        )
    )
    .unwrap();

    for state in dfa.states() {
        let mut header = format!("S{}", state.id);
        if state.is_final {
            header.push_str(" final");
        }
        if state.is_anchored_final {
            header.push_str(" anchored-final");
        }
        if state.loop_to_self {
            header.push_str(" loop");
        }
        if let Some(c) = state.find_single_char {
            write!(header, " find={}", CharSet::code_point(c)).unwrap();
        }
        match &state.kind {
            StateKind::Forward => {}
            StateKind::Backward { prefix_state } => {
                if let Some(p) = prefix_state {
                    write!(header, " prefix=S{p}").unwrap();
                }
            }
            StateKind::TraceFinder {
                prefix_state,
                unanchored_result,
                anchored_result,
            } => {
                if let Some(p) = prefix_state {
                    write!(header, " prefix=S{p}").unwrap();
                }
                if let Some(r) = unanchored_result {
                    write!(header, " result={r}").unwrap();
                }
                if let Some(r) = anchored_result {
                    write!(header, " anchored-result={r}").unwrap();
                }
            }
            StateKind::CaptureTracking {
                preceding_transitions,
                ..
            } => {
                write!(header, " pre={preceding_transitions:?}").unwrap();
            }
        }
        writeln!(out, "{header}").unwrap();

        let transitions = state.capture_transitions();
        for (i, (matcher, successor)) in state.matchers.iter().zip(&state.successors).enumerate() {
            write!(out, "  {matcher} -> S{successor}").unwrap();
            if let Some(t) = transitions.get(i) {
                write!(out, " #{t}").unwrap();
            }
            writeln!(out).unwrap();
        }
    }

    if let Some(table) = &dfa.captures {
        writeln!(
            out,
            "initial: anchored {:?}, unanchored {:?}",
            table.anchored_initial, table.unanchored_initial
        )
        .unwrap();
        for t in &table.transitions {
            writeln!(out, "#{}: {}", t.id, dump_program(&t.program)).unwrap();
        }
    }

    out.trim_end().to_string()
}

fn dump_program(program: &CaptureProgram) -> String {
    let slots: Vec<String> = program
        .slots
        .iter()
        .map(|slot| {
            let mut s = slot.source.map_or("_".to_string(), |src| src.to_string());
            for u in &slot.updates {
                write!(s, " +{u}").unwrap();
            }
            for c in &slot.clears {
                write!(s, " -{c}").unwrap();
            }
            s
        })
        .collect();
    let mut out = format!("[{}]", slots.join(", "));
    if let Some(f) = program.to_final {
        write!(out, " final={f}").unwrap();
    }
    if let Some(f) = program.to_anchored_final {
        write!(out, " anchored-final={f}").unwrap();
    }
    out
}
