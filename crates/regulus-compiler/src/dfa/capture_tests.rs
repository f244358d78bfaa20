use regulus_automaton::StateKind;
use regulus_core::{CharSet, GroupBoundaries, Nfa, NfaBuilder};

use crate::{DfaError, DfaGenerator, DfaLimits, Mode, shot_dfa};

/// (a|c)(b|d) shaped as `ab|cd` with group 0 around the whole match.
fn alternatives() -> Nfa {
    let mut b = NfaBuilder::new();
    let a = b.matcher(CharSet::single('a'));
    let bb = b.matcher(CharSet::single('b'));
    let c = b.matcher(CharSet::single('c'));
    let d = b.matcher(CharSet::single('d'));
    let open = || GroupBoundaries::new([0], []);
    let close = || GroupBoundaries::new([1], []);
    b.connect_with(b.anchored_initial(0), a, open());
    b.connect_with(b.anchored_initial(0), c, open());
    b.connect(a, bb);
    b.connect(c, d);
    b.connect_with(bb, b.final_state(), close());
    b.connect_with(d, b.final_state(), close());
    b.capture_groups(1);
    b.build().unwrap()
}

#[test]
fn identical_programs_share_an_id() {
    let nfa = alternatives();

    let dfa = DfaGenerator::forward(&nfa, true, DfaLimits::default()).unwrap();

    shot_dfa!(dfa, @r"
    anchored: S0
    unanchored: -
    S0 pre=[0]
      a -> S1 #1
      c -> S2 #2
    S1 pre=[1]
      b -> S4 #3
    S2 pre=[2]
      d -> S3 #3
    S3 final pre=[3]
    S4 final pre=[3]
    initial: anchored [0], unanchored [None]
    #0: [_ +0, _ +0]
    #1: [0]
    #2: [1]
    #3: [0 +1] final=0
    ");
    assert_eq!(dfa.num_capture_groups, 1);
    assert_eq!(dfa.verify(), Ok(()));
}

#[test]
fn capture_ids_are_bounded() {
    let nfa = alternatives();

    let err = DfaGenerator::forward(&nfa, true, DfaLimits::new().max_capture_transition_id(2))
        .unwrap_err();
    assert_eq!(err, DfaError::CaptureTransitionIdExhausted { limit: 2 });
    assert_eq!(err.to_string(), "capture transition ids exhausted (limit 2)");

    assert!(DfaGenerator::forward(&nfa, true, DfaLimits::new().max_capture_transition_id(3)).is_ok());
}

#[test]
fn every_edge_has_a_program() {
    let nfa = alternatives();

    let dfa = DfaGenerator::forward(&nfa, true, DfaLimits::default()).unwrap();
    let table = dfa.captures.as_ref().unwrap();

    for state in dfa.states() {
        let StateKind::CaptureTracking {
            transitions,
            preceding_transitions,
        } = &state.kind
        else {
            panic!("S{} is not capture tracking", state.id);
        };
        assert_eq!(transitions.len(), state.successors.len());
        assert!(!preceding_transitions.is_empty());
        for &t in transitions.iter().chain(preceding_transitions) {
            assert!(table.get(t).is_some());
        }
    }
}

#[test]
fn capture_tracking_skips_the_loop_back() {
    let mut b = NfaBuilder::new();
    let a = b.matcher(CharSet::single('a'));
    b.connect(b.anchored_initial(0), a);
    b.connect(b.initial(0), a);
    b.connect(a, b.final_state());
    let nfa = b.build().unwrap();
    assert!(nfa.loop_back_matcher().is_some());

    let dfa = DfaGenerator::forward(&nfa, true, DfaLimits::default()).unwrap();

    assert!(dfa.states().iter().all(|s| !s.loop_to_self));
    let table = dfa.captures.as_ref().unwrap();
    assert_eq!(table.anchored_initial.len(), 1);
    assert!(table.unanchored_initial[0].is_some());
}

#[test]
fn backward_generation_never_tracks_captures() {
    let nfa = alternatives();

    let dfa = DfaGenerator::new(
        &nfa,
        Mode::backward().track_capture_groups(true),
        DfaLimits::default(),
    )
    .generate()
    .unwrap();

    assert!(dfa.captures.is_none());
    assert!(!dfa.tracks_capture_groups());
}
