use regulus_core::CharSet;

use crate::{
    CaptureGroupTransition, CaptureProgram, CaptureTransitionTable, Dfa, DfaStateNode, Direction,
    Matcher, StateKind, VerifyError,
};

fn node(id: u16, edges: Vec<(Matcher, u16)>) -> DfaStateNode {
    let (matchers, successors) = edges.into_iter().unzip();
    DfaStateNode {
        id,
        is_final: false,
        is_anchored_final: false,
        loop_to_self: false,
        find_single_char: None,
        successors,
        matchers,
        kind: StateKind::Forward,
    }
}

/// `ab`: 0 --a--> 1 --b--> 2 (final).
fn literal_ab() -> Dfa {
    let mut last = node(2, vec![]);
    last.is_final = true;
    Dfa {
        direction: Direction::Forward,
        states: vec![
            node(0, vec![(Matcher::Single('a' as u32), 1)]),
            node(1, vec![(Matcher::Single('b' as u32), 2)]),
            last,
        ],
        anchored_entries: vec![0],
        unanchored_entries: vec![None],
        captures: None,
        num_capture_groups: 0,
        max_nfa_states_per_dfa_state: 1,
    }
}

#[test]
fn accepts_well_formed_dfa() {
    let dfa = literal_ab();

    assert_eq!(dfa.verify(), Ok(()));
    assert_eq!(dfa.state(0).unwrap().next_state('a' as u32), Some(1));
    assert_eq!(dfa.state(0).unwrap().next_state('b' as u32), None);
    assert!(dfa.state(3).is_none());
}

#[test]
fn rejects_dangling_ids() {
    let mut dfa = literal_ab();
    dfa.states[1].successors[0] = 7;
    assert_eq!(
        dfa.verify(),
        Err(VerifyError::DanglingSuccessor {
            state: 1,
            successor: 7
        })
    );

    let mut dfa = literal_ab();
    dfa.unanchored_entries[0] = Some(9);
    assert_eq!(dfa.verify(), Err(VerifyError::DanglingEntry { entry: 9 }));

    let mut dfa = literal_ab();
    dfa.states[2].kind = StateKind::Backward {
        prefix_state: Some(5),
    };
    assert_eq!(
        dfa.verify(),
        Err(VerifyError::DanglingPrefix {
            state: 2,
            prefix: 5
        })
    );
}

#[test]
fn rejects_bad_partitions() {
    let mut dfa = literal_ab();
    dfa.states[0] = node(0, vec![(Matcher::Any, 1), (Matcher::Single('b' as u32), 1)]);
    assert_eq!(dfa.verify(), Err(VerifyError::MisplacedAny { state: 0 }));

    let mut dfa = literal_ab();
    dfa.states[0] = node(
        0,
        vec![
            (Matcher::Set(CharSet::range('a', 'c')), 1),
            (Matcher::Single('b' as u32), 1),
        ],
    );
    assert_eq!(
        dfa.verify(),
        Err(VerifyError::OverlappingPartitions { state: 0 })
    );

    let mut dfa = literal_ab();
    dfa.states[0] = node(
        0,
        vec![
            (Matcher::Single('x' as u32), 1),
            (Matcher::Single('a' as u32), 1),
        ],
    );
    assert_eq!(
        dfa.verify(),
        Err(VerifyError::UnsortedPartitions { state: 0 })
    );

    let mut dfa = literal_ab();
    dfa.states[0].successors.push(2);
    assert!(matches!(
        dfa.verify(),
        Err(VerifyError::PartitionCountMismatch { state: 0, .. })
    ));
}

#[test]
fn catch_all_may_follow_other_partitions() {
    let mut dfa = literal_ab();
    dfa.states[0] = node(
        0,
        vec![(Matcher::Single('a' as u32), 1), (Matcher::Any, 0)],
    );

    assert_eq!(dfa.verify(), Ok(()));
    assert_eq!(dfa.states[0].next_state('z' as u32), Some(0));
}

#[test]
fn rejects_unreachable_state() {
    let mut dfa = literal_ab();
    dfa.states.push(node(3, vec![]));

    assert_eq!(dfa.verify(), Err(VerifyError::Unreachable { state: 3 }));
}

#[test]
fn prefix_links_count_as_reachable() {
    let mut dfa = literal_ab();
    dfa.direction = Direction::Backward;
    for state in &mut dfa.states {
        state.kind = StateKind::Backward { prefix_state: None };
    }
    let mut satellite = node(3, vec![]);
    satellite.kind = StateKind::Backward {
        prefix_state: Some(3),
    };
    dfa.states.push(satellite);
    dfa.states[0].kind = StateKind::Backward {
        prefix_state: Some(3),
    };

    assert_eq!(dfa.verify(), Ok(()));
    assert_eq!(dfa.states[3].prefix_state(), Some(3));
}

fn with_captures(mut dfa: Dfa) -> Dfa {
    for state in &mut dfa.states {
        state.kind = StateKind::CaptureTracking {
            transitions: vec![0; state.successors.len()],
            preceding_transitions: vec![0],
        };
    }
    dfa.captures = Some(CaptureTransitionTable {
        transitions: vec![CaptureGroupTransition {
            id: 0,
            program: CaptureProgram::default(),
        }],
        anchored_initial: vec![0],
        unanchored_initial: vec![None],
    });
    dfa
}

#[test]
fn checks_capture_tables() {
    let dfa = with_captures(literal_ab());
    assert_eq!(dfa.verify(), Ok(()));
    assert!(dfa.tracks_capture_groups());

    let mut dfa = with_captures(literal_ab());
    dfa.states[1].kind = StateKind::CaptureTracking {
        transitions: vec![0],
        preceding_transitions: vec![],
    };
    assert_eq!(
        dfa.verify(),
        Err(VerifyError::MissingPrecedingTransitions { state: 1 })
    );

    let mut dfa = with_captures(literal_ab());
    dfa.states[0].kind = StateKind::CaptureTracking {
        transitions: vec![4],
        preceding_transitions: vec![0],
    };
    assert_eq!(
        dfa.verify(),
        Err(VerifyError::DanglingCaptureTransition {
            state: 0,
            transition: 4
        })
    );

    let mut dfa = with_captures(literal_ab());
    dfa.states[2].kind = StateKind::Forward;
    assert_eq!(
        dfa.verify(),
        Err(VerifyError::MissingCaptureTransitions { state: 2 })
    );

    let mut dfa = with_captures(literal_ab());
    if let Some(table) = &mut dfa.captures {
        table.unanchored_initial[0] = Some(0);
    }
    assert_eq!(dfa.verify(), Err(VerifyError::InitialCaptureMismatch));
}

#[test]
fn matcher_from_set_picks_single() {
    assert_eq!(
        Matcher::from_set(CharSet::single('q')),
        Matcher::Single('q' as u32)
    );
    assert!(matches!(
        Matcher::from_set(CharSet::range('a', 'b')),
        Matcher::Set(_)
    ));
    assert_eq!(Matcher::Any.to_string(), "ANY");
    assert_eq!(Matcher::Single('q' as u32).to_string(), "q");
}

#[test]
fn serializes_to_json() {
    let json = serde_json::to_value(literal_ab()).unwrap();

    assert_eq!(json["direction"], "Forward");
    assert_eq!(json["states"][0]["matchers"][0]["Single"], 97);
    assert_eq!(json["states"][2]["is_final"], true);
}
