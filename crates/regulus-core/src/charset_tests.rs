use super::charset::{CharRange, CharSet, MAX_CODE_POINT};

#[test]
fn from_ranges_merges_overlapping_and_adjacent() {
    let set = CharSet::from_ranges([
        CharRange::new('d' as u32, 'f' as u32),
        CharRange::new('a' as u32, 'b' as u32),
        CharRange::new('c' as u32, 'c' as u32),
        CharRange::new('x' as u32, 'z' as u32),
        CharRange::new('y' as u32, 'y' as u32),
    ]);

    assert_eq!(
        set.ranges(),
        &[
            CharRange::new('a' as u32, 'f' as u32),
            CharRange::new('x' as u32, 'z' as u32),
        ]
    );
}

#[test]
fn union_and_intersect() {
    let ab = CharSet::range('a', 'b');
    let bc = CharSet::range('b', 'c');

    assert_eq!(ab.union(&bc), CharSet::range('a', 'c'));
    assert_eq!(ab.intersect(&bc), CharSet::single('b'));
    assert!(ab.intersects(&bc));
    assert!(!ab.intersects(&CharSet::single('z')));
}

#[test]
fn complement_round_trips() {
    let set = CharSet::chars(['a', 'q', 'z']);
    let complement = set.complement();

    assert!(!complement.contains('a' as u32));
    assert!(complement.contains('b' as u32));
    assert!(complement.contains(0));
    assert!(complement.contains(MAX_CODE_POINT));
    assert_eq!(complement.complement(), set);
    assert!(set.union(&complement).matches_everything());
}

#[test]
fn complement_of_edges() {
    assert!(CharSet::empty().complement().matches_everything());
    assert!(CharSet::full().complement().is_empty());

    let low = CharSet::code_point(0);
    assert_eq!(CharSet::min(&low.complement()), Some(1));
}

#[test]
fn subtract_splits_range() {
    let set = CharSet::range('a', 'e').subtract(&CharSet::single('c'));

    assert_eq!(set, CharSet::chars(['a', 'b', 'd', 'e']));
    assert_eq!(set.ranges().len(), 2);
    assert_eq!(set.size(), 4);
}

#[test]
fn single_code_point_only_for_singletons() {
    assert_eq!(CharSet::single('x').single_code_point(), Some('x' as u32));
    assert_eq!(CharSet::range('x', 'y').single_code_point(), None);
    assert_eq!(CharSet::chars(['a', 'c']).single_code_point(), None);
}

#[test]
fn contains_uses_ranges() {
    let set = CharSet::chars(['a', 'b', 'c', 'x']);

    assert!(set.contains('b' as u32));
    assert!(set.contains('x' as u32));
    assert!(!set.contains('d' as u32));
    assert!(!set.contains('w' as u32));
}

#[test]
fn ordering_follows_first_range() {
    let mut sets = vec![
        CharSet::single('z'),
        CharSet::single('a').complement(),
        CharSet::range('b', 'c'),
    ];
    sets.sort();

    assert_eq!(sets[0], CharSet::single('a').complement());
    assert_eq!(sets[1], CharSet::range('b', 'c'));
    assert_eq!(sets[2], CharSet::single('z'));
}

#[test]
fn display_notation() {
    assert_eq!(CharSet::single('a').to_string(), "a");
    assert_eq!(CharSet::range('a', 'c').to_string(), "[a-c]");
    assert_eq!(CharSet::single('a').complement().to_string(), "[^a]");
    assert_eq!(CharSet::full().to_string(), "[^]");
    assert_eq!(CharSet::empty().to_string(), "[]");
    assert_eq!(CharSet::chars(['-', ']']).to_string(), "[\\-\\]]");
    assert_eq!(CharSet::code_point(0).to_string(), "\\u{0}");
}

#[test]
fn serializes_as_range_list() {
    let json = serde_json::to_string(&CharSet::range('a', 'b')).unwrap();
    assert_eq!(json, r#"[{"lo":97,"hi":98}]"#);
}
