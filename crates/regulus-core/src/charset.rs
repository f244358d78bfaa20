//! Character sets over Unicode code points.
//!
//! A [`CharSet`] is a sorted list of disjoint, non-adjacent inclusive ranges.
//! Every constructor normalizes, so two sets are equal iff they contain the
//! same code points. The ordering on sets (first range, then the rest) is what
//! the DFA compiler uses to sort transition partitions.

use std::fmt;

use serde::Serialize;

/// Largest code point a set may contain.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Inclusive range of code points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CharRange {
    pub lo: u32,
    pub hi: u32,
}

impl CharRange {
    pub fn new(lo: u32, hi: u32) -> Self {
        assert!(
            lo <= hi && hi <= MAX_CODE_POINT,
            "invalid code point range {lo:#x}..={hi:#x}"
        );
        Self { lo, hi }
    }

    pub fn contains(self, c: u32) -> bool {
        self.lo <= c && c <= self.hi
    }

    /// Number of code points covered.
    pub fn size(self) -> u32 {
        self.hi - self.lo + 1
    }
}

/// A set of code points.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CharSet {
    ranges: Vec<CharRange>,
}

impl CharSet {
    pub fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    /// The set of all code points.
    pub fn full() -> Self {
        Self {
            ranges: vec![CharRange::new(0, MAX_CODE_POINT)],
        }
    }

    pub fn single(c: char) -> Self {
        Self::code_point(c as u32)
    }

    pub fn code_point(c: u32) -> Self {
        Self {
            ranges: vec![CharRange::new(c, c)],
        }
    }

    pub fn range(lo: char, hi: char) -> Self {
        Self {
            ranges: vec![CharRange::new(lo as u32, hi as u32)],
        }
    }

    /// Build a set from arbitrary (possibly overlapping, unsorted) ranges.
    pub fn from_ranges(ranges: impl IntoIterator<Item = CharRange>) -> Self {
        let mut ranges: Vec<CharRange> = ranges.into_iter().collect();
        normalize(&mut ranges);
        Self { ranges }
    }

    /// Build a set from individual characters.
    pub fn chars(chars: impl IntoIterator<Item = char>) -> Self {
        Self::from_ranges(
            chars
                .into_iter()
                .map(|c| CharRange::new(c as u32, c as u32)),
        )
    }

    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn matches_everything(&self) -> bool {
        matches!(self.ranges.as_slice(), [r] if r.lo == 0 && r.hi == MAX_CODE_POINT)
    }

    /// Smallest code point in the set.
    pub fn min(&self) -> Option<u32> {
        self.ranges.first().map(|r| r.lo)
    }

    /// The only code point in the set, if it has exactly one.
    pub fn single_code_point(&self) -> Option<u32> {
        match self.ranges.as_slice() {
            [r] if r.lo == r.hi => Some(r.lo),
            _ => None,
        }
    }

    /// Number of code points in the set.
    pub fn size(&self) -> u32 {
        self.ranges.iter().map(|r| r.size()).sum()
    }

    pub fn contains(&self, c: u32) -> bool {
        self.ranges
            .binary_search_by(|r| {
                if r.hi < c {
                    std::cmp::Ordering::Less
                } else if r.lo > c {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn union(&self, other: &CharSet) -> CharSet {
        let mut ranges = Vec::with_capacity(self.ranges.len() + other.ranges.len());
        ranges.extend_from_slice(&self.ranges);
        ranges.extend_from_slice(&other.ranges);
        normalize(&mut ranges);
        CharSet { ranges }
    }

    pub fn intersect(&self, other: &CharSet) -> CharSet {
        let mut ranges = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let a = self.ranges[i];
            let b = other.ranges[j];
            let lo = a.lo.max(b.lo);
            let hi = a.hi.min(b.hi);
            if lo <= hi {
                ranges.push(CharRange { lo, hi });
            }
            if a.hi < b.hi {
                i += 1;
            } else {
                j += 1;
            }
        }
        CharSet { ranges }
    }

    pub fn complement(&self) -> CharSet {
        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = 0u32;
        for r in &self.ranges {
            if r.lo > next {
                ranges.push(CharRange {
                    lo: next,
                    hi: r.lo - 1,
                });
            }
            next = r.hi + 1;
        }
        if next <= MAX_CODE_POINT {
            ranges.push(CharRange {
                lo: next,
                hi: MAX_CODE_POINT,
            });
        }
        CharSet { ranges }
    }

    pub fn subtract(&self, other: &CharSet) -> CharSet {
        self.intersect(&other.complement())
    }

    pub fn intersects(&self, other: &CharSet) -> bool {
        !self.intersect(other).is_empty()
    }
}

/// Sort and merge overlapping or adjacent ranges in place.
fn normalize(ranges: &mut Vec<CharRange>) {
    ranges.sort_unstable();
    let mut merged: Vec<CharRange> = Vec::with_capacity(ranges.len());
    for r in ranges.drain(..) {
        match merged.last_mut() {
            Some(last) if r.lo <= last.hi.saturating_add(1) => {
                last.hi = last.hi.max(r.hi);
            }
            _ => merged.push(r),
        }
    }
    *ranges = merged;
}

fn write_code_point(f: &mut fmt::Formatter<'_>, c: u32) -> fmt::Result {
    match char::from_u32(c) {
        Some(ch @ ('\\' | ']' | '[' | '-' | '^')) => write!(f, "\\{ch}"),
        Some(ch) if ch.is_ascii_graphic() => write!(f, "{ch}"),
        _ => write!(f, "\\u{{{c:x}}}"),
    }
}

fn write_ranges(f: &mut fmt::Formatter<'_>, ranges: &[CharRange]) -> fmt::Result {
    for r in ranges {
        write_code_point(f, r.lo)?;
        if r.hi != r.lo {
            f.write_str("-")?;
            write_code_point(f, r.hi)?;
        }
    }
    Ok(())
}

/// Regex-like class notation; a set is shown negated when its complement
/// has fewer ranges.
impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matches_everything() {
            return f.write_str("[^]");
        }
        if let Some(c) = self.single_code_point() {
            return write_code_point(f, c);
        }
        let complement = self.complement();
        if complement.ranges.len() < self.ranges.len() {
            f.write_str("[^")?;
            write_ranges(f, &complement.ranges)?;
        } else {
            f.write_str("[")?;
            write_ranges(f, &self.ranges)?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharSet({self})")
    }
}
