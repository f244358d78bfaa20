//! Transition labels of finalized states.

use std::fmt;

use regulus_core::CharSet;
use serde::Serialize;

/// Label of one outgoing partition.
///
/// Partitions of a state are tested in order; `Any` only ever appears last
/// and stands for "everything the earlier partitions did not take".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Matcher {
    Any,
    Single(u32),
    Set(CharSet),
}

impl Matcher {
    pub fn from_set(set: CharSet) -> Self {
        match set.single_code_point() {
            Some(c) => Self::Single(c),
            None => Self::Set(set),
        }
    }

    pub fn matches(&self, c: u32) -> bool {
        match self {
            Self::Any => true,
            Self::Single(s) => *s == c,
            Self::Set(set) => set.contains(c),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// The characters accepted when tested in isolation.
    pub fn to_set(&self) -> CharSet {
        match self {
            Self::Any => CharSet::full(),
            Self::Single(c) => CharSet::code_point(*c),
            Self::Set(set) => set.clone(),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("ANY"),
            Self::Single(c) => write!(f, "{}", CharSet::code_point(*c)),
            Self::Set(set) => write!(f, "{set}"),
        }
    }
}
