//! Annotations attached to green nodes.
//!
//! Annotations are invisible to the printed text. Rewrites tag the nodes they
//! create so that later passes (simplification, formatting) can find them and
//! leave the rest of the tree alone.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A small set of annotation flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Annotations(u8);

impl Annotations {
    /// No annotations.
    pub const NONE: Self = Self(0);
    /// The node may be simplified by a simplification pass.
    pub const SIMPLIFY: Self = Self(1);
    /// The node may be reformatted by a formatting pass.
    pub const FORMAT: Self = Self(1 << 1);

    /// Returns the union of two sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns true if every flag in `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no flag is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Annotations {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Annotations {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Self::SIMPLIFY) {
            set.entry(&"SIMPLIFY");
        }
        if self.contains(Self::FORMAT) {
            set.entry(&"FORMAT");
        }
        set.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_contains() {
        let both = Annotations::SIMPLIFY | Annotations::FORMAT;
        assert!(both.contains(Annotations::SIMPLIFY));
        assert!(both.contains(Annotations::FORMAT));
        assert!(!Annotations::SIMPLIFY.contains(Annotations::FORMAT));
    }

    #[test]
    fn test_empty() {
        assert!(Annotations::NONE.is_empty());
        assert!(Annotations::default().is_empty());
        assert!(!Annotations::FORMAT.is_empty());
        // Every set contains the empty set
        assert!(Annotations::FORMAT.contains(Annotations::NONE));
    }

    #[test]
    fn test_debug() {
        let both = Annotations::SIMPLIFY | Annotations::FORMAT;
        assert_eq!(format!("{:?}", both), r#"{"SIMPLIFY", "FORMAT"}"#);
        assert_eq!(format!("{:?}", Annotations::NONE), "{}");
    }
}
