//! Digit candidate masks.
//!
//! Digits are zero-based internally (0..=8) and rendered one-based.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not, Sub};

use serde::{Deserialize, Serialize};

const ALL_DIGITS: u16 = 0b1_1111_1111;

/// A set of digits 0..=8 stored as a 9-bit mask.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DigitSet(u16);

impl DigitSet {
    /// The empty set.
    #[inline]
    pub const fn empty() -> Self {
        DigitSet(0)
    }

    /// All nine digits.
    #[inline]
    pub const fn all() -> Self {
        DigitSet(ALL_DIGITS)
    }

    /// A set holding only `digit`.
    #[inline]
    pub fn single(digit: u8) -> Self {
        debug_assert!(digit < 9);
        DigitSet(1 << digit)
    }

    /// Builds a set from raw mask bits; bits above 8 are dropped.
    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        DigitSet(bits & ALL_DIGITS)
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn insert(&mut self, digit: u8) {
        self.0 |= 1 << digit;
    }

    #[inline]
    pub fn remove(&mut self, digit: u8) {
        self.0 &= !(1 << digit);
    }

    #[inline]
    pub fn contains(self, digit: u8) -> bool {
        digit < 9 && self.0 & (1 << digit) != 0
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Lowest digit in the set, if any.
    #[inline]
    pub fn first(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }

    /// Iterate digits in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..9u8).filter(move |&d| self.0 & (1 << d) != 0)
    }
}

impl FromIterator<u8> for DigitSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = DigitSet::empty();
        for d in iter {
            set.insert(d);
        }
        set
    }
}

impl BitOr for DigitSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        DigitSet(self.0 | rhs.0)
    }
}

impl BitAnd for DigitSet {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        DigitSet(self.0 & rhs.0)
    }
}

impl Sub for DigitSet {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        DigitSet(self.0 & !rhs.0)
    }
}

impl Not for DigitSet {
    type Output = Self;
    fn not(self) -> Self {
        DigitSet(!self.0 & ALL_DIGITS)
    }
}

impl fmt::Debug for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigitSet({})", self)
    }
}

impl fmt::Display for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.iter() {
            write!(f, "{}", d + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut set = DigitSet::empty();
        set.insert(0);
        set.insert(8);
        assert!(set.contains(0));
        assert!(set.contains(8));
        assert!(!set.contains(4));
        assert_eq!(set.count(), 2);
        set.remove(0);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![8]);
    }

    #[test]
    fn test_set_algebra() {
        let a: DigitSet = [1, 2, 3].into_iter().collect();
        let b: DigitSet = [3, 4].into_iter().collect();
        assert_eq!((a | b).count(), 4);
        assert_eq!((a & b).iter().collect::<Vec<_>>(), vec![3]);
        assert_eq!((a - b).iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!((!a).count(), 6);
        assert_eq!(a.first(), Some(1));
        assert_eq!(DigitSet::empty().first(), None);
    }

    #[test]
    fn test_display_is_one_based() {
        let set: DigitSet = [0, 4, 8].into_iter().collect();
        assert_eq!(set.to_string(), "159");
    }
}
