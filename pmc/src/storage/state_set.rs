//! Fixed-universe boolean state sets
//!
//! A [`StateSet`] holds one bit per state of a model. Unlike a plain
//! `BitSet`, it remembers the size of its universe so that complementing
//! stays within the model's states.

use bit_set::BitSet;
use std::ops::{BitAndAssign, BitOrAssign, Not};

/// Ordered boolean map over the states `0..len`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StateSet {
    bits: BitSet,
    len: usize,
}

impl StateSet {
    /// Create a set over `len` states with every bit set to `value`
    pub fn new(len: usize, value: bool) -> Self {
        let mut set = Self {
            bits: BitSet::with_capacity(len),
            len,
        };
        if value {
            set.complement();
        }
        set
    }

    /// Set over `len` states with no member
    pub fn empty(len: usize) -> Self {
        Self::new(len, false)
    }

    /// Set over `len` states containing all of them
    pub fn full(len: usize) -> Self {
        Self::new(len, true)
    }

    /// Build a set from member indices
    ///
    /// # Panics
    /// Panics if an index is not below `len`.
    pub fn from_indices<I: IntoIterator<Item = usize>>(len: usize, indices: I) -> Self {
        let mut set = Self::empty(len);
        for index in indices {
            set.set(index, true);
        }
        set
    }

    /// Size of the universe
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the universe is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of members
    pub fn count(&self) -> usize {
        self.bits.len()
    }

    /// Whether no state is a member
    pub fn none(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether `index` is a member; indices outside the universe are not
    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.bits.contains(index)
    }

    /// Add or remove `index`
    ///
    /// # Panics
    /// Panics if `index` is not below the universe size.
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(
            index < self.len,
            "state {index} outside of universe of size {}",
            self.len
        );
        if value {
            self.bits.insert(index);
        } else {
            self.bits.remove(index);
        }
    }

    /// Intersect in place
    pub fn and_assign(&mut self, other: &StateSet) {
        debug_assert_eq!(self.len, other.len, "state sets over different universes");
        self.bits.intersect_with(&other.bits);
    }

    /// Union in place
    pub fn or_assign(&mut self, other: &StateSet) {
        debug_assert_eq!(self.len, other.len, "state sets over different universes");
        self.bits.union_with(&other.bits);
    }

    /// Complement in place with respect to the universe
    pub fn complement(&mut self) {
        let mut bit_vec = std::mem::take(&mut self.bits).into_bit_vec();
        bit_vec.negate();
        self.bits = BitSet::from_bit_vec(bit_vec);
    }

    /// Iterate over members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter()
    }
}

impl BitAndAssign<&StateSet> for StateSet {
    fn bitand_assign(&mut self, rhs: &StateSet) {
        self.and_assign(rhs);
    }
}

impl BitOrAssign<&StateSet> for StateSet {
    fn bitor_assign(&mut self, rhs: &StateSet) {
        self.or_assign(rhs);
    }
}

impl Not for StateSet {
    type Output = StateSet;

    fn not(mut self) -> StateSet {
        self.complement();
        self
    }
}

impl std::fmt::Display for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for index in 0..self.len {
            write!(f, "{}", if self.get(index) { '1' } else { '0' })?;
        }
        Ok(())
    }
}
