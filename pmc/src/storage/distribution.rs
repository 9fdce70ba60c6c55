//! Sparse probability distributions over successor states
//!
//! A [`Distribution`] keeps its entries sorted by state and maintains an
//! order-independent hash incrementally, so that model-construction code can
//! deduplicate choices cheaply before freezing them into matrix rows.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use pmc_core::{Fnv1a, Result, Weight};

use super::MatrixBuilder;

/// Mapping from state index to probability mass
///
/// Weights are compared exactly; NaN masses are not supported.
#[derive(Debug, Clone)]
pub struct Distribution<V> {
    entries: Vec<(usize, V)>,
    hash: u64,
}

fn entry_hash<V: Weight>(state: usize, probability: V) -> u64 {
    Fnv1a::hash_pair(state, bytemuck::bytes_of(&probability))
}

impl<V: Weight> Distribution<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            hash: 0,
        }
    }

    /// Number of states carrying mass
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Probability of `state`, if it carries any
    pub fn get(&self, state: usize) -> Option<V> {
        self.position(state).ok().map(|i| self.entries[i].1)
    }

    /// Iterate over `(state, probability)` in ascending state order
    pub fn iter(&self) -> impl Iterator<Item = (usize, V)> + '_ {
        self.entries.iter().copied()
    }

    /// Hash of the current contents
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Add `probability` to the mass of `state`
    ///
    /// Adding zero to a state without mass is a no-op. A state whose mass
    /// becomes exactly zero is removed.
    pub fn add_probability(&mut self, state: usize, probability: V) {
        match self.position(state) {
            Ok(index) => {
                let current = self.entries[index].1;
                self.replace(index, current + probability);
            }
            Err(index) => {
                if !probability.is_zero() {
                    self.entries.insert(index, (state, probability));
                    self.hash ^= entry_hash(state, probability);
                }
            }
        }
    }

    /// Take `probability` away from `state`
    ///
    /// States without mass are left alone. A state drained to exactly zero
    /// is removed.
    pub fn remove_probability(&mut self, state: usize, probability: V) {
        if let Ok(index) = self.position(state) {
            let current = self.entries[index].1;
            self.replace(index, current - probability);
        }
    }

    /// Move `probability` from `from` to `to`
    pub fn shift_probability(&mut self, from: usize, to: usize, probability: V) {
        self.remove_probability(from, probability);
        self.add_probability(to, probability);
    }

    /// Drop `state` and divide every other mass by its probability
    ///
    /// Does nothing if `state` carries no mass.
    pub fn scale(&mut self, state: usize) {
        let Ok(index) = self.position(state) else {
            return;
        };
        let (_, factor) = self.entries.remove(index);
        for (_, probability) in &mut self.entries {
            *probability = *probability / factor;
        }
        self.rehash();
    }

    /// Write the distribution as `row` of `builder`
    pub fn append_to_row(&self, builder: &mut MatrixBuilder<V>, row: usize) -> Result<()> {
        for &(state, probability) in &self.entries {
            builder.add_next_value(row, state, probability)?;
        }
        Ok(())
    }

    fn position(&self, state: usize) -> std::result::Result<usize, usize> {
        self.entries.binary_search_by_key(&state, |&(s, _)| s)
    }

    fn replace(&mut self, index: usize, probability: V) {
        let (state, old) = self.entries[index];
        self.hash ^= entry_hash(state, old);
        if probability.is_zero() {
            self.entries.remove(index);
        } else {
            self.entries[index].1 = probability;
            self.hash ^= entry_hash(state, probability);
        }
    }

    fn rehash(&mut self) {
        self.hash = self
            .entries
            .iter()
            .fold(0, |hash, &(state, p)| hash ^ entry_hash(state, p));
    }
}

impl<V: Weight> Default for Distribution<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Weight> FromIterator<(usize, V)> for Distribution<V> {
    fn from_iter<I: IntoIterator<Item = (usize, V)>>(iter: I) -> Self {
        let mut distribution = Self::new();
        for (state, probability) in iter {
            distribution.add_probability(state, probability);
        }
        distribution
    }
}

impl<V: Weight> PartialEq for Distribution<V> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.entries == other.entries
    }
}

impl<V: Weight> Eq for Distribution<V> {}

impl<V: Weight> Hash for Distribution<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// Distributions with fewer states order first, then entries compare
/// lexicographically by state and probability.
impl<V: Weight> PartialOrd for Distribution<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.len().cmp(&other.len()) {
            Ordering::Equal => {}
            unequal => return Some(unequal),
        }
        for (&(left_state, left), &(right_state, right)) in self.entries.iter().zip(&other.entries)
        {
            match left_state.cmp(&right_state) {
                Ordering::Equal => {}
                unequal => return Some(unequal),
            }
            match left.partial_cmp(&right)? {
                Ordering::Equal => {}
                unequal => return Some(unequal),
            }
        }
        Some(Ordering::Equal)
    }
}

impl<V: Weight> fmt::Display for Distribution<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (state, probability)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{state}: {probability}")?;
        }
        write!(f, "}}")
    }
}
