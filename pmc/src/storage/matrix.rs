//! Compressed row storage with row groups
//!
//! A [`SparseMatrix`] stores all entries in one flat sequence, locates each
//! row through a row-start offset table and partitions rows into groups,
//! where a group collects the nondeterministic choices of one state.

use std::fmt;
use std::hash::Hasher;

use pmc_core::{Fnv1a, MatrixEntry, Weight};

use super::StateSet;

/// Immutable-layout sparse matrix in compressed row form
#[derive(Debug, Clone)]
pub struct SparseMatrix<V> {
    pub(super) column_count: usize,
    pub(super) nonzero_entry_count: usize,
    pub(super) entries: Vec<MatrixEntry<V>>,
    /// `row_count + 1` offsets; the last one equals `entries.len()`
    pub(super) row_start: Vec<usize>,
    /// `row_group_count + 1` row indices; first is 0, last is `row_count`
    pub(super) row_group_start: Vec<usize>,
}

impl<V: Weight> SparseMatrix<V> {
    /// Assemble a matrix from finished tables
    pub(super) fn from_parts(
        column_count: usize,
        row_start: Vec<usize>,
        entries: Vec<MatrixEntry<V>>,
        row_group_start: Vec<usize>,
    ) -> Self {
        debug_assert_eq!(row_start.last().copied(), Some(entries.len()));
        debug_assert_eq!(row_group_start.first().copied(), Some(0));
        debug_assert_eq!(row_group_start.last().copied(), Some(row_start.len() - 1));

        let mut matrix = Self {
            column_count,
            nonzero_entry_count: 0,
            entries,
            row_start,
            row_group_start,
        };
        matrix.update_nonzero_entry_count();
        matrix
    }

    pub(super) fn update_nonzero_entry_count(&mut self) {
        self.nonzero_entry_count = self.entries.iter().filter(|e| !e.is_zero()).count();
    }

    pub fn row_count(&self) -> usize {
        self.row_start.len() - 1
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Number of stored entries, explicit zeros included
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn nonzero_entry_count(&self) -> usize {
        self.nonzero_entry_count
    }

    pub fn row_group_count(&self) -> usize {
        self.row_group_start.len() - 1
    }

    /// Number of rows in `group`
    pub fn row_group_size(&self, group: usize) -> usize {
        self.row_group_start[group + 1] - self.row_group_start[group]
    }

    /// Row-group boundaries, `row_group_count + 1` long
    pub fn row_group_indices(&self) -> &[usize] {
        &self.row_group_start
    }

    /// Whether every group holds exactly one row
    pub fn has_trivial_row_grouping(&self) -> bool {
        self.row_group_count() == self.row_count()
    }

    pub fn is_square(&self) -> bool {
        self.row_count() == self.column_count
    }

    /// Entries of `row` in ascending column order
    pub fn get_row(&self, row: usize) -> &[MatrixEntry<V>] {
        &self.entries[self.row_start[row]..self.row_start[row + 1]]
    }

    /// Entries of the rows `start..end`, back to back
    pub fn get_rows(&self, start: usize, end: usize) -> &[MatrixEntry<V>] {
        &self.entries[self.row_start[start]..self.row_start[end]]
    }

    /// Entries of every row in `group`
    pub fn get_row_group(&self, group: usize) -> &[MatrixEntry<V>] {
        self.get_rows(self.row_group_start[group], self.row_group_start[group + 1])
    }

    pub(super) fn get_row_mut(&mut self, row: usize) -> &mut [MatrixEntry<V>] {
        &mut self.entries[self.row_start[row]..self.row_start[row + 1]]
    }

    /// Iterate over `(row, entries)` pairs
    pub fn rows(&self) -> Rows<'_, V> {
        Rows {
            matrix: self,
            current_row: 0,
            total_rows: self.row_count(),
        }
    }

    /// Value of the first entry at `(row, column)`, if one is stored
    pub fn get_element(&self, row: usize, column: usize) -> Option<V> {
        let entries = self.get_row(row);
        let position = entries.partition_point(|e| e.column() < column);
        entries
            .get(position)
            .filter(|e| e.column() == column)
            .map(MatrixEntry::value)
    }

    /// Sum of all values in `row`
    pub fn row_sum(&self, row: usize) -> V {
        self.get_row(row)
            .iter()
            .fold(V::zero(), |sum, e| sum + e.value())
    }

    /// Sum of the values in `row` whose column is in `columns`
    pub fn get_constrained_row_sum(&self, row: usize, columns: &StateSet) -> V {
        self.get_row(row)
            .iter()
            .filter(|e| columns.get(e.column()))
            .fold(V::zero(), |sum, e| sum + e.value())
    }

    /// Constrained sums for every row in `rows`, in ascending row order
    pub fn get_constrained_row_sum_vector(&self, rows: &StateSet, columns: &StateSet) -> Vec<V> {
        rows.iter()
            .map(|row| self.get_constrained_row_sum(row, columns))
            .collect()
    }

    /// Constrained sums for every row of every group in `groups`
    pub fn get_constrained_row_group_sum_vector(
        &self,
        groups: &StateSet,
        columns: &StateSet,
    ) -> Vec<V> {
        groups
            .iter()
            .flat_map(|group| self.row_group_start[group]..self.row_group_start[group + 1])
            .map(|row| self.get_constrained_row_sum(row, columns))
            .collect()
    }

    /// Whether every entry position of `self` also holds an entry in `other`
    ///
    /// Dimensions and row grouping must agree as well.
    pub fn is_submatrix_of(&self, other: &SparseMatrix<V>) -> bool {
        if self.row_count() != other.row_count()
            || self.column_count != other.column_count
            || self.row_group_start != other.row_group_start
        {
            return false;
        }

        (0..self.row_count()).all(|row| {
            let mut candidates = other.get_row(row).iter().map(MatrixEntry::column).peekable();
            self.get_row(row).iter().all(|entry| {
                while candidates.next_if(|&c| c < entry.column()).is_some() {}
                candidates.peek() == Some(&entry.column())
            })
        })
    }

    /// Per-row sums of `self[r][c] * other[r][c]` over shared positions
    ///
    /// Expects `other.is_submatrix_of(self)`; this is not checked.
    pub fn get_pointwise_product_row_sum_vector(&self, other: &SparseMatrix<V>) -> Vec<V> {
        (0..self.row_count())
            .map(|row| {
                let mut sum = V::zero();
                let mut mine = self.get_row(row).iter().peekable();
                for theirs in other.get_row(row) {
                    while mine.next_if(|e| e.column() < theirs.column()).is_some() {}
                    if let Some(entry) = mine.peek() {
                        if entry.column() == theirs.column() {
                            sum += entry.value() * theirs.value();
                        }
                    }
                }
                sum
            })
            .collect()
    }

    /// Approximate heap and inline footprint in bytes
    pub fn size_in_memory(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.entries.capacity() * std::mem::size_of::<MatrixEntry<V>>()
            + (self.row_start.capacity() + self.row_group_start.capacity())
                * std::mem::size_of::<usize>()
    }

    /// Hash of the dimensions and the raw entry, row and group tables
    ///
    /// Unlike equality this distinguishes explicit zeros from absent entries.
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = Fnv1a::new();
        hasher.write_usize(self.row_count());
        hasher.write_usize(self.column_count);
        hasher.write_usize(self.entries.len());
        for &start in self.row_start.iter().chain(&self.row_group_start) {
            hasher.write_usize(start);
        }
        for entry in &self.entries {
            hasher.write_usize(entry.column());
            hasher.write(bytemuck::bytes_of(&entry.value()));
        }
        hasher.finish()
    }
}

impl<V: Weight> PartialEq for SparseMatrix<V> {
    fn eq(&self, other: &Self) -> bool {
        if self.row_count() != other.row_count()
            || self.column_count != other.column_count
            || self.row_group_start != other.row_group_start
        {
            return false;
        }

        (0..self.row_count()).all(|row| {
            let left = self.get_row(row).iter().filter(|e| !e.is_zero());
            let right = other.get_row(row).iter().filter(|e| !e.is_zero());
            left.map(MatrixEntry::as_pair).eq(right.map(MatrixEntry::as_pair))
        })
    }
}

impl<V: Weight> fmt::Display for SparseMatrix<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = self.row_group_count();
        for group in 0..groups {
            writeln!(f, "\t---- group {}/{} ----", group, groups.saturating_sub(1))?;
            for row in self.row_group_start[group]..self.row_group_start[group + 1] {
                write!(f, "{row}\t(")?;
                let mut entries = self.get_row(row).iter().peekable();
                for column in 0..self.column_count {
                    let mut value = V::zero();
                    while let Some(entry) = entries.next_if(|e| e.column() == column) {
                        value += entry.value();
                    }
                    write!(f, "\t{value}")?;
                }
                writeln!(f, "\t)")?;
            }
        }
        Ok(())
    }
}

/// Iterator over the rows of a [`SparseMatrix`]
pub struct Rows<'a, V> {
    matrix: &'a SparseMatrix<V>,
    current_row: usize,
    total_rows: usize,
}

impl<'a, V: Weight> Iterator for Rows<'a, V> {
    type Item = (usize, &'a [MatrixEntry<V>]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.total_rows {
            return None;
        }

        let row = self.current_row;
        self.current_row += 1;
        Some((row, self.matrix.get_row(row)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_rows - self.current_row;
        (remaining, Some(remaining))
    }
}

impl<V: Weight> ExactSizeIterator for Rows<'_, V> {}
