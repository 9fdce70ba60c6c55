//! Structural transforms and in-place algebraic rewrites
//!
//! Transforms that change the layout (submatrix extraction, row selection,
//! transposition) return a new matrix. Rewrites that only touch values and
//! columns mutate in place, validate before the first write and keep the
//! non-zero count current.

use std::ops::Range;

use pmc_core::{Dimension, MatrixEntry, MatrixError, Result, Weight};
use tracing::debug;

use super::{MatrixBuilder, SparseMatrix, StateSet};

impl<V: Weight> SparseMatrix<V> {
    fn group_rows(&self, group: usize) -> Range<usize> {
        self.row_group_start[group]..self.row_group_start[group + 1]
    }

    /// Positions in `entries` covered by the rows of `group`
    fn group_entry_range(&self, group: usize) -> Range<usize> {
        let rows = self.group_rows(group);
        self.row_start[rows.start]..self.row_start[rows.end]
    }

    /// Restrict the matrix to selected rows (or row groups) and columns
    ///
    /// Surviving columns are renumbered by their rank among the selected
    /// columns. With `insert_diagonal`, every selected row lacking an entry in
    /// its diagonal column receives an explicit zero there, and the selected
    /// row (or group) indices take part in the renumbering as well.
    pub fn get_submatrix(
        &self,
        row_set: &StateSet,
        column_set: &StateSet,
        use_groups: bool,
        insert_diagonal: bool,
    ) -> Result<SparseMatrix<V>> {
        let trivial: Vec<usize>;
        let groups: &[usize] = if use_groups {
            &self.row_group_start
        } else {
            trivial = (0..=self.row_count()).collect();
            &trivial
        };

        let mut sub_rows = 0;
        let mut sub_entries = 0;
        for index in row_set.iter() {
            for row in groups[index]..groups[index + 1] {
                sub_rows += 1;
                let mut found_diagonal = false;
                for entry in self.get_row(row) {
                    if column_set.get(entry.column()) {
                        sub_entries += 1;
                        found_diagonal |= entry.column() == index;
                    }
                }
                if insert_diagonal && !found_diagonal {
                    sub_entries += 1;
                }
            }
        }

        // Rank of every index among the counted columns.
        let universe = self.column_count.max(row_set.len());
        let mut rank = Vec::with_capacity(universe);
        let mut counted = 0;
        for index in 0..universe {
            rank.push(counted);
            if column_set.get(index) || (insert_diagonal && row_set.get(index)) {
                counted += 1;
            }
        }

        let mut builder = MatrixBuilder::new()
            .with_dimensions(sub_rows, column_set.count(), sub_entries)
            .with_custom_row_grouping()
            .with_row_group_count(row_set.count());

        let mut current_row = 0;
        for index in row_set.iter() {
            builder.new_row_group(current_row)?;
            for row in groups[index]..groups[index + 1] {
                let mut diagonal_done = false;
                for entry in self.get_row(row) {
                    let column = entry.column();
                    if !column_set.get(column) {
                        continue;
                    }
                    if column == index {
                        diagonal_done = true;
                    } else if insert_diagonal && !diagonal_done && column > index {
                        builder.add_next_value(current_row, rank[index], V::zero())?;
                        diagonal_done = true;
                    }
                    builder.add_next_value(current_row, rank[column], entry.value())?;
                }
                if insert_diagonal && !diagonal_done {
                    builder.add_next_value(current_row, rank[index], V::zero())?;
                }
                current_row += 1;
            }
        }

        debug!(
            selected = row_set.count(),
            rows = sub_rows,
            entries = sub_entries,
            "extracting submatrix"
        );
        builder.build_with_overrides(Some(sub_rows), None, Some(row_set.count()))
    }

    /// Keep one row per row group
    ///
    /// Row `g` of the result is row `choices[g]` within group `g` of `self`.
    /// With `insert_diagonal`, a missing `(g, g)` entry becomes an explicit zero.
    pub fn select_rows_from_row_groups(
        &self,
        choices: &[usize],
        insert_diagonal: bool,
    ) -> Result<SparseMatrix<V>> {
        let group_count = self.row_group_count();
        if choices.len() != group_count {
            return Err(MatrixError::DimensionMismatch {
                dimension: Dimension::RowGroups,
                expected: group_count,
                actual: choices.len(),
            });
        }
        if let Some((group, &choice)) = choices
            .iter()
            .enumerate()
            .find(|&(group, &choice)| choice >= self.row_group_size(group))
        {
            return Err(MatrixError::DimensionExceeded {
                dimension: Dimension::Rows,
                value: choice,
                bound: self.row_group_size(group),
            });
        }

        let selected: Vec<&[MatrixEntry<V>]> = choices
            .iter()
            .enumerate()
            .map(|(group, &choice)| self.get_row(self.row_group_start[group] + choice))
            .collect();

        let sub_entries = selected
            .iter()
            .enumerate()
            .map(|(group, row)| {
                let has_diagonal = row.iter().any(|e| e.column() == group);
                row.len() + usize::from(insert_diagonal && !has_diagonal)
            })
            .sum();

        let mut builder =
            MatrixBuilder::new().with_dimensions(group_count, self.column_count, sub_entries);
        for (group, row) in selected.into_iter().enumerate() {
            let mut diagonal_done = false;
            for entry in row {
                if entry.column() == group {
                    diagonal_done = true;
                } else if insert_diagonal && !diagonal_done && entry.column() > group {
                    builder.add_next_value(group, group, V::zero())?;
                    diagonal_done = true;
                }
                builder.add_next_value(group, entry.column(), entry.value())?;
            }
            if insert_diagonal && !diagonal_done {
                builder.add_next_value(group, group, V::zero())?;
            }
        }

        builder.build_with_overrides(Some(group_count), None, None)
    }

    /// Transpose, keeping only non-zero entries
    ///
    /// With `join_groups`, each row group of `self` becomes one column of the
    /// result. The result always has trivial row grouping.
    pub fn transpose(&self, join_groups: bool) -> SparseMatrix<V> {
        let row_count = self.column_count;
        let column_count = if join_groups {
            self.row_group_count()
        } else {
            self.row_count()
        };
        let source_range = |source: usize| {
            if join_groups {
                self.group_entry_range(source)
            } else {
                self.row_start[source]..self.row_start[source + 1]
            }
        };

        // Pass 1: count entries per destination row.
        let mut row_start = vec![0usize; row_count + 1];
        for source in 0..column_count {
            for entry in &self.entries[source_range(source)] {
                if !entry.is_zero() {
                    row_start[entry.column() + 1] += 1;
                }
            }
        }
        for row in 1..=row_count {
            row_start[row] += row_start[row - 1];
        }

        // Pass 2: place entries at running offsets.
        let mut entries = vec![MatrixEntry::new(0, V::zero()); row_start[row_count]];
        let mut next = row_start.clone();
        for source in 0..column_count {
            for entry in &self.entries[source_range(source)] {
                if !entry.is_zero() {
                    let slot = &mut next[entry.column()];
                    entries[*slot] = MatrixEntry::new(source, entry.value());
                    *slot += 1;
                }
            }
        }

        debug!(
            rows = row_count,
            columns = column_count,
            entries = entries.len(),
            join_groups,
            "transposed matrix"
        );
        SparseMatrix::from_parts(column_count, row_start, entries, (0..=row_count).collect())
    }

    /// Replace every diagonal value `v` by `1 - v`
    ///
    /// Fails without modifying anything if a row group has no diagonal entry.
    pub fn invert_diagonal(&mut self) -> Result<()> {
        self.require_diagonal_entries()?;
        for group in 0..self.row_group_count() {
            let range = self.group_entry_range(group);
            for entry in &mut self.entries[range] {
                if entry.column() == group {
                    entry.set_value(V::one() - entry.value());
                }
            }
        }
        self.update_nonzero_entry_count();
        Ok(())
    }

    /// Negate every entry off the group diagonal
    pub fn negate_non_diagonal(&mut self) {
        for group in 0..self.row_group_count() {
            let range = self.group_entry_range(group);
            for entry in &mut self.entries[range] {
                if entry.column() != group {
                    entry.set_value(-entry.value());
                }
            }
        }
        self.update_nonzero_entry_count();
    }

    /// Turn `P` into `I - P` in place
    pub fn convert_to_equation_system(&mut self) -> Result<()> {
        self.invert_diagonal()?;
        self.negate_non_diagonal();
        Ok(())
    }

    /// Set every diagonal value to zero, keeping the entries
    pub fn delete_diagonal_entries(&mut self) {
        for group in 0..self.row_group_count() {
            let range = self.group_entry_range(group);
            for entry in &mut self.entries[range] {
                if entry.column() == group {
                    entry.set_value(V::zero());
                }
            }
        }
        self.update_nonzero_entry_count();
    }

    /// Split into the off-diagonal part and the inverted diagonal
    ///
    /// Returns `(L + U, D^-1)`. Coincident diagonal entries of a row are summed
    /// before inverting.
    pub fn get_jacobi_decomposition(&self) -> Result<(SparseMatrix<V>, SparseMatrix<V>)> {
        if !self.is_square() {
            return Err(MatrixError::NonSquareMatrix {
                rows: self.row_count(),
                columns: self.column_count,
            });
        }

        let row_count = self.row_count();
        let mut builder = MatrixBuilder::new()
            .with_dimensions(row_count, row_count, row_count)
            .force_dimensions();
        for row in 0..row_count {
            let diagonal = self
                .get_row(row)
                .iter()
                .filter(|e| e.column() == row)
                .map(MatrixEntry::value)
                .reduce(|sum, value| sum + value)
                .ok_or(MatrixError::MissingDiagonalEntry { group: row })?;
            builder.add_next_value(row, row, V::one() / diagonal)?;
        }
        let d_inverse = builder.build()?;

        let mut lu = self.clone();
        lu.delete_diagonal_entries();
        Ok((lu, d_inverse))
    }

    /// Make `row` a certain transition to `column`
    ///
    /// The first entry becomes `(column, 1)`; the remaining entries of the row
    /// are kept as zeros in the same column.
    pub fn make_row_dirac(&mut self, row: usize, column: usize) -> Result<()> {
        self.require_column(column)?;
        let entries = self.get_row_mut(row);
        let Some((first, rest)) = entries.split_first_mut() else {
            return Err(MatrixError::EmptyRow { row });
        };
        *first = MatrixEntry::new(column, V::one());
        for entry in rest {
            *entry = MatrixEntry::new(column, V::zero());
        }
        self.update_nonzero_entry_count();
        Ok(())
    }

    /// Turn every row in `rows` into a self-loop
    pub fn make_rows_absorbing(&mut self, rows: &StateSet) -> Result<()> {
        for row in rows.iter() {
            self.require_column(row)?;
            if self.get_row(row).is_empty() {
                return Err(MatrixError::EmptyRow { row });
            }
        }
        for row in rows.iter() {
            self.make_row_dirac(row, row)?;
        }
        Ok(())
    }

    /// Turn every row of every group in `groups` into a loop back to its group
    pub fn make_row_groups_absorbing(&mut self, groups: &StateSet) -> Result<()> {
        for group in groups.iter() {
            self.require_column(group)?;
            if let Some(row) = self.group_rows(group).find(|&row| self.get_row(row).is_empty()) {
                return Err(MatrixError::EmptyRow { row });
            }
        }
        for group in groups.iter() {
            for row in self.group_rows(group) {
                self.make_row_dirac(row, group)?;
            }
        }
        Ok(())
    }

    fn require_column(&self, column: usize) -> Result<()> {
        if column >= self.column_count {
            return Err(MatrixError::DimensionExceeded {
                dimension: Dimension::Columns,
                value: column,
                bound: self.column_count,
            });
        }
        Ok(())
    }

    fn require_diagonal_entries(&self) -> Result<()> {
        match (0..self.row_group_count()).find(|&group| {
            !self.entries[self.group_entry_range(group)]
                .iter()
                .any(|e| e.column() == group)
        }) {
            Some(group) => Err(MatrixError::MissingDiagonalEntry { group }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(entries: &[(usize, usize, f64)]) -> SparseMatrix<f64> {
        let mut builder = MatrixBuilder::new();
        for &(row, column, value) in entries {
            builder.add_next_value(row, column, value).unwrap();
        }
        builder.build().unwrap()
    }

    fn grouped() -> SparseMatrix<f64> {
        // Group 0: rows 0-1, group 1: row 2
        let mut builder = MatrixBuilder::new().with_custom_row_grouping();
        builder.new_row_group(0).unwrap();
        builder.add_next_value(0, 0, 0.5).unwrap();
        builder.add_next_value(0, 1, 0.5).unwrap();
        builder.add_next_value(1, 1, 1.0).unwrap();
        builder.new_row_group(2).unwrap();
        builder.add_next_value(2, 0, 0.2).unwrap();
        builder.add_next_value(2, 1, 0.8).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_submatrix_remaps_columns() {
        let m = matrix(&[
            (0, 0, 0.1),
            (0, 1, 0.2),
            (0, 2, 0.7),
            (1, 1, 1.0),
            (2, 0, 0.5),
            (2, 2, 0.5),
        ]);
        let selection = StateSet::from_indices(3, [0, 2]);
        let sub = m.get_submatrix(&selection, &selection, false, false).unwrap();

        assert_eq!(sub.row_count(), 2);
        assert_eq!(sub.column_count(), 2);
        assert_eq!(
            sub.get_row(0).iter().map(|e| e.as_pair()).collect::<Vec<_>>(),
            vec![(0, 0.1), (1, 0.7)]
        );
        assert_eq!(
            sub.get_row(1).iter().map(|e| e.as_pair()).collect::<Vec<_>>(),
            vec![(0, 0.5), (1, 0.5)]
        );
    }

    #[test]
    fn test_submatrix_inserts_diagonal_before_later_columns() {
        let m = matrix(&[(0, 2, 1.0), (1, 0, 0.5), (1, 2, 0.5), (2, 2, 1.0)]);
        let all = StateSet::full(3);
        let sub = m.get_submatrix(&all, &all, false, true).unwrap();

        assert_eq!(
            sub.get_row(1).iter().map(|e| e.as_pair()).collect::<Vec<_>>(),
            vec![(0, 0.5), (1, 0.0), (2, 0.5)]
        );
        assert_eq!(
            sub.get_row(0).iter().map(|e| e.as_pair()).collect::<Vec<_>>(),
            vec![(0, 0.0), (2, 1.0)]
        );
        assert_eq!(sub.entry_count(), 6);
        assert_eq!(sub.nonzero_entry_count(), 4);
        assert_eq!(sub, m);
    }

    #[test]
    fn test_submatrix_keeps_groups() {
        let m = grouped();
        let groups = StateSet::from_indices(2, [0]);
        let columns = StateSet::full(2);
        let sub = m.get_submatrix(&groups, &columns, true, false).unwrap();

        assert_eq!(sub.row_count(), 2);
        assert_eq!(sub.row_group_indices(), &[0, 2]);
        assert_eq!(sub.row_sum(0), 1.0);
    }

    #[test]
    fn test_select_rows_from_row_groups() {
        let m = grouped();
        let chosen = m.select_rows_from_row_groups(&[1, 0], true).unwrap();

        assert_eq!(chosen.row_count(), 2);
        assert!(chosen.has_trivial_row_grouping());
        assert_eq!(
            chosen.get_row(0).iter().map(|e| e.as_pair()).collect::<Vec<_>>(),
            vec![(0, 0.0), (1, 1.0)]
        );
        assert_eq!(
            chosen.get_row(1).iter().map(|e| e.as_pair()).collect::<Vec<_>>(),
            vec![(0, 0.2), (1, 0.8)]
        );

        assert_eq!(
            m.select_rows_from_row_groups(&[0, 1], false).unwrap_err(),
            MatrixError::DimensionExceeded {
                dimension: Dimension::Rows,
                value: 1,
                bound: 1
            }
        );
        assert!(matches!(
            m.select_rows_from_row_groups(&[0], false),
            Err(MatrixError::DimensionMismatch {
                dimension: Dimension::RowGroups,
                ..
            })
        ));
    }

    #[test]
    fn test_transpose_drops_zeros() {
        let m = matrix(&[(0, 1, 0.5), (0, 2, 0.0), (1, 0, 1.0), (2, 0, 0.3), (2, 2, 0.7)]);
        let t = m.transpose(false);

        assert_eq!(t.entry_count(), t.nonzero_entry_count());
        assert_eq!(t.get_element(0, 1), Some(1.0));
        assert_eq!(t.get_element(0, 2), Some(0.3));
        assert_eq!(t.get_element(1, 0), Some(0.5));
        assert_eq!(t.get_element(2, 0), None);
        assert_eq!(t.transpose(false), m);
    }

    #[test]
    fn test_transpose_joins_groups() {
        let t = grouped().transpose(true);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_count(), 2);
        assert_eq!(
            t.get_row(1).iter().map(|e| e.as_pair()).collect::<Vec<_>>(),
            vec![(0, 0.5), (0, 1.0), (1, 0.8)]
        );
    }

    #[test]
    fn test_equation_system() {
        let mut m = matrix(&[(0, 0, 0.5), (0, 1, 0.5), (1, 1, 1.0)]);
        m.convert_to_equation_system().unwrap();

        assert_eq!(m.get_element(0, 0), Some(0.5));
        assert_eq!(m.get_element(0, 1), Some(-0.5));
        assert_eq!(m.get_element(1, 1), Some(0.0));
        assert_eq!(m.nonzero_entry_count(), 2);
    }

    #[test]
    fn test_invert_diagonal_is_all_or_nothing() {
        let mut m = matrix(&[(0, 0, 0.25), (1, 0, 1.0)]);
        let before = m.clone();
        assert_eq!(
            m.invert_diagonal(),
            Err(MatrixError::MissingDiagonalEntry { group: 1 })
        );
        assert_eq!(m.structural_hash(), before.structural_hash());
    }

    #[test]
    fn test_delete_diagonal_keeps_slots() {
        let mut m = matrix(&[(0, 0, 0.5), (0, 1, 0.5), (1, 1, 1.0)]);
        m.delete_diagonal_entries();
        assert_eq!(m.entry_count(), 3);
        assert_eq!(m.nonzero_entry_count(), 1);
    }

    #[test]
    fn test_jacobi_decomposition() {
        let mut builder = MatrixBuilder::new();
        builder.add_next_value(0, 0, 2.0).unwrap();
        builder.add_next_value(0, 0, 2.0).unwrap();
        builder.add_next_value(0, 1, 1.0).unwrap();
        builder.add_next_value(1, 0, 3.0).unwrap();
        builder.add_next_value(1, 1, 5.0).unwrap();
        let m = builder.build().unwrap();

        let (lu, d_inverse) = m.get_jacobi_decomposition().unwrap();
        assert_eq!(lu.get_element(0, 0), Some(0.0));
        assert_eq!(lu.nonzero_entry_count(), 2);
        assert_eq!(d_inverse.entry_count(), 2);
        assert_eq!(d_inverse.get_element(0, 0), Some(0.25));
        assert_eq!(d_inverse.get_element(1, 1), Some(0.2));
    }

    #[test]
    fn test_jacobi_errors() {
        let wide = matrix(&[(0, 0, 1.0), (0, 1, 1.0)]);
        assert_eq!(
            wide.get_jacobi_decomposition().unwrap_err(),
            MatrixError::NonSquareMatrix {
                rows: 1,
                columns: 2
            }
        );

        let no_diagonal = matrix(&[(0, 0, 1.0), (0, 1, 1.0), (1, 0, 1.0)]);
        assert_eq!(
            no_diagonal.get_jacobi_decomposition().unwrap_err(),
            MatrixError::MissingDiagonalEntry { group: 1 }
        );
    }

    #[test]
    fn test_make_row_dirac() {
        let mut m = matrix(&[(0, 0, 0.2), (0, 1, 0.3), (0, 2, 0.5), (2, 2, 1.0)]);
        m.make_row_dirac(0, 1).unwrap();

        let nonzero: Vec<_> = m.get_row(0).iter().filter(|e| !e.is_zero()).collect();
        assert_eq!(nonzero.len(), 1);
        assert_eq!(nonzero[0].as_pair(), (1, 1.0));
        assert!(m.get_row(0).windows(2).all(|w| w[0].column() <= w[1].column()));

        assert_eq!(m.make_row_dirac(1, 1), Err(MatrixError::EmptyRow { row: 1 }));
    }

    #[test]
    fn test_absorbing_rows_and_groups() {
        let mut m = matrix(&[(0, 1, 1.0), (1, 0, 1.0)]);
        m.make_rows_absorbing(&StateSet::from_indices(2, [1])).unwrap();
        assert_eq!(m.get_element(1, 1), Some(1.0));
        assert_eq!(m.get_element(0, 1), Some(1.0));

        let mut g = grouped();
        g.make_row_groups_absorbing(&StateSet::from_indices(2, [1]))
            .unwrap();
        assert_eq!(g.get_element(2, 1), Some(1.0));
        assert_eq!(g.row_sum(2), 1.0);

        let mut gaps = matrix(&[(0, 0, 1.0), (2, 2, 1.0)]);
        assert_eq!(
            gaps.make_rows_absorbing(&StateSet::full(3)),
            Err(MatrixError::EmptyRow { row: 1 })
        );
        assert_eq!(gaps.get_element(0, 0), Some(1.0));
    }

    #[test]
    fn test_dirac_target_outside_columns() {
        let mut m = matrix(&[(0, 0, 0.5), (0, 1, 0.5), (1, 1, 1.0)]);
        let original = m.clone();
        assert_eq!(
            m.make_row_dirac(0, 99),
            Err(MatrixError::DimensionExceeded {
                dimension: Dimension::Columns,
                value: 99,
                bound: 2
            })
        );
        assert_eq!(m.structural_hash(), original.structural_hash());
        assert_eq!(m.transpose(false).row_count(), 2);
        assert_eq!(m.multiply_with_vector(&[1.0, 1.0]), vec![1.0, 1.0]);

        // Two rows but a single column: row 1 cannot loop to itself
        let mut tall = matrix(&[(0, 0, 1.0), (1, 0, 1.0)]);
        assert!(matches!(
            tall.make_rows_absorbing(&StateSet::full(2)),
            Err(MatrixError::DimensionExceeded { value: 1, bound: 1, .. })
        ));
        assert_eq!(tall.get_element(0, 0), Some(1.0));
        assert_eq!(tall.get_element(1, 0), Some(1.0));
    }
}
