//! Incremental construction of compressed row matrices
//!
//! The builder accepts entries strictly in row-major order with ascending
//! columns inside a row, back-filling the row-start table as rows are
//! skipped. It is consumed by [`MatrixBuilder::build`].

use pmc_core::{Dimension, MatrixEntry, MatrixError, Result, Weight};
use tracing::debug;

use super::SparseMatrix;

/// Single-use accumulator producing a [`SparseMatrix`]
#[derive(Debug, Clone)]
pub struct MatrixBuilder<V> {
    declared_rows: Option<usize>,
    declared_columns: Option<usize>,
    declared_entries: Option<usize>,
    declared_row_groups: Option<usize>,
    force_dimensions: bool,
    custom_row_grouping: bool,

    entries: Vec<MatrixEntry<V>>,
    row_start: Vec<usize>,
    row_group_start: Vec<usize>,

    last_row: usize,
    last_column: usize,
    highest_column: Option<usize>,
}

impl<V: Weight> MatrixBuilder<V> {
    /// Create a builder without declared dimensions
    pub fn new() -> Self {
        Self {
            declared_rows: None,
            declared_columns: None,
            declared_entries: None,
            declared_row_groups: None,
            force_dimensions: false,
            custom_row_grouping: false,
            entries: Vec::new(),
            row_start: Vec::new(),
            row_group_start: Vec::new(),
            last_row: 0,
            last_column: 0,
            highest_column: None,
        }
    }

    /// Declare the expected matrix size
    ///
    /// Declared rows and columns act as minimums for the built matrix and all
    /// three counts reserve capacity up front. A zero leaves that count open.
    pub fn with_dimensions(mut self, rows: usize, columns: usize, entries: usize) -> Self {
        self.declared_rows = (rows != 0).then_some(rows);
        self.declared_columns = (columns != 0).then_some(columns);
        self.declared_entries = (entries != 0).then_some(entries);

        if let Some(rows) = self.declared_rows {
            self.row_start.reserve(rows + 1);
        }
        if let Some(entries) = self.declared_entries {
            self.entries.reserve(entries);
        }
        self
    }

    /// Treat the declared dimensions as hard bounds
    pub fn force_dimensions(mut self) -> Self {
        self.force_dimensions = true;
        self
    }

    /// Allow rows to be partitioned with [`MatrixBuilder::new_row_group`]
    pub fn with_custom_row_grouping(mut self) -> Self {
        self.custom_row_grouping = true;
        self
    }

    /// Declare the expected number of row groups
    pub fn with_row_group_count(mut self, row_groups: usize) -> Self {
        self.declared_row_groups = (row_groups != 0).then_some(row_groups);
        if let Some(row_groups) = self.declared_row_groups {
            self.row_group_start.reserve(row_groups + 1);
        }
        self
    }

    /// Number of entries added so far
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Append the next entry
    ///
    /// Entries must arrive with non-decreasing rows and, within a row,
    /// non-decreasing columns. Skipped rows become empty rows.
    pub fn add_next_value(&mut self, row: usize, column: usize, value: V) -> Result<()> {
        if !self.entries.is_empty()
            && (row < self.last_row || (row == self.last_row && column < self.last_column))
        {
            return Err(MatrixError::OutOfOrderInsertion {
                row,
                column,
                last_row: self.last_row,
                last_column: self.last_column,
            });
        }

        if self.force_dimensions {
            check_bound(Dimension::Rows, row, self.declared_rows)?;
            check_bound(Dimension::Columns, column, self.declared_columns)?;
            if let Some(bound) = self.declared_entries {
                if self.entries.len() >= bound {
                    return Err(MatrixError::DimensionExceeded {
                        dimension: Dimension::Entries,
                        value: self.entries.len() + 1,
                        bound,
                    });
                }
            }
        }

        // Back-fill starts for every row up to and including this one.
        while self.row_start.len() <= row {
            self.row_start.push(self.entries.len());
        }

        self.last_row = row;
        self.last_column = column;
        self.highest_column = Some(self.highest_column.map_or(column, |c| c.max(column)));
        self.entries.push(MatrixEntry::new(column, value));
        Ok(())
    }

    /// Start a new row group at `starting_row`
    pub fn new_row_group(&mut self, starting_row: usize) -> Result<()> {
        if !self.custom_row_grouping {
            return Err(MatrixError::GroupingNotEnabled);
        }
        if let Some(&previous) = self.row_group_start.last() {
            if starting_row < previous {
                return Err(MatrixError::NonMonotonicGroup {
                    starting_row,
                    previous,
                });
            }
        }
        self.row_group_start.push(starting_row);
        Ok(())
    }

    /// Finish the matrix using the declared dimensions
    pub fn build(self) -> Result<SparseMatrix<V>> {
        self.build_with_overrides(None, None, None)
    }

    /// Finish the matrix, padding to at least the given counts
    pub fn build_with_overrides(
        mut self,
        row_count: Option<usize>,
        column_count: Option<usize>,
        row_group_count: Option<usize>,
    ) -> Result<SparseMatrix<V>> {
        let observed_rows = if self.entries.is_empty() {
            0
        } else {
            self.last_row + 1
        };
        let row_count = self
            .finalize_count(Dimension::Rows, observed_rows, self.declared_rows)?
            .max(row_count.unwrap_or(0));

        // Trailing empty rows, then the sentinel.
        while self.row_start.len() < row_count {
            self.row_start.push(self.entries.len());
        }
        self.row_start.push(self.entries.len());

        let observed_columns = self.highest_column.map_or(0, |c| c + 1);
        let column_count = self
            .finalize_count(Dimension::Columns, observed_columns, self.declared_columns)?
            .max(column_count.unwrap_or(0));

        if self.force_dimensions {
            if let Some(expected) = self.declared_entries {
                if self.entries.len() != expected {
                    return Err(MatrixError::DimensionMismatch {
                        dimension: Dimension::Entries,
                        expected,
                        actual: self.entries.len(),
                    });
                }
            }
        }

        if self.custom_row_grouping {
            match self.row_group_start.first() {
                None if row_count == 0 => {}
                None => self.row_group_start.push(0),
                Some(&first) if first != 0 => {
                    return Err(MatrixError::NonMonotonicGroup {
                        starting_row: first,
                        previous: 0,
                    })
                }
                Some(_) => {}
            }
            // Starts are non-decreasing, so only the last one can overshoot.
            if let Some(&last) = self.row_group_start.last() {
                if last > row_count {
                    return Err(MatrixError::DimensionExceeded {
                        dimension: Dimension::Rows,
                        value: last,
                        bound: row_count,
                    });
                }
            }
            let observed_groups = self.row_group_start.len();
            let group_count = self
                .finalize_count(
                    Dimension::RowGroups,
                    observed_groups,
                    self.declared_row_groups,
                )?
                .max(row_group_count.unwrap_or(0));
            while self.row_group_start.len() <= group_count {
                self.row_group_start.push(row_count);
            }
        } else {
            self.row_group_start = (0..=row_count).collect();
        }

        debug!(
            rows = row_count,
            columns = column_count,
            entries = self.entries.len(),
            row_groups = self.row_group_start.len() - 1,
            "built sparse matrix"
        );

        Ok(SparseMatrix::from_parts(
            column_count,
            self.row_start,
            self.entries,
            self.row_group_start,
        ))
    }

    /// Reconcile an observed count with its declaration
    fn finalize_count(
        &self,
        dimension: Dimension,
        observed: usize,
        declared: Option<usize>,
    ) -> Result<usize> {
        match declared {
            Some(expected) if self.force_dimensions && observed > expected => {
                Err(MatrixError::DimensionMismatch {
                    dimension,
                    expected,
                    actual: observed,
                })
            }
            Some(declared) => Ok(observed.max(declared)),
            None => Ok(observed),
        }
    }
}

impl<V: Weight> Default for MatrixBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_bound(dimension: Dimension, value: usize, bound: Option<usize>) -> Result<()> {
    match bound {
        Some(bound) if value >= bound => Err(MatrixError::DimensionExceeded {
            dimension,
            value,
            bound,
        }),
        _ => Ok(()),
    }
}
