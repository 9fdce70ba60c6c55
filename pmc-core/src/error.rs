//! Error types for matrix construction and mutation

/// Matrix dimension named in a size error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Rows,
    Columns,
    Entries,
    RowGroups,
}

impl core::fmt::Display for Dimension {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Dimension::Rows => write!(f, "rows"),
            Dimension::Columns => write!(f, "columns"),
            Dimension::Entries => write!(f, "entries"),
            Dimension::RowGroups => write!(f, "row groups"),
        }
    }
}

/// Errors that can occur while building or mutating a sparse matrix
///
/// All of these are programmer or input errors. They abort the operation
/// in progress and are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixError {
    /// An entry was added behind the last inserted position
    OutOfOrderInsertion {
        row: usize,
        column: usize,
        last_row: usize,
        last_column: usize,
    },
    /// A forced-dimension builder received an index or count beyond its bound
    DimensionExceeded {
        dimension: Dimension,
        value: usize,
        bound: usize,
    },
    /// A forced-dimension builder finished with counts other than declared
    DimensionMismatch {
        dimension: Dimension,
        expected: usize,
        actual: usize,
    },
    /// Row groups were requested from a builder without custom grouping
    GroupingNotEnabled,
    /// A row group started before the previous one
    NonMonotonicGroup { starting_row: usize, previous: usize },
    /// A row group has no entry in its diagonal column
    MissingDiagonalEntry { group: usize },
    /// Operation requires a square matrix
    NonSquareMatrix { rows: usize, columns: usize },
    /// Row has no entry that could be rewritten
    EmptyRow { row: usize },
}

impl core::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatrixError::OutOfOrderInsertion {
                row,
                column,
                last_row,
                last_column,
            } => write!(
                f,
                "Out-of-order insertion at ({row}, {column}) after ({last_row}, {last_column})"
            ),
            MatrixError::DimensionExceeded {
                dimension,
                value,
                bound,
            } => write!(f, "Index {value} exceeds declared {dimension} bound {bound}"),
            MatrixError::DimensionMismatch {
                dimension,
                expected,
                actual,
            } => write!(f, "Expected {expected} {dimension}, but got {actual}"),
            MatrixError::GroupingNotEnabled => {
                write!(f, "Matrix was not created to have a custom row grouping")
            }
            MatrixError::NonMonotonicGroup {
                starting_row,
                previous,
            } => write!(
                f,
                "Row group starting at row {starting_row} precedes previous group start {previous}"
            ),
            MatrixError::MissingDiagonalEntry { group } => {
                write!(f, "Row group {group} has no diagonal entry")
            }
            MatrixError::NonSquareMatrix { rows, columns } => {
                write!(f, "Matrix is non-square ({rows}x{columns})")
            }
            MatrixError::EmptyRow { row } => write!(f, "Row {row} has no entries"),
        }
    }
}

impl core::error::Error for MatrixError {}

/// Result type for matrix operations
pub type Result<T> = core::result::Result<T, MatrixError>;
