//! Column/value pairs stored in a compressed row

use crate::weight::Weight;

/// One stored entry of a sparse row
///
/// Entries carry no row index; their row is implied by the position in
/// the backing sequence and the row-start table of the owning matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixEntry<V> {
    column: usize,
    value: V,
}

impl<V: Weight> MatrixEntry<V> {
    /// Create a new entry
    pub const fn new(column: usize, value: V) -> Self {
        Self { column, value }
    }

    /// Column index of this entry
    pub fn column(&self) -> usize {
        self.column
    }

    /// Stored value
    pub fn value(&self) -> V {
        self.value
    }

    pub fn set_column(&mut self, column: usize) {
        self.column = column;
    }

    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    /// Whether the stored value is the additive identity
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Get the entry as a `(column, value)` tuple
    pub fn as_pair(&self) -> (usize, V) {
        (self.column, self.value)
    }
}

impl<V: Weight> From<(usize, V)> for MatrixEntry<V> {
    fn from((column, value): (usize, V)) -> Self {
        Self::new(column, value)
    }
}

impl<V: Weight> core::fmt::Display for MatrixEntry<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.column, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accessors() {
        let mut entry = MatrixEntry::new(3, 0.25f64);
        assert_eq!(entry.column(), 3);
        assert_eq!(entry.value(), 0.25);
        assert!(!entry.is_zero());

        entry.set_value(0.0);
        entry.set_column(7);
        assert!(entry.is_zero());
        assert_eq!(entry.as_pair(), (7, 0.0));
    }

    #[test]
    fn test_entry_from_pair() {
        let entry: MatrixEntry<f32> = (2, 5.0).into();
        assert_eq!(entry, MatrixEntry::new(2, 5.0));
    }
}
