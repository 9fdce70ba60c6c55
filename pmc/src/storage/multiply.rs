//! Matrix-vector product kernels
//!
//! Both kernels share [`row_dot`], which sums a row in ascending column
//! order, so the sequential and parallel results are bit-identical.

use pmc_core::{MatrixEntry, Weight};
use rayon::prelude::*;
use tracing::trace;

use super::SparseMatrix;
use crate::config::MultiplyConfig;

#[inline]
fn row_dot<V: Weight>(entries: &[MatrixEntry<V>], vector: &[V]) -> V {
    entries
        .iter()
        .fold(V::zero(), |sum, e| sum + e.value() * vector[e.column()])
}

impl<V: Weight> SparseMatrix<V> {
    /// Compute `self * vector`, one value per row
    ///
    /// Uses the parallel kernel once the non-zero count exceeds the default
    /// threshold of [`MultiplyConfig`].
    ///
    /// # Panics
    /// Panics if `vector` is shorter than the column count.
    pub fn multiply_with_vector(&self, vector: &[V]) -> Vec<V> {
        self.multiply_with_vector_with(&MultiplyConfig::default(), vector)
    }

    /// Compute `self * vector` with an explicit kernel configuration
    pub fn multiply_with_vector_with(&self, config: &MultiplyConfig, vector: &[V]) -> Vec<V> {
        let mut result = vec![V::zero(); self.row_count()];
        if config.use_parallel(self.nonzero_entry_count) {
            trace!(nonzeros = self.nonzero_entry_count, "parallel multiply");
            self.multiply_parallel_into(vector, &mut result, config.block_rows);
        } else {
            self.multiply_sequential_into(vector, &mut result);
        }
        result
    }

    /// Single-threaded reference kernel
    pub fn multiply_with_vector_sequential(&self, vector: &[V]) -> Vec<V> {
        let mut result = vec![V::zero(); self.row_count()];
        self.multiply_sequential_into(vector, &mut result);
        result
    }

    /// Data-parallel kernel over blocks of `block_rows` consecutive rows
    pub fn multiply_with_vector_parallel(&self, vector: &[V], block_rows: usize) -> Vec<V> {
        let mut result = vec![V::zero(); self.row_count()];
        self.multiply_parallel_into(vector, &mut result, block_rows.max(1));
        result
    }

    fn multiply_sequential_into(&self, vector: &[V], result: &mut [V]) {
        debug_assert!(vector.len() >= self.column_count);
        for (row, slot) in result.iter_mut().enumerate() {
            *slot = row_dot(self.get_row(row), vector);
        }
    }

    fn multiply_parallel_into(&self, vector: &[V], result: &mut [V], block_rows: usize) {
        debug_assert!(vector.len() >= self.column_count);
        result
            .par_chunks_mut(block_rows)
            .enumerate()
            .for_each(|(block, slots)| {
                // Every block locates its own rows through the row-start table.
                let first_row = block * block_rows;
                for (offset, slot) in slots.iter_mut().enumerate() {
                    *slot = row_dot(self.get_row(first_row + offset), vector);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MatrixBuilder;

    fn chain(size: usize) -> SparseMatrix<f64> {
        let mut builder = MatrixBuilder::new();
        for row in 0..size {
            builder.add_next_value(row, row, 0.25).unwrap();
            if row + 1 < size {
                builder.add_next_value(row, row + 1, 0.75).unwrap();
            }
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_small_product() {
        let mut builder = MatrixBuilder::new();
        builder.add_next_value(0, 0, 0.5).unwrap();
        builder.add_next_value(0, 1, 0.5).unwrap();
        builder.add_next_value(1, 0, 0.3).unwrap();
        builder.add_next_value(1, 1, 0.7).unwrap();
        let m = builder.build().unwrap();

        assert_eq!(m.multiply_with_vector(&[1.0, 0.0]), vec![0.5, 0.3]);
        assert_eq!(m.multiply_with_vector(&[2.0, 4.0]), vec![3.0, 0.6 + 2.8]);
    }

    #[test]
    fn test_empty_rows_yield_zero() {
        let mut builder = MatrixBuilder::new().with_dimensions(3, 2, 0);
        builder.add_next_value(1, 1, 2.0).unwrap();
        let m = builder.build().unwrap();
        assert_eq!(m.multiply_with_vector(&[1.0, 1.0]), vec![0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_kernels_agree_on_uneven_blocks() {
        let m = chain(23);
        let vector: Vec<f64> = (0..23).map(|i| i as f64 / 7.0).collect();
        let sequential = m.multiply_with_vector_sequential(&vector);
        for block_rows in [1, 3, 10, 23, 64] {
            assert_eq!(m.multiply_with_vector_parallel(&vector, block_rows), sequential);
        }
    }

    #[test]
    fn test_config_selects_parallel_kernel() {
        let m = chain(12);
        let vector = vec![1.0; 12];
        let forced = MultiplyConfig::default()
            .with_nonzero_threshold(0)
            .with_block_rows(5);
        assert_eq!(
            m.multiply_with_vector_with(&forced, &vector),
            m.multiply_with_vector_with(&MultiplyConfig::sequential(), &vector)
        );
    }
}
