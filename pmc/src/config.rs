//! Configuration for the matrix-vector product kernels

use pmc_core::constants::{PARALLEL_BLOCK_ROWS, PARALLEL_NONZERO_THRESHOLD};

/// Configuration for choosing and partitioning the multiply kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplyConfig {
    /// Non-zero count above which the parallel kernel is used
    pub nonzero_threshold: usize,
    /// Number of consecutive rows per parallel block
    pub block_rows: usize,
}

impl MultiplyConfig {
    /// Set the non-zero threshold for the parallel kernel
    pub fn with_nonzero_threshold(mut self, nonzero_threshold: usize) -> Self {
        self.nonzero_threshold = nonzero_threshold;
        self
    }

    /// Set the number of rows per parallel block (at least one)
    pub fn with_block_rows(mut self, block_rows: usize) -> Self {
        self.block_rows = block_rows.max(1);
        self
    }

    /// Config that always takes the sequential kernel
    pub fn sequential() -> Self {
        Self::default().with_nonzero_threshold(usize::MAX)
    }

    /// Whether a matrix with `nonzeros` entries should be multiplied in parallel
    pub fn use_parallel(&self, nonzeros: usize) -> bool {
        nonzeros > self.nonzero_threshold
    }
}

impl Default for MultiplyConfig {
    fn default() -> Self {
        Self {
            nonzero_threshold: PARALLEL_NONZERO_THRESHOLD,
            block_rows: PARALLEL_BLOCK_ROWS,
        }
    }
}
