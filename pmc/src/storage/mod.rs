//! Sparse storage: builder, matrix, distributions and state sets

mod builder;
mod distribution;
mod matrix;
mod multiply;
mod state_set;
mod transform;

pub use builder::MatrixBuilder;
pub use distribution::Distribution;
pub use matrix::{Rows, SparseMatrix};
pub use state_set::StateSet;
