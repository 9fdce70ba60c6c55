//! PMC - Sparse Matrix Engine and Formula Evaluator for Probabilistic Model Checking
//!
//! This library provides the numeric heart of a probabilistic model checker:
//! compressed row storage with row groups for nondeterministic choice, the
//! algebraic transforms iterative solvers are built on, and a recursive
//! evaluator for probabilistic temporal-logic formulas.
//!
//! ## Architecture
//!
//! PMC follows a definitions/implementation separation:
//!
//! - **pmc-core**: entries, the numeric weight trait, storage errors, hashing (no allocation)
//! - **pmc**: the builder and matrix, distributions, state sets, models and the evaluator
//!
//! ## Quick Start
//!
//! ```rust
//! use pmc::{MatrixBuilder, MatrixError};
//!
//! fn example() -> Result<(), MatrixError> {
//!     let mut builder = MatrixBuilder::<f64>::new();
//!     builder.add_next_value(0, 0, 0.5)?;
//!     builder.add_next_value(0, 1, 0.5)?;
//!     builder.add_next_value(1, 1, 1.0)?;
//!     let matrix = builder.build()?;
//!
//!     let result = matrix.multiply_with_vector(&[1.0, 0.0]);
//!     assert_eq!(result, vec![0.5, 0.0]);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Strict construction**: entries must arrive in row-major, ascending-column order
//! - **Row groups**: several rows per state for Markov decision processes
//! - **Parallel products**: matrix-vector products split across rayon tasks above a threshold
//! - **Contained evaluation**: a failing property is logged and skipped, never propagated

pub use pmc_core::{
    // Core types
    MatrixEntry, Weight,
    // Error handling
    Dimension, MatrixError,
    // Hashing
    Fnv1a,
};
pub use pmc_core::constants;

pub mod config;
pub mod error;
pub mod modelchecker;
pub mod models;
pub mod storage;

pub use config::MultiplyConfig;
pub use error::{CheckError, Result};
pub use modelchecker::{
    ComparisonType, DtmcStepSolver, ModelChecker, NoBoundOperator, NoSolver, PathFormula,
    PathFormulaSolver, RewardFormula, StateFormula,
};
pub use models::{Dtmc, Mdp, Model, ModelKind, StateLabeling};
pub use storage::{Distribution, MatrixBuilder, SparseMatrix, StateSet};
