#![no_std]

//! PMC Core - Sparse Transition Matrix Definitions
//!
//! This crate provides the allocation-free building blocks shared by the
//! storage engine and the formula evaluator: matrix entries, the numeric
//! weight abstraction, the storage error taxonomy and a deterministic hasher.

pub mod constants;
pub mod entry;
pub mod error;
pub mod hash;
pub mod weight;

pub use entry::MatrixEntry;
pub use error::*;
pub use hash::Fnv1a;
pub use weight::Weight;
