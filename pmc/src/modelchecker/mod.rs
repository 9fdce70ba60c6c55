//! Formula evaluation
//!
//! [`ModelChecker`] interprets [`StateFormula`] trees bottom-up against a
//! borrowed [`Model`](crate::models::Model). Boolean structure is handled by
//! the checker itself, while per-state probabilities and rewards come from a
//! pluggable [`PathFormulaSolver`].

mod checker;
mod formula;
mod solver;
mod step_bounded;

pub use checker::ModelChecker;
pub use formula::{ComparisonType, NoBoundOperator, PathFormula, RewardFormula, StateFormula};
pub use solver::{NoSolver, PathFormulaSolver};
pub use step_bounded::DtmcStepSolver;
