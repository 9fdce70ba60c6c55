//! Numeric back ends for path and reward formulas
//!
//! The evaluator composes state sets itself and hands the numeric part of
//! every path or reward formula to a [`PathFormulaSolver`]. A solver only
//! overrides the kinds it supports; every other kind reports
//! [`CheckError::BadCast`].

use pmc_core::Weight;

use crate::error::{CheckError, Result};
use crate::models::Model;
use crate::storage::StateSet;

fn unsupported<T>(solver: &'static str, capability: &'static str) -> Result<T> {
    Err(CheckError::BadCast {
        requested: capability,
        found: solver,
    })
}

/// Per-state probabilities and expected rewards for path and reward formulas
///
/// Every method returns one value per state of `model`.
pub trait PathFormulaSolver<V: Weight> {
    /// Name used in diagnostics
    fn name(&self) -> &'static str;

    fn check_until(
        &self,
        _model: &dyn Model<V>,
        _left: &StateSet,
        _right: &StateSet,
    ) -> Result<Vec<V>> {
        unsupported(self.name(), "until checker")
    }

    fn check_bounded_until(
        &self,
        _model: &dyn Model<V>,
        _left: &StateSet,
        _right: &StateSet,
        _steps: usize,
    ) -> Result<Vec<V>> {
        unsupported(self.name(), "bounded until checker")
    }

    fn check_eventually(&self, _model: &dyn Model<V>, _target: &StateSet) -> Result<Vec<V>> {
        unsupported(self.name(), "eventually checker")
    }

    fn check_bounded_eventually(
        &self,
        _model: &dyn Model<V>,
        _target: &StateSet,
        _steps: usize,
    ) -> Result<Vec<V>> {
        unsupported(self.name(), "bounded eventually checker")
    }

    fn check_globally(&self, _model: &dyn Model<V>, _states: &StateSet) -> Result<Vec<V>> {
        unsupported(self.name(), "globally checker")
    }

    fn check_next(&self, _model: &dyn Model<V>, _states: &StateSet) -> Result<Vec<V>> {
        unsupported(self.name(), "next checker")
    }

    fn check_reachability_reward(
        &self,
        _model: &dyn Model<V>,
        _target: &StateSet,
    ) -> Result<Vec<V>> {
        unsupported(self.name(), "reachability reward checker")
    }

    fn check_cumulative_reward(&self, _model: &dyn Model<V>, _steps: usize) -> Result<Vec<V>> {
        unsupported(self.name(), "cumulative reward checker")
    }

    fn check_instantaneous_reward(&self, _model: &dyn Model<V>, _steps: usize) -> Result<Vec<V>> {
        unsupported(self.name(), "instantaneous reward checker")
    }
}

/// Solver without numeric capabilities
///
/// Suitable for purely propositional formulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSolver;

impl<V: Weight> PathFormulaSolver<V> for NoSolver {
    fn name(&self) -> &'static str {
        "NoSolver"
    }
}
