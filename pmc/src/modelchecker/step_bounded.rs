//! Step-bounded properties of Markov chains
//!
//! Everything here reduces to a fixed number of matrix-vector products, so
//! no equation solving or convergence test is involved.

use pmc_core::Weight;
use tracing::debug;

use super::solver::PathFormulaSolver;
use crate::config::MultiplyConfig;
use crate::error::{CheckError, Result};
use crate::models::Model;
use crate::storage::{SparseMatrix, StateSet};

/// Solver for next, bounded until and bounded reward formulas on DTMCs
#[derive(Debug, Clone, Copy, Default)]
pub struct DtmcStepSolver {
    config: MultiplyConfig,
}

impl DtmcStepSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for every matrix-vector product
    pub fn with_multiply_config(mut self, config: MultiplyConfig) -> Self {
        self.config = config;
        self
    }

    fn indicator<V: Weight>(states: &StateSet) -> Vec<V> {
        (0..states.len())
            .map(|s| if states.get(s) { V::one() } else { V::zero() })
            .collect()
    }

    /// Reward earned by one step from each state
    fn step_rewards<V: Weight>(model: &dyn Model<V>, matrix: &SparseMatrix<V>) -> Result<Vec<V>> {
        let state_rewards = model.state_rewards();
        let transition_rewards = model
            .transition_rewards()
            .map(|rewards| matrix.get_pointwise_product_row_sum_vector(rewards));

        match (state_rewards, transition_rewards) {
            (None, None) => Err(CheckError::InvalidModel(
                "model carries no reward structure".to_string(),
            )),
            (Some(state), None) => Ok(state.to_vec()),
            (None, Some(transition)) => Ok(transition),
            (Some(state), Some(mut transition)) => {
                for (total, &reward) in transition.iter_mut().zip(state) {
                    *total += reward;
                }
                Ok(transition)
            }
        }
    }
}

impl<V: Weight> PathFormulaSolver<V> for DtmcStepSolver {
    fn name(&self) -> &'static str {
        "DtmcStepSolver"
    }

    fn check_next(&self, model: &dyn Model<V>, states: &StateSet) -> Result<Vec<V>> {
        let matrix = model.as_dtmc()?.transition_matrix();
        Ok(matrix.multiply_with_vector_with(&self.config, &Self::indicator(states)))
    }

    fn check_bounded_until(
        &self,
        model: &dyn Model<V>,
        left: &StateSet,
        right: &StateSet,
        steps: usize,
    ) -> Result<Vec<V>> {
        let matrix = model.as_dtmc()?.transition_matrix();
        debug!(steps, targets = right.count(), "bounded until");

        let mut result = Self::indicator(right);
        for _ in 0..steps {
            let next = matrix.multiply_with_vector_with(&self.config, &result);
            for (state, value) in result.iter_mut().enumerate() {
                *value = if right.get(state) {
                    V::one()
                } else if left.get(state) {
                    next[state]
                } else {
                    V::zero()
                };
            }
        }
        Ok(result)
    }

    fn check_bounded_eventually(
        &self,
        model: &dyn Model<V>,
        target: &StateSet,
        steps: usize,
    ) -> Result<Vec<V>> {
        let everywhere = StateSet::full(model.state_count());
        self.check_bounded_until(model, &everywhere, target, steps)
    }

    fn check_cumulative_reward(&self, model: &dyn Model<V>, steps: usize) -> Result<Vec<V>> {
        let matrix = model.as_dtmc()?.transition_matrix();
        let rewards = Self::step_rewards(model, matrix)?;

        let mut result = vec![V::zero(); model.state_count()];
        for _ in 0..steps {
            let next = matrix.multiply_with_vector_with(&self.config, &result);
            for ((value, reward), expected) in result.iter_mut().zip(&rewards).zip(next) {
                *value = *reward + expected;
            }
        }
        Ok(result)
    }

    fn check_instantaneous_reward(&self, model: &dyn Model<V>, steps: usize) -> Result<Vec<V>> {
        let matrix = model.as_dtmc()?.transition_matrix();
        let Some(rewards) = model.state_rewards() else {
            return Err(CheckError::InvalidModel(
                "instantaneous rewards need state rewards".to_string(),
            ));
        };

        let mut result = rewards.to_vec();
        for _ in 0..steps {
            result = matrix.multiply_with_vector_with(&self.config, &result);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dtmc, StateLabeling};
    use crate::storage::MatrixBuilder;

    /// 0 -> {0: 0.5, 1: 0.5}, 1 -> {2: 1}, 2 -> {2: 1}
    fn walk() -> Dtmc<f64> {
        let mut builder = MatrixBuilder::new();
        builder.add_next_value(0, 0, 0.5).unwrap();
        builder.add_next_value(0, 1, 0.5).unwrap();
        builder.add_next_value(1, 2, 1.0).unwrap();
        builder.add_next_value(2, 2, 1.0).unwrap();
        Dtmc::new(builder.build().unwrap(), StateLabeling::new(3)).unwrap()
    }

    #[test]
    fn test_next() {
        let dtmc = walk();
        let model: &dyn Model<f64> = &dtmc;
        let result = DtmcStepSolver::new()
            .check_next(model, &StateSet::from_indices(3, [1]))
            .unwrap();
        assert_eq!(result, vec![0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_bounded_eventually() {
        let solver = DtmcStepSolver::new();
        let target = StateSet::from_indices(3, [2]);
        let dtmc = walk();
        let model: &dyn Model<f64> = &dtmc;

        assert_eq!(
            solver.check_bounded_eventually(model, &target, 0).unwrap(),
            vec![0.0, 0.0, 1.0]
        );
        assert_eq!(
            solver.check_bounded_eventually(model, &target, 2).unwrap(),
            vec![0.5, 1.0, 1.0]
        );
        assert_eq!(
            solver.check_bounded_eventually(model, &target, 3).unwrap(),
            vec![0.75, 1.0, 1.0]
        );
    }

    #[test]
    fn test_bounded_until_blocks_outside_left() {
        let dtmc = walk();
        let model: &dyn Model<f64> = &dtmc;
        let left = StateSet::from_indices(3, [0]);
        let right = StateSet::from_indices(3, [2]);
        assert_eq!(
            DtmcStepSolver::new()
                .check_bounded_until(model, &left, &right, 5)
                .unwrap(),
            vec![0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_rewards() {
        let solver = DtmcStepSolver::new();
        let dtmc = walk().with_state_rewards(vec![1.0, 2.0, 0.0]).unwrap();
        let model: &dyn Model<f64> = &dtmc;

        assert_eq!(
            solver.check_cumulative_reward(model, 2).unwrap(),
            vec![1.0 + 0.5 * 1.0 + 0.5 * 2.0, 2.0, 0.0]
        );
        assert_eq!(
            solver.check_instantaneous_reward(model, 1).unwrap(),
            vec![1.5, 0.0, 0.0]
        );

        let plain = walk();
        let plain: &dyn Model<f64> = &plain;
        assert!(matches!(
            solver.check_cumulative_reward(plain, 1),
            Err(CheckError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_transition_rewards_enter_cumulative() {
        let mut builder = MatrixBuilder::new();
        builder.add_next_value(0, 1, 4.0).unwrap();
        let rewards = builder.build_with_overrides(Some(3), Some(3), None).unwrap();
        let dtmc = walk().with_transition_rewards(rewards).unwrap();
        let model: &dyn Model<f64> = &dtmc;

        assert_eq!(
            DtmcStepSolver::new().check_cumulative_reward(model, 1).unwrap(),
            vec![2.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_unbounded_is_not_supported() {
        let dtmc = walk();
        let model: &dyn Model<f64> = &dtmc;
        let target = StateSet::from_indices(3, [2]);
        assert!(matches!(
            DtmcStepSolver::new().check_eventually(model, &target),
            Err(CheckError::BadCast {
                requested: "eventually checker",
                found: "DtmcStepSolver"
            })
        ));
    }
}
