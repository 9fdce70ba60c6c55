//! Recursive formula evaluation over a borrowed model

use pmc_core::{constants::labels, Weight};
use tracing::{error, info, warn};

use super::formula::{ComparisonType, NoBoundOperator, PathFormula, RewardFormula, StateFormula};
use super::solver::{NoSolver, PathFormulaSolver};
use crate::error::{CheckError, Result};
use crate::models::Model;
use crate::storage::StateSet;

/// Evaluator binding one model to one numeric solver
///
/// The model is borrowed for the checker's whole lifetime and never
/// modified. State formulas are composed here; the numeric part of path and
/// reward formulas is delegated to the solver.
pub struct ModelChecker<'a, V, S = NoSolver> {
    model: &'a dyn Model<V>,
    solver: S,
}

impl<'a, V: Weight> ModelChecker<'a, V, NoSolver> {
    /// Checker for purely propositional formulas
    pub fn propositional(model: &'a dyn Model<V>) -> Self {
        Self::new(model, NoSolver)
    }
}

impl<'a, V: Weight, S: PathFormulaSolver<V>> ModelChecker<'a, V, S> {
    pub fn new(model: &'a dyn Model<V>, solver: S) -> Self {
        Self { model, solver }
    }

    pub fn model(&self) -> &'a dyn Model<V> {
        self.model
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Evaluate `formula` and report membership of every initial state
    ///
    /// Failures are logged and yield `None`; they never reach the caller.
    pub fn check(&self, formula: &StateFormula) -> Option<Vec<(usize, bool)>> {
        info!("Model checking formula\t{formula}");
        match self.check_state_formula(formula) {
            Ok(states) => {
                info!("Result for initial states:");
                let report: Vec<(usize, bool)> = self
                    .initial_states()
                    .map(|state| (state, states.get(state)))
                    .collect();
                for &(state, satisfied) in &report {
                    info!(
                        "\t{state}: {}",
                        if satisfied { "satisfied" } else { "not satisfied" }
                    );
                }
                Some(report)
            }
            Err(e) => {
                error!("Error during computation: {e}. Skipping property.");
                None
            }
        }
    }

    /// Evaluate a quantitative query and report every initial state's value
    ///
    /// Failures are logged and yield `None`; they never reach the caller.
    pub fn check_no_bound(&self, formula: &NoBoundOperator) -> Option<Vec<(usize, V)>> {
        info!("Model checking formula\t{formula}");
        match self.check_no_bound_operator(formula) {
            Ok(values) => {
                info!("Result for initial states:");
                let report: Vec<(usize, V)> = self
                    .initial_states()
                    .map(|state| (state, values[state]))
                    .collect();
                for (state, value) in &report {
                    info!("\t{state}: {value}");
                }
                Some(report)
            }
            Err(e) => {
                error!("Error during computation: {e}. Skipping property.");
                None
            }
        }
    }

    fn initial_states(&self) -> impl Iterator<Item = usize> + 'a {
        let initial = self.model.initial_states();
        if initial.is_none() {
            warn!("Model has no '{}' label, no initial states to report", labels::INIT);
        }
        initial.into_iter().flat_map(StateSet::iter)
    }

    /// Set of states satisfying `formula`
    pub fn check_state_formula(&self, formula: &StateFormula) -> Result<StateSet> {
        match formula {
            StateFormula::Ap(label) => self.check_ap(label),
            StateFormula::And(left, right) => self.check_and(left, right),
            StateFormula::Or(left, right) => self.check_or(left, right),
            StateFormula::Not(child) => self.check_not(child),
            StateFormula::ProbabilisticBound {
                comparison,
                bound,
                path,
            } => self.check_probabilistic_bound(*comparison, *bound, path),
            StateFormula::RewardBound {
                comparison,
                bound,
                reward,
            } => self.check_reward_bound(*comparison, *bound, reward),
        }
    }

    /// States carrying `label`; `true` and `false` are literals
    pub fn check_ap(&self, label: &str) -> Result<StateSet> {
        let state_count = self.model.state_count();
        match label {
            labels::TRUE => Ok(StateSet::full(state_count)),
            labels::FALSE => Ok(StateSet::empty(state_count)),
            _ => self.model.labeled_states(label).cloned().ok_or_else(|| {
                error!("Atomic proposition '{label}' is invalid.");
                CheckError::UnknownProposition(label.to_string())
            }),
        }
    }

    pub fn check_and(&self, left: &StateFormula, right: &StateFormula) -> Result<StateSet> {
        let mut result = self.check_state_formula(left)?;
        result &= &self.check_state_formula(right)?;
        Ok(result)
    }

    pub fn check_or(&self, left: &StateFormula, right: &StateFormula) -> Result<StateSet> {
        let mut result = self.check_state_formula(left)?;
        result |= &self.check_state_formula(right)?;
        Ok(result)
    }

    pub fn check_not(&self, child: &StateFormula) -> Result<StateSet> {
        Ok(!self.check_state_formula(child)?)
    }

    /// States whose probability of `path` satisfies the bound
    pub fn check_probabilistic_bound(
        &self,
        comparison: ComparisonType,
        bound: f64,
        path: &PathFormula,
    ) -> Result<StateSet> {
        let values = self.check_path_formula(path)?;
        Ok(Self::apply_bound(&values, comparison, bound))
    }

    /// States whose expected reward satisfies the bound
    pub fn check_reward_bound(
        &self,
        comparison: ComparisonType,
        bound: f64,
        reward: &RewardFormula,
    ) -> Result<StateSet> {
        let values = self.check_reward_formula(reward)?;
        Ok(Self::apply_bound(&values, comparison, bound))
    }

    fn apply_bound(values: &[V], comparison: ComparisonType, bound: f64) -> StateSet {
        StateSet::from_indices(
            values.len(),
            values
                .iter()
                .enumerate()
                .filter(|(_, value)| comparison.meets_bound(value.to_f64(), bound))
                .map(|(state, _)| state),
        )
    }

    /// Probability of `path` from every state
    pub fn check_path_formula(&self, path: &PathFormula) -> Result<Vec<V>> {
        let model = self.model;
        let values = match path {
            PathFormula::Until { left, right } => {
                let left = self.check_state_formula(left)?;
                let right = self.check_state_formula(right)?;
                self.solver.check_until(model, &left, &right)?
            }
            PathFormula::BoundedUntil { left, right, steps } => {
                let left = self.check_state_formula(left)?;
                let right = self.check_state_formula(right)?;
                self.solver.check_bounded_until(model, &left, &right, *steps)?
            }
            PathFormula::Eventually(child) => {
                let target = self.check_state_formula(child)?;
                self.solver.check_eventually(model, &target)?
            }
            PathFormula::BoundedEventually { child, steps } => {
                let target = self.check_state_formula(child)?;
                self.solver.check_bounded_eventually(model, &target, *steps)?
            }
            PathFormula::Globally(child) => {
                let states = self.check_state_formula(child)?;
                self.solver.check_globally(model, &states)?
            }
            PathFormula::Next(child) => {
                let states = self.check_state_formula(child)?;
                self.solver.check_next(model, &states)?
            }
        };
        self.require_per_state(values)
    }

    /// Expected reward of `reward` from every state
    pub fn check_reward_formula(&self, reward: &RewardFormula) -> Result<Vec<V>> {
        let model = self.model;
        let values = match reward {
            RewardFormula::Reachability(target) => {
                let target = self.check_state_formula(target)?;
                self.solver.check_reachability_reward(model, &target)?
            }
            RewardFormula::Cumulative { steps } => {
                self.solver.check_cumulative_reward(model, *steps)?
            }
            RewardFormula::Instantaneous { steps } => {
                self.solver.check_instantaneous_reward(model, *steps)?
            }
        };
        self.require_per_state(values)
    }

    pub fn check_no_bound_operator(&self, formula: &NoBoundOperator) -> Result<Vec<V>> {
        match formula {
            NoBoundOperator::Probabilistic(path) => self.check_path_formula(path),
            NoBoundOperator::Reward(reward) => self.check_reward_formula(reward),
        }
    }

    fn require_per_state(&self, values: Vec<V>) -> Result<Vec<V>> {
        if values.len() != self.model.state_count() {
            return Err(CheckError::InvalidModel(format!(
                "solver {} returned {} values for {} states",
                self.solver.name(),
                values.len(),
                self.model.state_count()
            )));
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dtmc, StateLabeling};
    use crate::modelchecker::DtmcStepSolver;
    use crate::storage::MatrixBuilder;

    /// Three states in a cycle, 0 initial, 1 labeled `a`, 1 and 2 labeled `b`
    fn cycle() -> Dtmc<f64> {
        let mut builder = MatrixBuilder::new();
        builder.add_next_value(0, 1, 1.0).unwrap();
        builder.add_next_value(1, 2, 1.0).unwrap();
        builder.add_next_value(2, 0, 1.0).unwrap();

        let mut labeling = StateLabeling::new(3);
        labeling.add_label_to_state("init", 0).unwrap();
        labeling.add_label_to_state("a", 1).unwrap();
        labeling.add_label_to_state("b", 1).unwrap();
        labeling.add_label_to_state("b", 2).unwrap();
        Dtmc::new(builder.build().unwrap(), labeling).unwrap()
    }

    #[test]
    fn test_propositional_formulas() {
        let dtmc = cycle();
        let model: &dyn Model<f64> = &dtmc;
        let checker = ModelChecker::propositional(model);

        let a_and_b = StateFormula::and(StateFormula::ap("a"), StateFormula::ap("b"));
        assert_eq!(checker.check_state_formula(&a_and_b).unwrap().to_string(), "010");

        let not_b = StateFormula::not(StateFormula::ap("b"));
        assert_eq!(checker.check_state_formula(&not_b).unwrap().to_string(), "100");

        let a_or_false = StateFormula::or(StateFormula::ap("a"), StateFormula::ap("false"));
        assert_eq!(checker.check_state_formula(&a_or_false).unwrap().to_string(), "010");
    }

    #[test]
    fn test_unknown_proposition() {
        let dtmc = cycle();
        let model: &dyn Model<f64> = &dtmc;
        let checker = ModelChecker::propositional(model);
        assert!(matches!(
            checker.check_ap("c"),
            Err(CheckError::UnknownProposition(label)) if label == "c"
        ));
        assert_eq!(checker.check(&StateFormula::ap("c")), None);
    }

    #[test]
    fn test_check_reports_initial_states() {
        let dtmc = cycle();
        let model: &dyn Model<f64> = &dtmc;
        let checker = ModelChecker::propositional(model);
        assert_eq!(
            checker.check(&StateFormula::not(StateFormula::ap("b"))),
            Some(vec![(0, true)])
        );
    }

    #[test]
    fn test_missing_capability_is_contained() {
        let dtmc = cycle();
        let model: &dyn Model<f64> = &dtmc;
        let checker = ModelChecker::propositional(model);
        let formula = StateFormula::probability_bound(
            ComparisonType::Greater,
            0.0,
            PathFormula::next(StateFormula::ap("a")),
        );
        assert!(matches!(
            checker.check_state_formula(&formula),
            Err(CheckError::BadCast { .. })
        ));
        assert_eq!(checker.check(&formula), None);
    }

    #[test]
    fn test_probability_bound() {
        let dtmc = cycle();
        let model: &dyn Model<f64> = &dtmc;
        let checker = ModelChecker::new(model, DtmcStepSolver::new());

        let next_a = StateFormula::probability_bound(
            ComparisonType::GreaterEqual,
            1.0,
            PathFormula::next(StateFormula::ap("a")),
        );
        assert_eq!(checker.check_state_formula(&next_a).unwrap().to_string(), "100");

        let query = NoBoundOperator::Probabilistic(PathFormula::bounded_eventually(
            StateFormula::ap("b"),
            1,
        ));
        assert_eq!(checker.check_no_bound(&query), Some(vec![(0, 1.0)]));
    }

    #[test]
    fn test_reward_bound() {
        let dtmc = cycle().with_state_rewards(vec![1.0, 0.0, 2.0]).unwrap();
        let model: &dyn Model<f64> = &dtmc;
        let checker = ModelChecker::new(model, DtmcStepSolver::new());

        let cheap = StateFormula::reward_bound(
            ComparisonType::LessEqual,
            2.0,
            RewardFormula::cumulative(2),
        );
        // Two steps collect 1, 2 and 3 from states 0, 1 and 2
        assert_eq!(checker.check_state_formula(&cheap).unwrap().to_string(), "110");
    }
}
