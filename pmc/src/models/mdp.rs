//! Markov decision processes

use pmc_core::Weight;
use tracing::debug;

use super::{validate_rewards, Dtmc, Model, ModelKind, StateLabeling};
use crate::error::{CheckError, Result};
use crate::storage::SparseMatrix;

/// Labeled model with one row group of choices per state
#[derive(Debug, Clone)]
pub struct Mdp<V> {
    transitions: SparseMatrix<V>,
    labeling: StateLabeling,
    state_rewards: Option<Vec<V>>,
    transition_rewards: Option<SparseMatrix<V>>,
}

impl<V: Weight> Mdp<V> {
    /// Create a process whose row groups are the states' choices
    pub fn new(transitions: SparseMatrix<V>, labeling: StateLabeling) -> Result<Self> {
        let states = transitions.row_group_count();
        if transitions.column_count() != states || labeling.state_count() != states {
            return Err(CheckError::InvalidModel(format!(
                "MDP with {states} row groups needs {states} columns and labeled states, \
                 got {} columns and {} labeled states",
                transitions.column_count(),
                labeling.state_count()
            )));
        }

        debug!(
            states,
            choices = transitions.row_count(),
            transitions = transitions.nonzero_entry_count(),
            "created MDP"
        );
        Ok(Self {
            transitions,
            labeling,
            state_rewards: None,
            transition_rewards: None,
        })
    }

    pub fn with_state_rewards(mut self, rewards: Vec<V>) -> Result<Self> {
        validate_rewards(&self.transitions, self.state_count(), Some(rewards.as_slice()), None)?;
        self.state_rewards = Some(rewards);
        Ok(self)
    }

    pub fn with_transition_rewards(mut self, rewards: SparseMatrix<V>) -> Result<Self> {
        validate_rewards(&self.transitions, self.state_count(), None, Some(&rewards))?;
        self.transition_rewards = Some(rewards);
        Ok(self)
    }

    /// Total number of choices over all states
    pub fn choice_count(&self) -> usize {
        self.transitions.row_count()
    }

    /// Chain obtained by fixing choice `choices[s]` in every state `s`
    pub fn induced_dtmc(&self, choices: &[usize]) -> Result<Dtmc<V>> {
        let transitions = self.transitions.select_rows_from_row_groups(choices, false)?;
        let mut dtmc = Dtmc::new(transitions, self.labeling.clone())?;
        if let Some(rewards) = &self.state_rewards {
            dtmc = dtmc.with_state_rewards(rewards.clone())?;
        }
        if let Some(rewards) = &self.transition_rewards {
            let selected = rewards.select_rows_from_row_groups(choices, false)?;
            dtmc = dtmc.with_transition_rewards(selected)?;
        }
        Ok(dtmc)
    }
}

impl<V: Weight> Model<V> for Mdp<V> {
    fn kind(&self) -> ModelKind {
        ModelKind::Mdp
    }

    fn transition_matrix(&self) -> &SparseMatrix<V> {
        &self.transitions
    }

    fn labeling(&self) -> &StateLabeling {
        &self.labeling
    }

    fn state_rewards(&self) -> Option<&[V]> {
        self.state_rewards.as_deref()
    }

    fn transition_rewards(&self) -> Option<&SparseMatrix<V>> {
        self.transition_rewards.as_ref()
    }

    fn as_mdp(&self) -> Result<&Mdp<V>> {
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MatrixBuilder;

    /// State 0 may stay or move to 1; state 1 is absorbing
    fn choices() -> SparseMatrix<f64> {
        let mut builder = MatrixBuilder::new().with_custom_row_grouping();
        builder.new_row_group(0).unwrap();
        builder.add_next_value(0, 0, 1.0).unwrap();
        builder.add_next_value(1, 0, 0.1).unwrap();
        builder.add_next_value(1, 1, 0.9).unwrap();
        builder.new_row_group(2).unwrap();
        builder.add_next_value(2, 1, 1.0).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_induced_dtmc() {
        let mdp = Mdp::new(choices(), StateLabeling::new(2))
            .unwrap()
            .with_state_rewards(vec![2.0, 0.0])
            .unwrap()
            .with_transition_rewards(choices())
            .unwrap();
        assert_eq!(mdp.choice_count(), 3);
        assert_eq!(mdp.state_count(), 2);

        let dtmc = mdp.induced_dtmc(&[1, 0]).unwrap();
        let matrix = dtmc.transition_matrix();
        assert_eq!(matrix.row_count(), 2);
        assert_eq!(matrix.get_element(0, 1), Some(0.9));
        assert_eq!(dtmc.state_rewards(), Some(&[2.0, 0.0][..]));
        assert_eq!(
            dtmc.transition_rewards().unwrap().get_element(0, 0),
            Some(0.1)
        );
    }

    #[test]
    fn test_invalid_choice() {
        let mdp = Mdp::new(choices(), StateLabeling::new(2)).unwrap();
        assert!(matches!(
            mdp.induced_dtmc(&[0, 1]),
            Err(CheckError::Matrix(_))
        ));
        assert!(matches!(
            mdp.as_dtmc(),
            Err(CheckError::BadCast {
                requested: "DTMC",
                found: "MDP"
            })
        ));
    }

    #[test]
    fn test_rejects_mismatched_labeling() {
        assert!(Mdp::new(choices(), StateLabeling::new(3)).is_err());
    }
}
