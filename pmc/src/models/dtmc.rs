//! Discrete-time Markov chains

use pmc_core::Weight;
use tracing::debug;

use super::{validate_rewards, Model, ModelKind, StateLabeling};
use crate::error::{CheckError, Result};
use crate::storage::SparseMatrix;

/// Labeled Markov chain with one transition row per state
#[derive(Debug, Clone)]
pub struct Dtmc<V> {
    transitions: SparseMatrix<V>,
    labeling: StateLabeling,
    state_rewards: Option<Vec<V>>,
    transition_rewards: Option<SparseMatrix<V>>,
}

impl<V: Weight> Dtmc<V> {
    /// Create a chain from a square transition matrix
    pub fn new(transitions: SparseMatrix<V>, labeling: StateLabeling) -> Result<Self> {
        if !transitions.is_square() || !transitions.has_trivial_row_grouping() {
            return Err(CheckError::InvalidModel(format!(
                "DTMC needs a square matrix with one row per state, got {}x{} in {} groups",
                transitions.row_count(),
                transitions.column_count(),
                transitions.row_group_count()
            )));
        }
        if labeling.state_count() != transitions.row_count() {
            return Err(CheckError::InvalidModel(format!(
                "labeling covers {} states, matrix has {}",
                labeling.state_count(),
                transitions.row_count()
            )));
        }

        debug!(
            states = transitions.row_count(),
            transitions = transitions.nonzero_entry_count(),
            "created DTMC"
        );
        Ok(Self {
            transitions,
            labeling,
            state_rewards: None,
            transition_rewards: None,
        })
    }

    /// Attach a reward per state
    pub fn with_state_rewards(mut self, rewards: Vec<V>) -> Result<Self> {
        validate_rewards(&self.transitions, self.state_count(), Some(rewards.as_slice()), None)?;
        self.state_rewards = Some(rewards);
        Ok(self)
    }

    /// Attach a reward per transition
    pub fn with_transition_rewards(mut self, rewards: SparseMatrix<V>) -> Result<Self> {
        validate_rewards(&self.transitions, self.state_count(), None, Some(&rewards))?;
        self.transition_rewards = Some(rewards);
        Ok(self)
    }
}

impl<V: Weight> Model<V> for Dtmc<V> {
    fn kind(&self) -> ModelKind {
        ModelKind::Dtmc
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

    fn as_dtmc(&self) -> Result<&Dtmc<V>> {
        Ok(self)
    }
}
