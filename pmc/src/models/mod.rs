//! Transition-system models consumed by the formula evaluator
//!
//! A model couples a transition matrix with a state labeling and optional
//! reward structures. The evaluator only sees the [`Model`] trait; concrete
//! kinds are reached through the checked [`Model::as_dtmc`] and
//! [`Model::as_mdp`] accessors.

mod dtmc;
mod labeling;
mod mdp;

pub use dtmc::Dtmc;
pub use labeling::StateLabeling;
pub use mdp::Mdp;

use std::fmt;

use pmc_core::{constants::labels, Weight};

use crate::error::{CheckError, Result};
use crate::storage::{SparseMatrix, StateSet};

/// Kind of a probabilistic model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Discrete-time Markov chain
    Dtmc,
    /// Markov decision process
    Mdp,
}

impl ModelKind {
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Dtmc => "DTMC",
            ModelKind::Mdp => "MDP",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only view of a labeled transition system
pub trait Model<V: Weight>: Send + Sync {
    fn kind(&self) -> ModelKind;

    fn transition_matrix(&self) -> &SparseMatrix<V>;

    fn labeling(&self) -> &StateLabeling;

    /// Reward earned per step spent in each state
    fn state_rewards(&self) -> Option<&[V]> {
        None
    }

    /// Reward earned per transition, sharing the transition matrix's layout
    fn transition_rewards(&self) -> Option<&SparseMatrix<V>> {
        None
    }

    fn state_count(&self) -> usize {
        self.labeling().state_count()
    }

    /// Number of non-zero transitions
    fn transition_count(&self) -> usize {
        self.transition_matrix().nonzero_entry_count()
    }

    fn has_label(&self, label: &str) -> bool {
        self.labeling().contains_label(label)
    }

    fn labeled_states(&self, label: &str) -> Option<&StateSet> {
        self.labeling().get_states(label)
    }

    /// States carrying the reserved `init` label
    fn initial_states(&self) -> Option<&StateSet> {
        self.labeled_states(labels::INIT)
    }

    fn as_dtmc(&self) -> Result<&Dtmc<V>> {
        Err(CheckError::BadCast {
            requested: ModelKind::Dtmc.name(),
            found: self.kind().name(),
        })
    }

    fn as_mdp(&self) -> Result<&Mdp<V>> {
        Err(CheckError::BadCast {
            requested: ModelKind::Mdp.name(),
            found: self.kind().name(),
        })
    }
}

/// Check that optional reward structures fit a transition matrix
fn validate_rewards<V: Weight>(
    matrix: &SparseMatrix<V>,
    state_count: usize,
    state_rewards: Option<&[V]>,
    transition_rewards: Option<&SparseMatrix<V>>,
) -> Result<()> {
    if let Some(rewards) = state_rewards {
        if rewards.len() != state_count {
            return Err(CheckError::InvalidModel(format!(
                "{} state rewards for {} states",
                rewards.len(),
                state_count
            )));
        }
    }
    if let Some(rewards) = transition_rewards {
        if !rewards.is_submatrix_of(matrix) {
            return Err(CheckError::InvalidModel(
                "transition rewards are not a submatrix of the transition matrix".to_string(),
            ));
        }
    }
    Ok(())
}
