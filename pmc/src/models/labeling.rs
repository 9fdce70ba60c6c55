//! Atomic-proposition labels attached to states

use hashbrown::HashMap;

use crate::error::{CheckError, Result};
use crate::storage::StateSet;

/// Map from label name to the set of states carrying it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateLabeling {
    state_count: usize,
    labels: HashMap<String, StateSet>,
}

impl StateLabeling {
    /// Create an empty labeling over `state_count` states
    pub fn new(state_count: usize) -> Self {
        Self {
            state_count,
            labels: HashMap::new(),
        }
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// Number of distinct labels
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Register `label` with the given states, replacing any previous set
    pub fn add_label(&mut self, label: impl Into<String>, states: StateSet) -> Result<()> {
        let label = label.into();
        if states.len() != self.state_count {
            return Err(CheckError::InvalidModel(format!(
                "label '{label}' covers {} states, model has {}",
                states.len(),
                self.state_count
            )));
        }
        self.labels.insert(label, states);
        Ok(())
    }

    /// Attach `label` to `state`, registering the label on first use
    pub fn add_label_to_state(&mut self, label: &str, state: usize) -> Result<()> {
        if state >= self.state_count {
            return Err(CheckError::InvalidModel(format!(
                "cannot label state {state}, model has {} states",
                self.state_count
            )));
        }
        let state_count = self.state_count;
        self.labels
            .entry_ref(label)
            .or_insert_with(|| StateSet::empty(state_count))
            .set(state, true);
        Ok(())
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    pub fn get_states(&self, label: &str) -> Option<&StateSet> {
        self.labels.get(label)
    }

    /// Whether `state` carries `label`
    pub fn state_has_label(&self, label: &str, state: usize) -> bool {
        self.get_states(label).is_some_and(|states| states.get(state))
    }

    /// Labels of `state`, sorted by name
    pub fn labels_of_state(&self, state: usize) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .labels
            .iter()
            .filter(|(_, states)| states.get(state))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// All label names, sorted
    pub fn label_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.labels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
