use std::collections::HashMap;

use super::state::EncodedState;
use crate::game::Action;

/// Action-values for one state, indexed by [`Action::index`]
pub type ActionValues = [f64; Action::COUNT];

/// Sparse Q-table keyed by discovered states.
///
/// Unseen states read as zero and are inserted on first mutable access.
/// Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTable {
    values: HashMap<EncodedState, ActionValues>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for `state`, inserting a zero entry if it has never been seen
    pub fn entry(&mut self, state: EncodedState) -> &mut ActionValues {
        self.values.entry(state).or_insert([0.0; Action::COUNT])
    }

    /// Values for `state` without inserting
    pub fn get(&self, state: &EncodedState) -> Option<&ActionValues> {
        self.values.get(state)
    }

    /// Largest action-value of `state` (inserting it if absent)
    pub fn max_value(&mut self, state: EncodedState) -> f64 {
        self.entry(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Index of the best action for `state`; ties go to the lowest index
    pub fn best_action(&mut self, state: EncodedState) -> usize {
        argmax(self.entry(state))
    }

    /// Overwrite the values of one state
    pub fn insert(&mut self, state: EncodedState, values: ActionValues) {
        self.values.insert(state, values);
    }

    /// Number of known states
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EncodedState, &ActionValues)> {
        self.values.iter()
    }
}

/// First index holding the maximum value
pub fn argmax(values: &ActionValues) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = idx;
        }
    }
    best
}
