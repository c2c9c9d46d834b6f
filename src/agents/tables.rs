//! Get-with-default table types backing the learning agents.
//!
//! Absent keys are semantically equivalent to the default value (0.0 for
//! estimates, 0 for visit counts), never an error. The defaulting lives here,
//! on explicit accessors, so it stays visible and testable independent of the
//! underlying map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Action, State};

/// State -> expected value, defaulting to 0.0 for unseen states.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<State, f64>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: &State) -> f64 {
        self.values.get(state).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: State, value: f64) {
        self.values.insert(state, value);
    }

    /// Number of states with an explicit entry.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether a state has an explicit entry (as opposed to the implicit default).
    pub fn contains(&self, state: &State) -> bool {
        self.values.contains_key(state)
    }
}

/// (State, Action) -> expected reward estimate, defaulting to 0.0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QTable {
    values: HashMap<(State, Action), f64>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: &State, action: Action) -> f64 {
        self.values.get(&(*state, action)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: State, action: Action, value: f64) {
        self.values.insert((state, action), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// (State, Action) -> visit count, defaulting to 0.
///
/// Counts only ever grow: the sole mutator is [`VisitCounts::record`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitCounts {
    counts: HashMap<(State, Action), u32>,
}

impl VisitCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: &State, action: Action) -> u32 {
        self.counts.get(&(*state, action)).copied().unwrap_or(0)
    }

    /// Increment the count for a pair, returning the post-increment value.
    pub fn record(&mut self, state: State, action: Action) -> u32 {
        let count = self.counts.entry((state, action)).or_insert(0);
        *count += 1;
        *count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        State::at_rest((1, 1))
    }

    #[test]
    fn value_table_defaults_to_zero() {
        let table = ValueTable::new();
        assert_eq!(table.get(&state()), 0.0);
        assert!(!table.contains(&state()));
    }

    #[test]
    fn value_table_set_get() {
        let mut table = ValueTable::new();
        table.set(state(), -3.5);
        assert_eq!(table.get(&state()), -3.5);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn q_table_defaults_to_zero() {
        let table = QTable::new();
        assert_eq!(table.get(&state(), Action::Coast), 0.0);
    }

    #[test]
    fn q_table_keys_include_the_action() {
        let mut table = QTable::new();
        table.set(state(), Action::Up, 1.5);
        assert_eq!(table.get(&state(), Action::Up), 1.5);
        assert_eq!(table.get(&state(), Action::Down), 0.0);
    }

    #[test]
    fn visit_counts_record_returns_post_increment() {
        let mut counts = VisitCounts::new();
        assert_eq!(counts.get(&state(), Action::Coast), 0);
        assert_eq!(counts.record(state(), Action::Coast), 1);
        assert_eq!(counts.record(state(), Action::Coast), 2);
        assert_eq!(counts.get(&state(), Action::Coast), 2);
    }
}
