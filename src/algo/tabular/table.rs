use std::collections::{hash_map, HashMap};

use strum::VariantArray;

use crate::action::{Action, NUM_ACTIONS};

use super::Hashable;

/// Value estimates for every action of one state, indexed by [`Action::index`]
pub type Row = [f32; NUM_ACTIONS];

/// Mapping from state to per-action value estimates
///
/// Rows are created lazily with every action at `0.0` and are never removed,
/// so a row present in the table always covers the whole action set.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable<S: Hashable> {
    rows: HashMap<S, Row>,
}

impl<S: Hashable> Default for QTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Hashable> QTable<S> {
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    /// Get the row for `state`, inserting a zeroed one if the state is new
    pub fn row_mut(&mut self, state: S) -> &mut Row {
        self.rows.entry(state).or_insert([0.0; NUM_ACTIONS])
    }

    pub fn row(&self, state: &S) -> Option<&Row> {
        self.rows.get(state)
    }

    /// Value of `action` in `state`, `0.0` for unseen states
    pub fn value(&self, state: &S, action: Action) -> f32 {
        self.rows
            .get(state)
            .map_or(0.0, |row| row[action.index()])
    }

    /// Highest value over all actions of `state`, `0.0` for unseen states
    pub fn max_value(&self, state: &S) -> f32 {
        self.rows.get(state).map_or(0.0, |row| max_of(row))
    }

    /// Best action for `state`, `None` for unseen states
    pub fn best_action(&self, state: &S) -> Option<Action> {
        self.rows.get(state).map(greedy)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.rows.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, S, Row> {
        self.rows.iter()
    }
}

/// Action with the highest value in `row`
///
/// Ties go to the action that comes first in canonical order.
pub fn greedy(row: &Row) -> Action {
    let mut best = Action::VARIANTS[0];
    for &action in &Action::VARIANTS[1..] {
        if row[action.index()] > row[best.index()] {
            best = action;
        }
    }
    best
}

fn max_of(row: &Row) -> f32 {
    row.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}
