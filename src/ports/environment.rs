//! Environment port - discrete MDP interface

use std::collections::BTreeMap;

use crate::{
    Result,
    environment::{CellLabel, EnvironmentDetail},
    types::{Action, State, StepResult},
};

/// Environment trait - a finite, episodic Markov decision process
///
/// States and actions are dense indices. Every state returned by
/// [`Environment::reset`] or [`Environment::step`] lies in
/// `[0, num_states())`.
pub trait Environment: Send {
    /// Short human-readable name.
    fn name(&self) -> &str;

    /// Size of the state space.
    fn num_states(&self) -> usize;

    /// Size of the action space.
    fn num_actions(&self) -> usize;

    /// Start a new episode and return its initial state.
    fn reset(&mut self) -> State;

    /// Apply `action` to the current configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ActionOutOfRange`] for an unknown action; the
    /// environment is left untouched.
    fn step(&mut self, action: Action) -> Result<StepResult>;

    /// Number of grid rows used for display.
    fn grid_rows(&self) -> usize;

    /// Number of grid columns used for display.
    fn grid_cols(&self) -> usize;

    /// Labelled cells keyed by grid position `row * cols + col`.
    fn special_cells(&self) -> BTreeMap<usize, CellLabel>;

    /// Map a state onto its `(row, col)` grid cell.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StateOutOfRange`] for an unknown state.
    fn position(&self, state: State) -> Result<(usize, usize)>;

    /// Grid position `row * cols + col` of the current configuration.
    fn current_position(&self) -> usize;

    /// Short labels for each action index.
    fn action_labels(&self) -> &'static [&'static str];

    /// Environment-specific extension of a visualization snapshot.
    fn detail(&self) -> EnvironmentDetail {
        EnvironmentDetail::Plain
    }

    /// Reseed any randomness used by `reset`. Deterministic environments
    /// ignore this.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
