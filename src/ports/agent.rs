//! Agent port - abstraction over tabular value learners

use crate::{
    Result,
    q_learning::QTable,
    types::{Action, State, Transition},
};

/// Agent trait - unified interface for tabular TD learners
///
/// An agent owns exactly one [`QTable`]. It reads that table to pick actions
/// and mutates it only through [`Agent::update`].
///
/// # Examples
///
/// ```
/// use tdgrid::{
///     environment::HoleGrid,
///     ports::{Agent, Environment},
///     q_learning::TdAgent,
/// };
///
/// let mut env = HoleGrid::new();
/// let mut agent = TdAgent::q_learning(env.num_states(), env.num_actions())?.with_seed(7);
/// let state = env.reset();
/// let action = agent.choose_action(state)?;
/// assert!(action < env.num_actions());
/// # Ok::<(), tdgrid::Error>(())
/// ```
pub trait Agent: Send {
    /// Select an action for `state` using the agent's exploration policy.
    ///
    /// # Errors
    ///
    /// Returns an error if `state` is outside the table.
    fn choose_action(&mut self, state: State) -> Result<Action>;

    /// Apply one temporal-difference step for the given transition.
    ///
    /// # Errors
    ///
    /// Returns an error if any state or action index is outside the table.
    /// Nothing is written in that case.
    fn update(&mut self, transition: &Transition) -> Result<()>;

    /// Advance the exploration schedule after a completed episode.
    ///
    /// `episode` is the zero-based index of the episode that just finished.
    fn decay_exploration(&mut self, episode: usize);

    /// Current exploration parameter (ε or temperature).
    fn exploration_parameter(&self) -> f64;

    /// Read-only view of the learned values.
    fn q_table(&self) -> &QTable;

    /// Agent name used in logs and reports.
    fn name(&self) -> &str;

    /// Reseed the agent's private random number generator.
    fn set_rng_seed(&mut self, seed: u64);

    /// Forget everything learned and restore the initial exploration schedule.
    fn reset(&mut self);
}
