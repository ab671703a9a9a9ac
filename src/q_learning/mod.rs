//! Q-learning and SARSA temporal difference learning
//!
//! This module implements tabular temporal difference (TD) control. TD
//! methods bootstrap value estimates from successor states, so every step
//! of experience refines the table without waiting for the episode to end.
//!
//! ## Algorithms
//!
//! - **Q-learning**: Off-policy TD control that learns optimal Q* values
//! - **SARSA**: On-policy TD control that learns Q^π for the followed policy
//!
//! ## Key Differences
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy (learns Q*) | On-policy (learns Q^π) |
//! | Update | Uses max_a Q(s',a') | Uses actual Q(s',a') |
//! | Exploration | Can be reckless | More conservative |
//! | Convergence | To optimal policy | To followed policy |
//!
//! Both rules share one [`TdAgent`]; exploration is either ε-greedy with
//! uniform tie-breaking or Boltzmann sampling with a cooling temperature.
//!
//! ## Usage Example
//!
//! ```
//! use tdgrid::{
//!     app::{AgentConfig, ExplorationConfig},
//!     q_learning::TdAgent,
//!     types::AgentKind,
//! };
//!
//! let q_agent = TdAgent::q_learning(48, 4)?;
//!
//! let config = AgentConfig::for_kind(AgentKind::Sarsa)
//!     .with_learning_rate(0.1)
//!     .with_exploration(ExplorationConfig::epsilon_greedy(0.2))
//!     .with_seed(42);
//! let sarsa_agent = TdAgent::new(48, 4, &config)?;
//! # Ok::<(), tdgrid::Error>(())
//! ```

pub mod agent;
pub mod exploration;
pub mod q_table;

// Public re-exports
pub use agent::{TdAgent, UpdateRule};
pub use exploration::{
    Boltzmann, EpsilonGreedy, ExplorationPolicy, greedy_action, softmax_probabilities,
};
pub use q_table::QTable;
