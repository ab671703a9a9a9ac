//! Tabular temporal-difference learning on discrete grid environments
//!
//! This crate provides:
//! - Four episodic grid MDPs behind one `Environment` port (cliff walking,
//!   deterministic frozen lake, taxi dispatch, and a foraging maze)
//! - Q-learning and SARSA agents over a dense Q-table, with ε-greedy or
//!   Boltzmann exploration
//! - A training pipeline with pluggable observers and a greedy evaluator
//! - Learning-curve summaries and text rendering of learned policies

pub mod analysis;
pub mod app;
pub mod cli;
pub mod environment;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;
pub mod utils;

pub use environment::{DispatchGrid, ForageGrid, GridWorld, HazardGrid, HoleGrid};
pub use error::{Error, Result};
pub use q_learning::{QTable, TdAgent, UpdateRule};
pub use types::{Action, AgentKind, EnvironmentKind, Reward, State, StepResult, Transition};
