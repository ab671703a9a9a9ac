//! Ports (trait boundaries) between the learning core and its collaborators.
//!
//! Agents, environments, and observers meet only through these traits, so
//! the training pipeline never needs to know which concrete variant it is
//! driving.

pub mod agent;
pub mod environment;
pub mod observer;

pub use agent::Agent;
pub use environment::Environment;
pub use observer::Observer;
