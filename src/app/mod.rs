//! Application layer with dependency injection container.
//!
//! This module wires the learning core together: configuration types
//! describe an experiment, and the container turns them into environments,
//! agents, and pipelines with a consistent seeding policy.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Application Layer (app)           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  App (DI Container) + configs        │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ creates                    │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Pipelines                           │   │
//! │  │  - TrainingPipeline, Evaluator       │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ drive                      │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Ports (ports)                │   │
//! │  │  - Agent, Environment, Observer      │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ implemented by             │
//! │                 ▼                            │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Logic                        │   │
//! │  │  - TdAgent                           │   │
//! │  │  - GridWorld variants                │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use tdgrid::app::{App, ExperimentConfig};
//!
//! let app = App::for_testing().with_default_seed(42).build();
//! let experiment = ExperimentConfig::default();
//! let env = app.create_environment(experiment.environment);
//! let agent = app.create_agent(&experiment.agents[0], &env)?;
//! # Ok::<(), tdgrid::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{AgentConfig, ExperimentConfig, ExplorationConfig};
pub use container::{App, AppBuilder};
