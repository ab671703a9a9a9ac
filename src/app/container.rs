//! Dependency injection container for tdgrid experiments.
//!
//! The container decides how seeds flow into environments and agents and
//! provides factory methods for the domain objects an experiment needs.

use super::config::{AgentConfig, ExperimentConfig};
use crate::{
    Result,
    environment::GridWorld,
    pipeline::{Evaluator, TrainingPipeline},
    ports::Environment,
    q_learning::TdAgent,
    types::EnvironmentKind,
};

/// Application with dependency injection.
///
/// Centralizes creation and wiring of environments, agents, and pipelines.
/// A default seed, when set, applies to every object whose own
/// configuration does not carry one.
///
/// # Examples
///
/// ```
/// use tdgrid::app::{AgentConfig, App};
/// use tdgrid::types::{AgentKind, EnvironmentKind};
///
/// let app = App::for_testing().with_default_seed(42).build();
/// let env = app.create_environment(EnvironmentKind::HazardGrid);
/// let agent = app.create_agent(&AgentConfig::for_kind(AgentKind::Sarsa), &env)?;
/// # Ok::<(), tdgrid::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct App {
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with no default seed.
    pub fn new() -> Self {
        Self { default_seed: None }
    }

    /// Create a builder for constructing an app with custom settings.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Fresh environment of the requested kind, seeded with the default seed.
    pub fn create_environment(&self, kind: EnvironmentKind) -> GridWorld {
        GridWorld::from_kind(kind, self.default_seed)
    }

    /// Agent sized to `env`'s state and action spaces.
    ///
    /// The config's own seed wins over the container default.
    pub fn create_agent(&self, config: &AgentConfig, env: &dyn Environment) -> Result<TdAgent> {
        let mut config = config.clone();
        if config.seed.is_none() {
            config.seed = self.default_seed;
        }
        TdAgent::new(env.num_states(), env.num_actions(), &config)
    }

    /// Training pipeline for an experiment; the default seed fills in a
    /// missing training seed.
    pub fn create_pipeline(&self, experiment: &ExperimentConfig) -> TrainingPipeline {
        let mut training = experiment.training.clone();
        if training.seed.is_none() {
            training.seed = self.default_seed;
        }
        TrainingPipeline::new(training)
    }

    pub fn create_evaluator(&self, experiment: &ExperimentConfig) -> Evaluator {
        let mut evaluation = experiment.evaluation.clone();
        if evaluation.seed.is_none() {
            evaluation.seed = self.default_seed;
        }
        Evaluator::new(evaluation)
    }
}

/// Builder for constructing an app with custom settings.
///
/// Primarily used by tests to control randomness.
#[derive(Debug, Default)]
pub struct AppBuilder {
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self { default_seed: None }
    }

    /// Set a default random seed for everything created by this container.
    ///
    /// # Examples
    ///
    /// ```
    /// use tdgrid::app::AppBuilder;
    ///
    /// let app = AppBuilder::new().with_default_seed(42).build();
    /// assert_eq!(app.default_seed(), Some(42));
    /// ```
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured settings.
    pub fn build(self) -> App {
        App {
            default_seed: self.default_seed,
        }
    }
}
