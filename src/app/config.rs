//! Configuration types for agent creation and whole experiments.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::{EvaluationConfig, TrainingConfig},
    q_learning::UpdateRule,
    types::{AgentKind, EnvironmentKind},
};

/// Exploration schedule for a new agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ExplorationConfig {
    /// ε-greedy with `ε ← max(min_epsilon, ε · decay)` after every episode
    EpsilonGreedy {
        epsilon: f64,
        decay: f64,
        min_epsilon: f64,
    },
    /// Softmax with `τ = min + (initial − min) · exp(−decay_rate · episode)`
    Boltzmann {
        initial_temperature: f64,
        min_temperature: f64,
        decay_rate: f64,
    },
}

impl ExplorationConfig {
    pub const DEFAULT_EPSILON: f64 = 0.1;
    pub const DEFAULT_EPSILON_DECAY: f64 = 0.999;
    pub const DEFAULT_MIN_EPSILON: f64 = 0.01;
    pub const DEFAULT_TEMPERATURE: f64 = 1.0;
    pub const DEFAULT_MIN_TEMPERATURE: f64 = 0.01;
    pub const DEFAULT_TEMPERATURE_DECAY: f64 = 0.0005;

    /// ε-greedy starting at `epsilon` with the default decay and floor.
    ///
    /// The floor is lowered to `epsilon` when `epsilon` is already below it.
    pub fn epsilon_greedy(epsilon: f64) -> Self {
        ExplorationConfig::EpsilonGreedy {
            epsilon,
            decay: Self::DEFAULT_EPSILON_DECAY,
            min_epsilon: Self::DEFAULT_MIN_EPSILON.min(epsilon),
        }
    }

    /// Softmax exploration with the default cooling schedule.
    pub fn boltzmann() -> Self {
        ExplorationConfig::Boltzmann {
            initial_temperature: Self::DEFAULT_TEMPERATURE,
            min_temperature: Self::DEFAULT_MIN_TEMPERATURE,
            decay_rate: Self::DEFAULT_TEMPERATURE_DECAY,
        }
    }
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self::epsilon_greedy(Self::DEFAULT_EPSILON)
    }
}

/// Configuration for creating a TD agent.
///
/// Builder-style: start from [`AgentConfig::for_kind`] (or `default()`) and
/// override individual fields. Values are validated when the agent is built.
///
/// When deserialised, fields missing from the input take the defaults of the
/// given `kind`, so `{"kind": "boltzmann"}` explores with softmax.
///
/// # Examples
///
/// ```
/// use tdgrid::app::{AgentConfig, ExplorationConfig};
/// use tdgrid::types::AgentKind;
///
/// let config = AgentConfig::for_kind(AgentKind::Sarsa)
///     .with_seed(42)
///     .with_learning_rate(0.1)
///     .with_exploration(ExplorationConfig::epsilon_greedy(0.2));
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AgentConfigFile")]
pub struct AgentConfig {
    /// Algorithm flavour; decides the update rule
    pub kind: AgentKind,
    /// Step size α
    pub learning_rate: f64,
    /// Discount γ
    pub discount_factor: f64,
    /// Initial value of every table entry
    pub q_init: f64,
    pub exploration: ExplorationConfig,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Display name; defaults to the kind's label
    pub name: Option<String>,
}

impl AgentConfig {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.5;
    pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.99;

    /// Defaults for `kind`: α=0.5, γ=0.99, q_init=0, ε-greedy at 0.1 for
    /// Q-learning and SARSA, the default softmax schedule for Boltzmann.
    pub fn for_kind(kind: AgentKind) -> Self {
        let exploration = match kind {
            AgentKind::Boltzmann => ExplorationConfig::boltzmann(),
            AgentKind::QLearning | AgentKind::Sarsa => ExplorationConfig::default(),
        };
        Self {
            kind,
            learning_rate: Self::DEFAULT_LEARNING_RATE,
            discount_factor: Self::DEFAULT_DISCOUNT_FACTOR,
            q_init: 0.0,
            exploration,
            seed: None,
            name: None,
        }
    }

    /// Update rule implied by the kind.
    pub fn rule(&self) -> UpdateRule {
        UpdateRule::from(self.kind)
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Start every table entry at `q_init` (optimistic when positive).
    pub fn with_q_init(mut self, q_init: f64) -> Self {
        self.q_init = q_init;
        self
    }

    pub fn with_exploration(mut self, exploration: ExplorationConfig) -> Self {
        self.exploration = exploration;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::for_kind(AgentKind::QLearning)
    }
}

/// On-disk form of [`AgentConfig`]; every field optional.
#[derive(Deserialize)]
struct AgentConfigFile {
    kind: Option<AgentKind>,
    learning_rate: Option<f64>,
    discount_factor: Option<f64>,
    q_init: Option<f64>,
    exploration: Option<ExplorationConfig>,
    seed: Option<u64>,
    name: Option<String>,
}

impl From<AgentConfigFile> for AgentConfig {
    fn from(file: AgentConfigFile) -> Self {
        let defaults = AgentConfig::for_kind(file.kind.unwrap_or(AgentKind::QLearning));
        Self {
            learning_rate: file.learning_rate.unwrap_or(defaults.learning_rate),
            discount_factor: file.discount_factor.unwrap_or(defaults.discount_factor),
            q_init: file.q_init.unwrap_or(defaults.q_init),
            exploration: file.exploration.unwrap_or(defaults.exploration),
            seed: file.seed,
            name: file.name,
            ..defaults
        }
    }
}

/// Everything needed to reproduce one experiment, loadable from JSON.
///
/// Missing fields take their defaults, so a file may be as small as
/// `{"environment": "hole-grid"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub environment: EnvironmentKind,
    pub agents: Vec<AgentConfig>,
    pub training: TrainingConfig,
    pub evaluation: EvaluationConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentKind::HazardGrid,
            agents: vec![
                AgentConfig::for_kind(AgentKind::QLearning),
                AgentConfig::for_kind(AgentKind::Sarsa),
            ],
            training: TrainingConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load an experiment description from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read experiment config {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Io {
            operation: format!("write experiment config {}", path.display()),
            source,
        })
    }
}
