//! Q-learning and SARSA agents
//!
//! One agent type covers both algorithms: the update rule is a value, not a
//! subtype, and exploration is an injected [`ExplorationPolicy`].

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{exploration::ExplorationPolicy, q_table::QTable};
use crate::{
    Result,
    app::AgentConfig,
    error::check_range,
    ports::Agent,
    types::{Action, AgentKind, State, Transition},
    utils::build_rng,
};

/// Temporal-difference target used by [`TdAgent::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// Off-policy: bootstrap from `max_a' Q(s', a')`
    QLearning,
    /// On-policy: bootstrap from `Q(s', a')` for the action actually chosen
    Sarsa,
}

impl UpdateRule {
    /// TD target for `transition`.
    ///
    /// Terminal transitions bootstrap from 0 under both rules.
    pub fn target(self, q_table: &QTable, transition: &Transition, discount: f64) -> Result<f64> {
        let bootstrap = match self {
            UpdateRule::QLearning => q_table.max_q(transition.next_state)?,
            UpdateRule::Sarsa => q_table.get(transition.next_state, transition.next_action)?,
        };
        if transition.done {
            return Ok(transition.reward);
        }
        Ok(transition.reward + discount * bootstrap)
    }
}

impl From<AgentKind> for UpdateRule {
    fn from(kind: AgentKind) -> Self {
        if kind.is_on_policy() {
            UpdateRule::Sarsa
        } else {
            UpdateRule::QLearning
        }
    }
}

/// Tabular TD control agent
///
/// Composes a [`QTable`], an [`ExplorationPolicy`], and an [`UpdateRule`],
/// with a private seeded generator for every exploration draw.
#[derive(Debug, Clone)]
pub struct TdAgent {
    name: String,
    rule: UpdateRule,
    q_table: QTable,
    learning_rate: f64,
    discount_factor: f64,
    policy: ExplorationPolicy,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl TdAgent {
    /// Build an agent for a `num_states × num_actions` problem.
    ///
    /// # Errors
    ///
    /// Fails for zero dimensions, α outside `(0, 1]`, γ outside `[0, 1]`, or
    /// an invalid exploration schedule.
    pub fn new(num_states: usize, num_actions: usize, config: &AgentConfig) -> Result<Self> {
        let learning_rate = check_range("learning_rate", config.learning_rate, f64::MIN_POSITIVE, 1.0)?;
        let discount_factor = check_range("discount_factor", config.discount_factor, 0.0, 1.0)?;
        let q_table = QTable::new(num_states, num_actions, config.q_init)?;
        let policy = ExplorationPolicy::from_config(&config.exploration)?;
        let name = config
            .name
            .clone()
            .unwrap_or_else(|| config.kind.to_string());

        Ok(Self {
            name,
            rule: config.rule(),
            q_table,
            learning_rate,
            discount_factor,
            policy,
            rng: build_rng(config.seed),
            rng_seed: config.seed,
        })
    }

    /// Q-learning with the default α=0.5, γ=0.99, ε=0.1
    pub fn q_learning(num_states: usize, num_actions: usize) -> Result<Self> {
        Self::new(num_states, num_actions, &AgentConfig::for_kind(AgentKind::QLearning))
    }

    /// SARSA with the default α=0.5, γ=0.99, ε=0.1
    pub fn sarsa(num_states: usize, num_actions: usize) -> Result<Self> {
        Self::new(num_states, num_actions, &AgentConfig::for_kind(AgentKind::Sarsa))
    }

    /// Q-learning driven by softmax exploration with the default schedule
    pub fn boltzmann(num_states: usize, num_actions: usize) -> Result<Self> {
        Self::new(num_states, num_actions, &AgentConfig::for_kind(AgentKind::Boltzmann))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn policy(&self) -> &ExplorationPolicy {
        &self.policy
    }

    fn check_transition(&self, transition: &Transition) -> Result<()> {
        // validates both index pairs before anything is written
        self.q_table.get(transition.state, transition.action)?;
        self.q_table.get(transition.next_state, transition.next_action)?;
        Ok(())
    }
}

impl Agent for TdAgent {
    fn choose_action(&mut self, state: State) -> Result<Action> {
        self.policy.select(&self.q_table, state, &mut self.rng)
    }

    fn update(&mut self, transition: &Transition) -> Result<()> {
        self.check_transition(transition)?;
        let target = self
            .rule
            .target(&self.q_table, transition, self.discount_factor)?;
        self.q_table
            .td_update(transition.state, transition.action, target, self.learning_rate)?;
        Ok(())
    }

    fn decay_exploration(&mut self, episode: usize) {
        self.policy.decay(episode);
    }

    fn exploration_parameter(&self) -> f64 {
        self.policy.parameter()
    }

    fn q_table(&self) -> &QTable {
        &self.q_table
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    fn reset(&mut self) {
        self.q_table.reset();
        self.policy.reset();
        self.rng = build_rng(self.rng_seed);
    }
}
