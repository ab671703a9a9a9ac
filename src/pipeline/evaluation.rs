//! Greedy evaluation of a trained agent

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    Result,
    ports::{Agent, Environment},
    types::{Action, State},
    utils::build_rng,
};

/// Evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Number of evaluation episodes
    pub episodes: usize,

    /// Hard per-episode step ceiling
    pub max_steps: usize,

    /// Seed for the tie-breaking generator and environment resets
    pub seed: Option<u64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            max_steps: 999,
            seed: None,
        }
    }
}

impl EvaluationConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Outcome of one greedy episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    pub total_reward: f64,
    pub steps: usize,
    /// Terminated with a strictly positive final reward
    pub success: bool,
    /// Stopped by the step ceiling before reaching a terminal state
    pub truncated: bool,
}

/// Aggregated evaluation statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub episodes: usize,
    pub successes: usize,
    pub success_rate: f64,
    /// Mean length of the successful episodes, `None` without any success
    pub mean_steps_to_success: Option<f64>,
    pub mean_reward: f64,
    /// Episodes cut off by the step ceiling
    pub truncated: usize,
}

impl EvaluationResult {
    fn from_outcomes(outcomes: &[EpisodeOutcome]) -> Self {
        let episodes = outcomes.len();
        let successes = outcomes.iter().filter(|o| o.success).count();
        let success_steps: usize = outcomes.iter().filter(|o| o.success).map(|o| o.steps).sum();
        let total_reward: f64 = outcomes.iter().map(|o| o.total_reward).sum();
        let ratio = |n: f64| if episodes == 0 { 0.0 } else { n / episodes as f64 };

        Self {
            episodes,
            successes,
            success_rate: ratio(successes as f64),
            mean_steps_to_success: (successes > 0)
                .then(|| success_steps as f64 / successes as f64),
            mean_reward: ratio(total_reward),
            truncated: outcomes.iter().filter(|o| o.truncated).count(),
        }
    }
}

/// Runs exploration-free episodes against a frozen value table
///
/// The agent is only read. Actions are the lowest-indexed row maximum; a
/// row where every action ties exactly (typically unvisited) falls back to a
/// uniform draw from the evaluator's own generator.
pub struct Evaluator {
    config: EvaluationConfig,
    rng: StdRng,
}

impl Evaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        let rng = build_rng(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Greedy action for `state`.
    pub fn greedy_action(&mut self, agent: &dyn Agent, state: State) -> Result<Action> {
        let q_table = agent.q_table();
        if q_table.is_row_uniform(state)? {
            return Ok(self.rng.random_range(0..q_table.num_actions()));
        }
        q_table.first_greedy_action(state)
    }

    /// Run `config.episodes` episodes, each from a fresh reset.
    pub fn evaluate(
        &mut self,
        agent: &dyn Agent,
        env: &mut dyn Environment,
    ) -> Result<EvaluationResult> {
        if let Some(seed) = self.config.seed {
            env.set_rng_seed(seed.wrapping_add(2));
        }

        let mut outcomes = Vec::with_capacity(self.config.episodes);
        for _ in 0..self.config.episodes {
            let state = env.reset();
            outcomes.push(self.run_episode_from(agent, env, state)?);
        }

        let result = EvaluationResult::from_outcomes(&outcomes);
        info!(
            agent = agent.name(),
            environment = env.name(),
            episodes = result.episodes,
            success_rate = result.success_rate,
            mean_reward = result.mean_reward,
            "evaluation finished"
        );
        Ok(result)
    }

    /// Run one greedy episode from `state` without resetting `env`.
    ///
    /// `env` must already be in `state`, e.g. after
    /// [`DispatchGrid::set_state`](crate::environment::DispatchGrid::set_state).
    pub fn run_episode_from(
        &mut self,
        agent: &dyn Agent,
        env: &mut dyn Environment,
        state: State,
    ) -> Result<EpisodeOutcome> {
        let mut state = state;
        let mut total_reward = 0.0;

        for step in 1..=self.config.max_steps {
            let action = self.greedy_action(agent, state)?;
            let outcome = env.step(action)?;
            total_reward += outcome.reward;
            if outcome.done {
                return Ok(EpisodeOutcome {
                    total_reward,
                    steps: step,
                    success: outcome.reward > 0.0,
                    truncated: false,
                });
            }
            state = outcome.next_state;
        }

        warn!(
            agent = agent.name(),
            environment = env.name(),
            max_steps = self.config.max_steps,
            "evaluation episode hit the step ceiling"
        );
        Ok(EpisodeOutcome {
            total_reward,
            steps: self.config.max_steps,
            success: false,
            truncated: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        environment::{HazardGrid, HoleGrid},
        q_learning::TdAgent,
    };

    #[test]
    fn test_untrained_agent_on_hazard_grid_is_bounded() {
        let mut env = HazardGrid::new();
        let agent = TdAgent::q_learning(env.num_states(), env.num_actions()).unwrap();
        let mut evaluator = Evaluator::new(
            EvaluationConfig::default()
                .with_episodes(5)
                .with_max_steps(50)
                .with_seed(1),
        );
        let result = evaluator.evaluate(&agent, &mut env).unwrap();
        assert_eq!(result.episodes, 5);
        assert_eq!(result.successes, 0);
        assert_eq!(result.mean_steps_to_success, None);
        assert!(result.mean_reward < 0.0);
    }

    #[test]
    fn test_handcrafted_policy_reaches_hole_grid_goal() {
        let mut env = HoleGrid::new();
        let mut agent = TdAgent::q_learning(env.num_states(), env.num_actions()).unwrap();
        // 0 →1 →2 ↓6 ↓10 ↓14 →15
        for (state, action) in [(0, 1), (1, 1), (2, 2), (6, 2), (10, 2), (14, 1)] {
            agent
                .update(&crate::types::Transition::new(state, action, 1.0, 15, 0, true))
                .unwrap();
        }
        let mut evaluator = Evaluator::new(EvaluationConfig::default().with_episodes(3).with_seed(0));
        let result = evaluator.evaluate(&agent, &mut env).unwrap();
        assert_eq!(result.success_rate, 1.0);
        assert_eq!(result.mean_steps_to_success, Some(6.0));
        assert_eq!(result.truncated, 0);
    }

    #[test]
    fn test_step_ceiling_truncates() {
        let mut env = HoleGrid::new();
        let mut agent = TdAgent::q_learning(env.num_states(), env.num_actions()).unwrap();
        // keep bumping into the top wall
        agent
            .update(&crate::types::Transition::new(0, 0, 1.0, 0, 0, true))
            .unwrap();
        let mut evaluator = Evaluator::new(EvaluationConfig::default().with_max_steps(10));
        let state = env.reset();
        let outcome = evaluator.run_episode_from(&agent, &mut env, state).unwrap();
        assert!(outcome.truncated);
        assert_eq!(outcome.steps, 10);
        assert!(!outcome.success);
    }
}
