//! Training pipeline for tabular TD agents

use std::{fs::File, path::Path, thread, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::observers::StepSnapshot;
use crate::{
    Result,
    ports::{Agent, Environment, Observer},
    types::{State, Transition},
    utils::{mean, trailing_mean},
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Random seed; reseeds the agent and the environment before the first
    /// episode
    pub seed: Option<u64>,

    /// Episodes between progress log lines (0 disables them)
    pub log_interval: usize,

    /// Pause after every step, in milliseconds, while observers are attached
    pub step_delay_ms: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            seed: None,
            log_interval: 1000,
            step_delay_ms: None,
        }
    }
}

impl TrainingConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay_ms = Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
        self
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Name of the trained agent
    pub agent: String,

    /// Name of the environment it was trained on
    pub environment: String,

    /// Cumulative reward of every episode, in order
    pub episode_rewards: Vec<f64>,

    /// Number of steps of every episode, in order
    pub episode_lengths: Vec<usize>,

    /// Learned values, one row per state
    pub q_table: Vec<Vec<f64>>,

    /// ε or temperature after the last decay
    pub final_exploration: f64,
}

#[derive(Debug, Serialize)]
struct LearningCurveRow {
    episode: usize,
    reward: f64,
    length: usize,
    rolling_mean: f64,
}

impl TrainingResult {
    pub const DEFAULT_WINDOW: usize = 100;

    pub fn episodes(&self) -> usize {
        self.episode_rewards.len()
    }

    /// Mean reward over all episodes
    pub fn mean_reward(&self) -> f64 {
        mean(&self.episode_rewards)
    }

    /// Trailing mean over at most `window` episodes, ending at each episode.
    pub fn rolling_mean(&self, window: usize) -> Vec<f64> {
        let window = window.max(1);
        (1..=self.episode_rewards.len())
            .map(|end| trailing_mean(&self.episode_rewards[..end], window))
            .collect()
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }

    /// Write the learning curve as CSV:
    /// `episode,reward,length,rolling_mean` with a 100-episode window.
    pub fn export_rewards<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        let rolling = self.rolling_mean(Self::DEFAULT_WINDOW);
        for (episode, ((reward, length), rolling_mean)) in self
            .episode_rewards
            .iter()
            .zip(&self.episode_lengths)
            .zip(rolling)
            .enumerate()
        {
            writer.serialize(LearningCurveRow {
                episode,
                reward: *reward,
                length: *length,
                rolling_mean,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Training pipeline coupling one agent to one environment
///
/// Every episode follows the same shape: reset, choose the first action,
/// then repeatedly step, choose the next action, and only then update with
/// the full transition. On-policy updates depend on that ordering.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run training for `config.episodes` episodes.
    pub fn run(
        &mut self,
        agent: &mut dyn Agent,
        env: &mut dyn Environment,
    ) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed);
            env.set_rng_seed(seed.wrapping_add(1));
        }

        let episodes = self.config.episodes;
        info!(
            agent = agent.name(),
            environment = env.name(),
            episodes,
            "starting training"
        );

        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        let mut episode_rewards = Vec::with_capacity(episodes);
        let mut episode_lengths = Vec::with_capacity(episodes);

        for episode in 0..episodes {
            let (reward, steps) = self.run_episode(episode, agent, env)?;
            agent.decay_exploration(episode);
            episode_rewards.push(reward);
            episode_lengths.push(steps);

            for observer in &mut self.observers {
                observer.on_episode_end(episode, reward, steps)?;
            }

            let interval = self.config.log_interval;
            if interval > 0 && (episode + 1) % interval == 0 {
                debug!(
                    episode = episode + 1,
                    rolling_mean = trailing_mean(&episode_rewards, interval),
                    exploration = agent.exploration_parameter(),
                    "training progress"
                );
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult {
            agent: agent.name().to_string(),
            environment: env.name().to_string(),
            episode_rewards,
            episode_lengths,
            q_table: agent.q_table().snapshot(),
            final_exploration: agent.exploration_parameter(),
        };
        info!(
            agent = %result.agent,
            mean_reward = result.mean_reward(),
            final_exploration = result.final_exploration,
            "training finished"
        );
        Ok(result)
    }

    fn run_episode(
        &mut self,
        episode: usize,
        agent: &mut dyn Agent,
        env: &mut dyn Environment,
    ) -> Result<(f64, usize)> {
        let mut state: State = env.reset();
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }
        self.notify_step(&*env, episode, 0, 0.0)?;

        let mut action = agent.choose_action(state)?;
        let mut total_reward = 0.0;
        let mut steps = 0;

        loop {
            let outcome = env.step(action)?;
            let next_action = agent.choose_action(outcome.next_state)?;
            agent.update(&Transition::new(
                state,
                action,
                outcome.reward,
                outcome.next_state,
                next_action,
                outcome.done,
            ))?;

            total_reward += outcome.reward;
            steps += 1;
            self.notify_step(&*env, episode, steps, total_reward)?;

            if outcome.done {
                return Ok((total_reward, steps));
            }
            state = outcome.next_state;
            action = next_action;
        }
    }

    fn notify_step(
        &mut self,
        env: &dyn Environment,
        episode: usize,
        step: usize,
        cumulative_reward: f64,
    ) -> Result<()> {
        if self.observers.is_empty() {
            return Ok(());
        }
        let snapshot = StepSnapshot::capture(env, episode, step, cumulative_reward);
        for observer in &mut self.observers {
            observer.on_step(&snapshot)?;
        }
        if let Some(ms) = self.config.step_delay_ms {
            thread::sleep(Duration::from_millis(ms));
        }
        Ok(())
    }
}
