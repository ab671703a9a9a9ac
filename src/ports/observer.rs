//! Observer port - abstraction for training observation and data collection
//!
//! Observers allow composable data collection without coupling the episode
//! loop to any output format. Every hook has a no-op default.

use crate::{Result, pipeline::StepSnapshot};

/// Observer trait for training and evaluation events
pub trait Observer: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after the environment has been reset.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every environment step (and once right after reset with
    /// `step == 0`).
    fn on_step(&mut self, _snapshot: &StepSnapshot) -> Result<()> {
        Ok(())
    }

    /// Called when an episode terminates.
    fn on_episode_end(&mut self, _episode: usize, _total_reward: f64, _steps: usize) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
