//! Statistical summaries of learning curves

use serde::{Deserialize, Serialize};

use crate::utils::{mean, trailing_mean};

/// Summary of a sequence of episode rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardSummary {
    pub episodes: usize,
    pub mean: f64,
    /// Mean over the last `window` episodes
    pub last_window_mean: f64,
    pub window: usize,
    pub best: f64,
    pub worst: f64,
}

impl RewardSummary {
    pub const DEFAULT_WINDOW: usize = 100;

    /// Summarize with the default 100-episode window.
    pub fn from_rewards(rewards: &[f64]) -> Self {
        Self::with_window(rewards, Self::DEFAULT_WINDOW)
    }

    /// Summarize; an empty slice yields zeros everywhere.
    pub fn with_window(rewards: &[f64], window: usize) -> Self {
        let window = window.max(1);
        let (best, worst) = if rewards.is_empty() {
            (0.0, 0.0)
        } else {
            rewards
                .iter()
                .fold((f64::NEG_INFINITY, f64::INFINITY), |(best, worst), &r| {
                    (best.max(r), worst.min(r))
                })
        };
        Self {
            episodes: rewards.len(),
            mean: mean(rewards),
            last_window_mean: trailing_mean(rewards, window),
            window,
            best,
            worst,
        }
    }
}
