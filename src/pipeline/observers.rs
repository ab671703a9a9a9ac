//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::mpsc::{SyncSender, TrySendError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    environment::EnvironmentDetail,
    ports::{Environment, Observer},
    utils::{mean, trailing_mean},
};

/// State of the episode after one step, for visualization
///
/// Serialises flat: the environment-specific detail fields sit beside the
/// common ones, tagged by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// Grid cell index `row * cols + col`
    pub position: usize,
    pub episode: usize,
    /// Steps taken so far in this episode (0 right after reset)
    pub step: usize,
    pub cumulative_reward: f64,
    #[serde(flatten)]
    pub detail: EnvironmentDetail,
}

impl StepSnapshot {
    /// Snapshot `env` as it stands now.
    pub fn capture(
        env: &dyn Environment,
        episode: usize,
        step: usize,
        cumulative_reward: f64,
    ) -> Self {
        Self {
            position: env.current_position(),
            episode,
            step,
            cumulative_reward,
            detail: env.detail(),
        }
    }
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    recent: Vec<f64>,
}

impl ProgressObserver {
    const WINDOW: usize = 100;

    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            recent: Vec::new(),
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (avg:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.recent.clear();
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, total_reward: f64, _steps: usize) -> Result<()> {
        self.recent.push(total_reward);
        if self.recent.len() > Self::WINDOW {
            self.recent.remove(0);
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(format!("{:.2}", mean(&self.recent)));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{:.2}", mean(&self.recent)));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks per-episode rewards and lengths
pub struct MetricsObserver {
    window: usize,
    rewards: Vec<f64>,
    lengths: Vec<usize>,
    steps_seen: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer with a 100-episode rolling window
    pub fn new() -> Self {
        Self::with_window(100)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            window: window.max(1),
            rewards: Vec::new(),
            lengths: Vec::new(),
            steps_seen: 0,
        }
    }

    pub fn episodes(&self) -> usize {
        self.rewards.len()
    }

    pub fn mean_reward(&self) -> f64 {
        mean(&self.rewards)
    }

    /// Mean reward over the most recent window
    pub fn rolling_reward(&self) -> f64 {
        trailing_mean(&self.rewards, self.window)
    }

    /// Get average episode length
    pub fn avg_episode_length(&self) -> f64 {
        if self.lengths.is_empty() {
            0.0
        } else {
            self.lengths.iter().sum::<usize>() as f64 / self.lengths.len() as f64
        }
    }

    /// Step snapshots received, including the one emitted at each reset
    pub fn steps_seen(&self) -> usize {
        self.steps_seen
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes(),
            mean_reward: self.mean_reward(),
            rolling_reward: self.rolling_reward(),
            best_reward: self.rewards.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            avg_episode_length: self.avg_episode_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub mean_reward: f64,
    pub rolling_reward: f64,
    pub best_reward: f64,
    pub avg_episode_length: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, _snapshot: &StepSnapshot) -> Result<()> {
        self.steps_seen += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, total_reward: f64, steps: usize) -> Result<()> {
        self.rewards.push(total_reward);
        self.lengths.push(steps);
        Ok(())
    }
}

/// JSONL observer - Exports step snapshots to JSON Lines format
///
/// One line per step. `every` keeps only every n-th episode so long runs
/// stay manageable.
pub struct JsonlObserver {
    writer: BufWriter<File>,
    every: usize,
    recording: bool,
}

impl JsonlObserver {
    /// Create a new JSONL observer recording every episode
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            every: 1,
            recording: true,
        })
    }

    /// Record only episodes whose index is a multiple of `every`
    pub fn every_nth_episode(mut self, every: usize) -> Self {
        self.every = every.max(1);
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.recording = episode % self.every == 0;
        Ok(())
    }

    fn on_step(&mut self, snapshot: &StepSnapshot) -> Result<()> {
        if self.recording {
            serde_json::to_writer(&mut self.writer, snapshot)?;
            writeln!(&mut self.writer)?;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, _total_reward: f64, _steps: usize) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Channel observer - best-effort feed for a live viewer
///
/// Uses `try_send` on a bounded channel, so a slow or vanished receiver
/// never blocks training. Snapshots that do not fit are dropped and
/// counted.
pub struct ChannelObserver {
    sender: SyncSender<StepSnapshot>,
    dropped: usize,
}

impl ChannelObserver {
    pub fn new(sender: SyncSender<StepSnapshot>) -> Self {
        Self { sender, dropped: 0 }
    }

    /// Snapshots lost because the channel was full or disconnected
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl Observer for ChannelObserver {
    fn on_step(&mut self, snapshot: &StepSnapshot) -> Result<()> {
        match self.sender.try_send(*snapshot) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => self.dropped += 1,
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if self.dropped > 0 {
            tracing::debug!(dropped = self.dropped, "snapshots dropped by channel observer");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::environment::{DispatchGrid, HoleGrid};

    fn snapshot(step: usize) -> StepSnapshot {
        StepSnapshot {
            position: 0,
            episode: 0,
            step,
            cumulative_reward: 0.0,
            detail: EnvironmentDetail::Plain,
        }
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let env = DispatchGrid::with_seed(1);
        let snap = StepSnapshot::capture(&env, 3, 7, -7.0);
        let json = serde_json::to_value(snap).unwrap();
        assert_eq!(json["episode"], 3);
        assert_eq!(json["step"], 7);
        assert_eq!(json["kind"], "dispatch");
        assert_eq!(json["passenger"], env.passenger());
        assert_eq!(json["destination"], env.destination());
    }

    #[test]
    fn test_plain_snapshot() {
        let env = HoleGrid::new();
        let snap = StepSnapshot::capture(&env, 0, 0, 0.0);
        assert_eq!(snap.position, 0);
        assert_eq!(snap.detail, EnvironmentDetail::Plain);
    }

    #[test]
    fn test_channel_observer_drops_when_full() {
        let (tx, rx) = mpsc::sync_channel(2);
        let mut observer = ChannelObserver::new(tx);
        for step in 0..5 {
            observer.on_step(&snapshot(step)).unwrap();
        }
        assert_eq!(observer.dropped(), 3);
        assert_eq!(rx.try_recv().unwrap().step, 0);
        assert_eq!(rx.try_recv().unwrap().step, 1);
    }

    #[test]
    fn test_channel_observer_survives_disconnect() {
        let (tx, rx) = mpsc::sync_channel(4);
        drop(rx);
        let mut observer = ChannelObserver::new(tx);
        assert!(observer.on_step(&snapshot(0)).is_ok());
        assert_eq!(observer.dropped(), 1);
    }

    #[test]
    fn test_metrics_observer_summary() {
        let mut observer = MetricsObserver::with_window(2);
        observer.on_episode_end(0, -10.0, 10).unwrap();
        observer.on_episode_end(1, -4.0, 4).unwrap();
        observer.on_episode_end(2, -2.0, 2).unwrap();
        let summary = observer.summary();
        assert_eq!(summary.episodes, 3);
        assert_eq!(summary.rolling_reward, -3.0);
        assert_eq!(summary.best_reward, -2.0);
        assert!((summary.avg_episode_length - 16.0 / 3.0).abs() < 1e-12);
    }
}
