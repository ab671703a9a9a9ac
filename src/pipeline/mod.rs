//! Training and evaluation pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Training an agent against an environment episode by episode
//! - Evaluating the learned greedy policy with a step ceiling
//! - Recording observations during training

pub mod evaluation;
pub mod observers;
pub mod training;

pub use evaluation::{EpisodeOutcome, EvaluationConfig, EvaluationResult, Evaluator};
// Re-export observer implementations (adapters)
pub use observers::{
    ChannelObserver, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
    StepSnapshot,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
