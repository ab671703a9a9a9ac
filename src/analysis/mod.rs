//! Analysis tools for studying trained agents
//!
//! This module summarizes learning curves and renders learned greedy
//! policies as text grids.

pub mod policy;
pub mod stats;

pub use policy::{action_glyph, render_policy, render_position_policy};
pub use stats::RewardSummary;
