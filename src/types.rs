//! Core value types shared by agents, environments, and pipelines

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Index into an environment's finite state space `[0, num_states)`.
pub type State = usize;

/// Index into an environment's action space `[0, num_actions)`.
pub type Action = usize;

/// Scalar reward emitted by a single environment step.
pub type Reward = f64;

/// Outcome of one environment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub next_state: State,
    pub reward: Reward,
    pub done: bool,
}

impl StepResult {
    pub fn new(next_state: State, reward: Reward, done: bool) -> Self {
        Self {
            next_state,
            reward,
            done,
        }
    }
}

/// Full SARSA quintuple plus the terminal flag.
///
/// `next_action` is the action the behaviour policy has already committed to
/// for `next_state`. Off-policy updates ignore it; on-policy updates bootstrap
/// from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: State,
    pub action: Action,
    pub reward: Reward,
    pub next_state: State,
    pub next_action: Action,
    pub done: bool,
}

impl Transition {
    pub fn new(
        state: State,
        action: Action,
        reward: Reward,
        next_state: State,
        next_action: Action,
        done: bool,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            next_action,
            done,
        }
    }
}

/// Built-in agent flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    /// Off-policy TD control with ε-greedy exploration
    #[serde(alias = "q_learning", alias = "qlearning", alias = "q")]
    QLearning,
    /// On-policy TD control with ε-greedy exploration
    Sarsa,
    /// Off-policy TD control with softmax exploration
    #[serde(alias = "softmax")]
    Boltzmann,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::QLearning, AgentKind::Sarsa, AgentKind::Boltzmann];

    /// True when the update bootstraps from the action actually taken next.
    pub fn is_on_policy(self) -> bool {
        matches!(self, AgentKind::Sarsa)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgentKind::QLearning => "Q-Learning",
            AgentKind::Sarsa => "SARSA",
            AgentKind::Boltzmann => "Boltzmann",
        };
        f.write_str(label)
    }
}

impl FromStr for AgentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q-learning" | "q_learning" | "qlearning" | "q" => Ok(AgentKind::QLearning),
            "sarsa" => Ok(AgentKind::Sarsa),
            "boltzmann" | "softmax" => Ok(AgentKind::Boltzmann),
            _ => Err(Error::UnknownName {
                kind: "agent",
                input: s.to_string(),
                expected: "q-learning, sarsa, boltzmann",
            }),
        }
    }
}

/// Selector for the concrete environments bundled with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentKind {
    /// Cliff walking
    #[serde(alias = "hazard", alias = "cliff", alias = "cliff-walking")]
    HazardGrid,
    /// Deterministic frozen lake
    #[serde(alias = "hole", alias = "frozen-lake", alias = "frozenlake")]
    HoleGrid,
    /// Taxi pickup/drop-off
    #[serde(alias = "dispatch", alias = "taxi")]
    DispatchGrid,
    /// Mouse maze with food and water
    #[serde(alias = "forage", alias = "mouse", alias = "mouse-maze")]
    ForageGrid,
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EnvironmentKind::HazardGrid => "hazard-grid",
            EnvironmentKind::HoleGrid => "hole-grid",
            EnvironmentKind::DispatchGrid => "dispatch-grid",
            EnvironmentKind::ForageGrid => "forage-grid",
        };
        f.write_str(label)
    }
}

impl FromStr for EnvironmentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hazard-grid" | "hazard" | "cliff" | "cliff-walking" => Ok(EnvironmentKind::HazardGrid),
            "hole-grid" | "hole" | "frozen-lake" | "frozenlake" => Ok(EnvironmentKind::HoleGrid),
            "dispatch-grid" | "dispatch" | "taxi" => Ok(EnvironmentKind::DispatchGrid),
            "forage-grid" | "forage" | "mouse" | "mouse-maze" => Ok(EnvironmentKind::ForageGrid),
            _ => Err(Error::UnknownName {
                kind: "environment",
                input: s.to_string(),
                expected: "hazard-grid, hole-grid, dispatch-grid, forage-grid",
            }),
        }
    }
}
