//! Common test utilities for the tdgrid test suite.
//!
//! Shared rollout helpers used across multiple integration tests.

#![allow(dead_code)]

use rand::{Rng, SeedableRng, rngs::StdRng};
use tdgrid::{
    ports::Environment,
    q_learning::QTable,
    types::{Action, State},
};

/// Seeded generator for reproducible test rollouts.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Drive `env` with uniformly random actions for `steps` steps, resetting on
/// every terminal transition, and return every state observed.
pub fn random_walk(env: &mut dyn Environment, steps: usize, seed: u64) -> Vec<State> {
    let mut rng = rng(seed);
    let mut visited = vec![env.reset()];
    for _ in 0..steps {
        let action: Action = rng.random_range(0..env.num_actions());
        let outcome = env.step(action).expect("in-range action");
        visited.push(outcome.next_state);
        if outcome.done {
            visited.push(env.reset());
        }
    }
    visited
}

/// Follow the lowest-index greedy action from a fresh reset until the
/// episode ends or `max_steps` is reached. Returns the visited states and
/// the final reward.
pub fn greedy_rollout(
    q_table: &QTable,
    env: &mut dyn Environment,
    max_steps: usize,
) -> (Vec<State>, f64, bool) {
    let mut state = env.reset();
    let mut path = vec![state];
    for _ in 0..max_steps {
        let action = q_table.first_greedy_action(state).expect("state in range");
        let outcome = env.step(action).expect("in-range action");
        path.push(outcome.next_state);
        if outcome.done {
            return (path, outcome.reward, true);
        }
        state = outcome.next_state;
    }
    (path, 0.0, false)
}

/// Count how often each action index appears.
pub fn histogram(actions: &[Action], num_actions: usize) -> Vec<usize> {
    let mut counts = vec![0; num_actions];
    for &action in actions {
        counts[action] += 1;
    }
    counts
}
