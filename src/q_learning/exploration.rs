//! Action-selection strategies layered over a [`QTable`]
//!
//! Policies own only their schedule parameters. The random generator is
//! passed in by the owning agent so that one seed drives every draw.

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::q_table::QTable;
use crate::{
    Error, Result,
    app::ExplorationConfig,
    error::check_range,
    types::{Action, State},
    utils::{normalize_weights, sample_categorical},
};

/// Pick uniformly among all actions tying for the row maximum.
pub fn greedy_action(q_table: &QTable, state: State, rng: &mut StdRng) -> Result<Action> {
    let ties = q_table.greedy_actions(state)?;
    Ok(ties[rng.random_range(0..ties.len())])
}

/// Boltzmann distribution over one row of action values.
///
/// The row maximum is subtracted before exponentiation, so the largest term
/// is always `exp(0) = 1` and the sum can neither overflow nor vanish.
///
/// # Errors
///
/// Fails for an empty row or a temperature that is not strictly positive
/// and finite.
///
/// # Examples
///
/// ```
/// use tdgrid::q_learning::softmax_probabilities;
///
/// let probs = softmax_probabilities(&[2.0, 2.0], 1.0)?;
/// assert!((probs[0] - 0.5).abs() < 1e-12);
/// assert!((probs[1] - 0.5).abs() < 1e-12);
/// # Ok::<(), tdgrid::Error>(())
/// ```
pub fn softmax_probabilities(row: &[f64], temperature: f64) -> Result<Vec<f64>> {
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(Error::InvalidHyperparameter {
            name: "temperature",
            value: temperature,
            reason: "must be positive and finite",
        });
    }
    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    normalize_weights(row.iter().map(|q| ((q - max) / temperature).exp())).ok_or_else(|| {
        Error::InvalidProbabilities {
            reason: format!("softmax over {row:?} could not be normalised"),
        }
    })
}

/// ε-greedy exploration with multiplicative decay toward a floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedy {
    epsilon: f64,
    initial_epsilon: f64,
    decay: f64,
    min_epsilon: f64,
}

impl EpsilonGreedy {
    /// # Errors
    ///
    /// `epsilon` and `min_epsilon` must lie in `[0, 1]` with
    /// `min_epsilon <= epsilon`; `decay` must lie in `(0, 1]`.
    pub fn new(epsilon: f64, decay: f64, min_epsilon: f64) -> Result<Self> {
        check_range("epsilon", epsilon, 0.0, 1.0)?;
        check_range("min_epsilon", min_epsilon, 0.0, epsilon)?;
        check_range("epsilon_decay", decay, f64::MIN_POSITIVE, 1.0)?;
        Ok(Self {
            epsilon,
            initial_epsilon: epsilon,
            decay,
            min_epsilon,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// ε-greedy action selection
    pub fn select(&self, q_table: &QTable, state: State, rng: &mut StdRng) -> Result<Action> {
        if rng.random::<f64>() < self.epsilon {
            // explore; still validate the state
            q_table.row(state)?;
            Ok(rng.random_range(0..q_table.num_actions()))
        } else {
            greedy_action(q_table, state, rng)
        }
    }

    /// Decay epsilon after episode
    pub fn decay(&mut self) {
        self.epsilon = (self.epsilon * self.decay).max(self.min_epsilon);
    }

    pub fn reset(&mut self) {
        self.epsilon = self.initial_epsilon;
    }
}

/// Softmax exploration with an exponentially cooling temperature
///
/// After episode `k` the temperature is
/// `min + (initial − min) · exp(−rate · k)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boltzmann {
    temperature: f64,
    initial_temperature: f64,
    min_temperature: f64,
    decay_rate: f64,
}

impl Boltzmann {
    /// # Errors
    ///
    /// Temperatures must be positive and finite with
    /// `min_temperature <= initial_temperature`; `decay_rate` must be
    /// non-negative and finite.
    pub fn new(initial_temperature: f64, min_temperature: f64, decay_rate: f64) -> Result<Self> {
        check_range("temperature", initial_temperature, f64::MIN_POSITIVE, f64::MAX)?;
        check_range("min_temperature", min_temperature, f64::MIN_POSITIVE, initial_temperature)?;
        check_range("temperature_decay_rate", decay_rate, 0.0, f64::MAX)?;
        Ok(Self {
            temperature: initial_temperature,
            initial_temperature,
            min_temperature,
            decay_rate,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Action probabilities for `state` at the current temperature.
    pub fn probabilities(&self, q_table: &QTable, state: State) -> Result<Vec<f64>> {
        softmax_probabilities(q_table.row(state)?, self.temperature)
    }

    /// Sample by inverse CDF against one uniform draw.
    pub fn select(&self, q_table: &QTable, state: State, rng: &mut StdRng) -> Result<Action> {
        let probabilities = self.probabilities(q_table, state)?;
        sample_categorical(&probabilities, rng.random::<f64>())
    }

    pub fn decay(&mut self, episode: usize) {
        let span = self.initial_temperature - self.min_temperature;
        self.temperature = self.min_temperature + span * (-self.decay_rate * episode as f64).exp();
    }

    pub fn reset(&mut self) {
        self.temperature = self.initial_temperature;
    }
}

/// Exploration strategy owned by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExplorationPolicy {
    EpsilonGreedy(EpsilonGreedy),
    Boltzmann(Boltzmann),
}

impl ExplorationPolicy {
    pub fn from_config(config: &ExplorationConfig) -> Result<Self> {
        match *config {
            ExplorationConfig::EpsilonGreedy {
                epsilon,
                decay,
                min_epsilon,
            } => Ok(Self::EpsilonGreedy(EpsilonGreedy::new(
                epsilon,
                decay,
                min_epsilon,
            )?)),
            ExplorationConfig::Boltzmann {
                initial_temperature,
                min_temperature,
                decay_rate,
            } => Ok(Self::Boltzmann(Boltzmann::new(
                initial_temperature,
                min_temperature,
                decay_rate,
            )?)),
        }
    }

    pub fn select(&self, q_table: &QTable, state: State, rng: &mut StdRng) -> Result<Action> {
        match self {
            Self::EpsilonGreedy(policy) => policy.select(q_table, state, rng),
            Self::Boltzmann(policy) => policy.select(q_table, state, rng),
        }
    }

    /// Advance the schedule once `episode` has completed.
    pub fn decay(&mut self, episode: usize) {
        match self {
            Self::EpsilonGreedy(policy) => policy.decay(),
            Self::Boltzmann(policy) => policy.decay(episode),
        }
    }

    /// ε or temperature
    pub fn parameter(&self) -> f64 {
        match self {
            Self::EpsilonGreedy(policy) => policy.epsilon(),
            Self::Boltzmann(policy) => policy.temperature(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::EpsilonGreedy(policy) => policy.reset(),
            Self::Boltzmann(policy) => policy.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_softmax_equal_row_is_uniform() {
        let probs = softmax_probabilities(&[2.0, 2.0], 1.0).unwrap();
        assert!((probs[0] - 0.5).abs() < 1e-12);
        assert!((probs[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_softmax_survives_extreme_values() {
        let probs = softmax_probabilities(&[1000.0, 999.0, -1e6], 1.0).unwrap();
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        let expected = 1.0 / (1.0 + (-1.0f64).exp());
        assert!((probs[0] - expected).abs() < 1e-12);
        assert_eq!(probs[2], 0.0);
    }

    #[test]
    fn test_softmax_rejects_bad_temperature() {
        assert!(softmax_probabilities(&[1.0], 0.0).is_err());
        assert!(softmax_probabilities(&[1.0], f64::NAN).is_err());
        assert!(softmax_probabilities(&[], 1.0).is_err());
    }

    #[test]
    fn test_epsilon_decay_is_monotone_and_floored() {
        let mut policy = EpsilonGreedy::new(0.5, 0.5, 0.1).unwrap();
        let mut previous = policy.epsilon();
        for _ in 0..10 {
            policy.decay();
            assert!(policy.epsilon() <= previous);
            previous = policy.epsilon();
        }
        assert_eq!(policy.epsilon(), 0.1);
        policy.reset();
        assert_eq!(policy.epsilon(), 0.5);
    }

    #[test]
    fn test_epsilon_validation() {
        assert!(EpsilonGreedy::new(1.5, 0.99, 0.0).is_err());
        assert!(EpsilonGreedy::new(0.1, 0.0, 0.0).is_err());
        assert!(EpsilonGreedy::new(0.1, 0.99, 0.2).is_err());
    }

    #[test]
    fn test_greedy_with_zero_epsilon_follows_max() {
        let mut q = QTable::new(1, 4, 0.0).unwrap();
        q.set(0, 2, 1.0).unwrap();
        let policy = EpsilonGreedy::new(0.0, 1.0, 0.0).unwrap();
        let mut rng = rng();
        for _ in 0..50 {
            assert_eq!(policy.select(&q, 0, &mut rng).unwrap(), 2);
        }
    }

    #[test]
    fn test_full_exploration_covers_all_actions() {
        let mut q = QTable::new(1, 4, 0.0).unwrap();
        q.set(0, 0, 100.0).unwrap();
        let policy = EpsilonGreedy::new(1.0, 1.0, 1.0).unwrap();
        let mut rng = rng();
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[policy.select(&q, 0, &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_temperature_schedule() {
        let mut policy = Boltzmann::new(1.0, 0.01, 0.0005).unwrap();
        policy.decay(0);
        assert!((policy.temperature() - 1.0).abs() < 1e-12);
        policy.decay(1000);
        let expected = 0.01 + 0.99 * (-0.5f64).exp();
        assert!((policy.temperature() - expected).abs() < 1e-12);
        policy.decay(1_000_000);
        assert!((policy.temperature() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_boltzmann_prefers_higher_values() {
        let mut q = QTable::new(1, 2, 0.0).unwrap();
        q.set(0, 1, 3.0).unwrap();
        let policy = Boltzmann::new(1.0, 0.01, 0.0).unwrap();
        let mut rng = rng();
        let picks = (0..2000)
            .filter(|_| policy.select(&q, 0, &mut rng).unwrap() == 1)
            .count();
        // p(1) = 1 / (1 + e^-3) ≈ 0.953
        assert!(picks > 1800, "picked action 1 only {picks} times");
    }

    #[test]
    fn test_select_rejects_unknown_state() {
        let q = QTable::new(2, 2, 0.0).unwrap();
        let mut rng = rng();
        let explore = EpsilonGreedy::new(1.0, 1.0, 1.0).unwrap();
        assert!(explore.select(&q, 2, &mut rng).is_err());
        let softmax = Boltzmann::new(1.0, 0.1, 0.0).unwrap();
        assert!(softmax.select(&q, 2, &mut rng).is_err());
    }
}
