//! Utility functions for the tdgrid crate

use rand::{SeedableRng, rngs::StdRng};

use crate::{Error, Result};

/// Build a generator from an optional seed.
///
/// `None` draws a fresh seed from the thread-local generator, so unseeded
/// components are still independent of each other.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Normalize non-negative weights to probabilities that sum to 1.0.
///
/// # Returns
///
/// - `Some(Vec<f64>)` if the total weight is positive and finite
/// - `None` for an empty input or a zero/non-finite total
///
/// # Examples
///
/// ```
/// use tdgrid::utils::normalize_weights;
///
/// let normalized = normalize_weights(vec![1.0, 2.0, 1.0]).unwrap();
/// assert_eq!(normalized, vec![0.25, 0.5, 0.25]);
///
/// assert_eq!(normalize_weights(vec![0.0, 0.0]), None);
/// ```
pub fn normalize_weights<I>(weights: I) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = f64>,
{
    let weights: Vec<f64> = weights.into_iter().collect();
    if weights.is_empty() {
        return None;
    }
    let sum: f64 = weights.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return None;
    }
    Some(weights.iter().map(|&w| w / sum).collect())
}

/// Inverse-CDF sampling against a single uniform draw `ticket` in `[0, 1)`.
///
/// Index `i` is chosen when `cdf[i-1] <= ticket < cdf[i]`, so entries with
/// zero probability are never returned. When accumulated rounding error
/// leaves the ticket above the final cumulative sum, the last index with
/// positive probability is returned.
///
/// # Errors
///
/// Returns [`Error::InvalidProbabilities`] if the vector is empty, holds a
/// negative or non-finite entry, or does not sum to 1 within `1e-6`.
///
/// # Examples
///
/// ```
/// use tdgrid::utils::sample_categorical;
///
/// assert_eq!(sample_categorical(&[0.25, 0.5, 0.25], 0.1)?, 0);
/// assert_eq!(sample_categorical(&[0.25, 0.5, 0.25], 0.6)?, 1);
/// assert_eq!(sample_categorical(&[0.25, 0.5, 0.25], 0.9)?, 2);
/// # Ok::<(), tdgrid::Error>(())
/// ```
pub fn sample_categorical(probabilities: &[f64], ticket: f64) -> Result<usize> {
    validate_probabilities(probabilities)?;
    let mut cumulative = 0.0;
    for (idx, p) in probabilities.iter().enumerate() {
        cumulative += p;
        if ticket < cumulative {
            return Ok(idx);
        }
    }
    Ok(probabilities
        .iter()
        .rposition(|p| *p > 0.0)
        .unwrap_or(probabilities.len() - 1))
}

/// Check that `probabilities` is a proper distribution.
pub fn validate_probabilities(probabilities: &[f64]) -> Result<()> {
    if probabilities.is_empty() {
        return Err(Error::InvalidProbabilities {
            reason: "empty vector".to_string(),
        });
    }
    if let Some(bad) = probabilities
        .iter()
        .find(|p| !p.is_finite() || **p < 0.0)
    {
        return Err(Error::InvalidProbabilities {
            reason: format!("entry {bad} is negative or not finite"),
        });
    }
    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > 1e-6 {
        return Err(Error::InvalidProbabilities {
            reason: format!("entries sum to {total}, expected 1"),
        });
    }
    Ok(())
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Mean of the trailing `window` values (all of them if fewer exist).
pub fn trailing_mean(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    mean(&values[start..])
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_build_rng_is_reproducible_with_seed() {
        let mut a = build_rng(Some(12345));
        let mut b = build_rng(Some(12345));
        let xs: Vec<u64> = (0..5).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..5).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_sample_categorical_edges() {
        let probs = [0.5, 0.5];
        assert_eq!(sample_categorical(&probs, 0.0).unwrap(), 0);
        assert_eq!(sample_categorical(&probs, 0.499999).unwrap(), 0);
        assert_eq!(sample_categorical(&probs, 0.5).unwrap(), 1);
        assert_eq!(sample_categorical(&probs, 0.999999).unwrap(), 1);
        assert_eq!(sample_categorical(&[0.0, 1.0, 0.0], 0.0).unwrap(), 1);
        assert_eq!(sample_categorical(&[0.6, 0.4, 0.0], 1.0).unwrap(), 1);
    }

    #[test]
    fn test_sample_categorical_rejects_malformed_vectors() {
        assert!(sample_categorical(&[], 0.5).is_err());
        assert!(sample_categorical(&[0.5, 0.6], 0.5).is_err());
        assert!(sample_categorical(&[1.5, -0.5], 0.5).is_err());
        assert!(sample_categorical(&[f64::NAN, 1.0], 0.5).is_err());
    }

    #[test]
    fn normalize_weights_returns_none_for_zero_total() {
        assert!(normalize_weights(vec![0.0, 0.0]).is_none());
        assert!(normalize_weights(Vec::new()).is_none());
    }

    #[test]
    fn test_trailing_mean_window() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(trailing_mean(&values, 2), 3.5);
        assert_eq!(trailing_mean(&values, 10), 2.5);
        assert_eq!(trailing_mean(&[], 10), 0.0);
    }
}
