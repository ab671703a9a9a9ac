//! Error types for the tdgrid crate

use thiserror::Error;

/// Main error type for the tdgrid crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid dimensions: {num_states} states x {num_actions} actions (both must be positive)")]
    InvalidDimensions {
        num_states: usize,
        num_actions: usize,
    },

    #[error("state {state} is out of range (must be < {num_states})")]
    StateOutOfRange { state: usize, num_states: usize },

    #[error("action {action} is out of range (must be < {num_actions})")]
    ActionOutOfRange { action: usize, num_actions: usize },

    #[error("invalid hyperparameter {name} = {value}: {reason}")]
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("malformed probability vector: {reason}")]
    InvalidProbabilities { reason: String },

    #[error("invalid layout: {message}")]
    InvalidLayout { message: String },

    #[error("unknown {kind} '{input}'. Expected one of: {expected}")]
    UnknownName {
        kind: &'static str,
        input: String,
        expected: &'static str,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),

        #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

/// Reject non-finite values or values outside `[min, max]`.
pub(crate) fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::InvalidHyperparameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value < min || value > max {
        return Err(Error::InvalidHyperparameter {
            name,
            value,
            reason: "outside the permitted range",
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_rejects_nan_and_out_of_range() {
        assert!(check_range("alpha", f64::NAN, 0.0, 1.0).is_err());
        assert!(check_range("alpha", 1.5, 0.0, 1.0).is_err());
        assert_eq!(check_range("alpha", 0.5, 0.0, 1.0).unwrap(), 0.5);
    }

    #[test]
    fn test_format_errors_convert() {
        let err: Error = std::fmt::Error.into();
        assert!(matches!(err, Error::Format(_)));
    }
}
