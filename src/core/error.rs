//! Error types shared by the simulation core
//!
//! All of these are precondition violations detected at the point of the
//! call. None are retried; they abort the run. Scrapping stalks or bast is
//! normal attrition and never shows up here.

use thiserror::Error;

use crate::core::config::ConfigError;

/// Errors raised by sampling, entity and stage operations
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid distribution parameters: {message}")]
    InvalidParameters { message: String },

    #[error("Degenerate beta distribution (alpha={alpha:.4}, beta={beta:.4}); variance too large for the mean")]
    DegenerateDistribution { alpha: f64, beta: f64 },

    #[error("Cannot handle bast width given as {count} value(s); expected 1 or 2")]
    InvalidWidthType { count: usize },

    #[error("Width {width:.3} mm is outside the bast's range [{end:.3}, {start:.3}]")]
    OutOfRange { width: f64, start: f64, end: f64 },

    #[error("Illegal state transition: cannot {operation} a {entity} in state '{state}' (allowed: {allowed})")]
    IllegalStateTransition {
        entity: &'static str,
        state: String,
        operation: String,
        allowed: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Shorthand for an `InvalidParameters` error
    pub fn invalid(message: impl Into<String>) -> Self {
        SimError::InvalidParameters {
            message: message.into(),
        }
    }

    /// True if this error reports an operation invoked in the wrong state
    pub fn is_illegal_transition(&self) -> bool {
        matches!(self, SimError::IllegalStateTransition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_transition_message() {
        let err = SimError::IllegalStateTransition {
            entity: "stalk",
            state: "fresh".to_string(),
            operation: "peel".to_string(),
            allowed: "dry".to_string(),
        };
        assert!(err.is_illegal_transition());
        assert_eq!(
            err.to_string(),
            "Illegal state transition: cannot peel a stalk in state 'fresh' (allowed: dry)"
        );
    }

    #[test]
    fn test_invalid_shorthand() {
        let err = SimError::invalid("min must not exceed max");
        assert!(matches!(err, SimError::InvalidParameters { .. }));
        assert!(!err.is_illegal_transition());
    }
}
