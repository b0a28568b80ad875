//! Engine error types.

use thiserror::Error;

/// Errors raised while running a day simulation.
///
/// Deadline aborts are *not* errors — they are modeled outcomes,
/// reported as undone operations plus an interruption notification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A non-positive planned duration reached the duration sampler.
    ///
    /// Plan validation rejects these at construction; seeing this from
    /// a validated plan indicates a custom sampler misuse.
    #[error("invalid planned duration {minutes} min (must be > 0)")]
    InvalidDuration {
        /// The offending planned duration (minutes).
        minutes: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimulationError::InvalidDuration { minutes: -5.0 };
        assert_eq!(
            err.to_string(),
            "invalid planned duration -5 min (must be > 0)"
        );
    }
}
