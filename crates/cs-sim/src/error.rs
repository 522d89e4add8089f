//! Error types for simulation operations.

use std::fmt;

use thiserror::Error;

/// Why an integration stopped before reaching the end of its time span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureReason {
    /// The state became NaN or infinite.
    NonFinite,
    /// The adaptive step shrank below the representable minimum.
    StepSizeUnderflow,
    /// The step budget ran out.
    MaxStepsExceeded,
    /// The adaptive solver's stiffness test fired repeatedly.
    StiffnessDetected,
    /// Dense output drifted off the requested time grid.
    OutputGridMismatch,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NonFinite => write!(f, "non-finite state"),
            FailureReason::StepSizeUnderflow => write!(f, "step size underflow"),
            FailureReason::MaxStepsExceeded => write!(f, "maximum step count exceeded"),
            FailureReason::StiffnessDetected => write!(f, "stiffness detected"),
            FailureReason::OutputGridMismatch => write!(f, "output off the time grid"),
        }
    }
}

/// Errors encountered while integrating a vector field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Integration failed at t={last_t} ({reason}) for parameters {params:?}")]
    IntegrationFailure {
        params: Vec<f64>,
        last_t: f64,
        reason: FailureReason,
    },

    #[error("Observable out of range: {what} (index={index}, len={len})")]
    ObservableOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Last time reached before an integration failure, if this is one.
    pub fn last_time(&self) -> Option<f64> {
        match self {
            SimError::IntegrationFailure { last_t, .. } => Some(*last_t),
            _ => None,
        }
    }
}
