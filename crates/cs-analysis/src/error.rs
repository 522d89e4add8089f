//! Error types for batch evaluation and sensitivity analysis.

use cs_core::ConfigError;
use cs_sim::SimError;
use thiserror::Error;

/// Errors raised by the batch runner, the analyzers and the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Simulation of design row {row} failed: {source}")]
    Integration {
        row: usize,
        #[source]
        source: SimError,
    },

    #[error("Invalid solve options: {0}")]
    SolveOptions(#[source] SimError),

    #[error("Failed to build worker pool: {message}")]
    WorkerPool { message: String },

    #[error("Design shape error: output length {len} is not a multiple of group size {group_size}")]
    DesignShape { len: usize, group_size: usize },

    #[error("Output mismatch: design has {design} rows, output has {output} values")]
    OutputMismatch { design: usize, output: usize },

    #[error("Scheme mismatch: {analyzer} analyzer cannot read a {scheme} design")]
    SchemeMismatch {
        analyzer: &'static str,
        scheme: &'static str,
    },

    #[error("Insufficient groups: {valid} valid of {total}, at least {required} needed")]
    InsufficientGroups {
        valid: usize,
        total: usize,
        required: usize,
    },

    #[error("Output variance is zero; indices are undefined")]
    ZeroVariance,

    #[error("Malformed trajectory {trajectory}: step {step} changes {changed} coordinates")]
    MalformedTrajectory {
        trajectory: usize,
        step: usize,
        changed: usize,
    },

    #[error("Batch cancelled")]
    Cancelled,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    /// Design row the error is attributed to, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            AnalysisError::Integration { row, .. } => Some(*row),
            _ => None,
        }
    }
}
