use cs_analysis::AnalysisError;
use cs_project::{ProjectError, ValidationError};
use cs_sim::SimError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Simulation failed: {0}")]
    Sim(#[from] SimError),

    #[error("Unknown preset '{name}' (available: {available})")]
    UnknownPreset { name: String, available: String },

    #[error("Invalid arguments: {what}")]
    InvalidArgs { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
