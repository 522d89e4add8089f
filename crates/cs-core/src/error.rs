use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Invalid configuration detected before any simulation runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Parameter space must have at least one variable")]
    NoVariables,

    #[error("Length mismatch: num_vars={num_vars}, names={names}, bounds={bounds}")]
    LengthMismatch {
        num_vars: usize,
        names: usize,
        bounds: usize,
    },

    #[error("Parameter name at index {index} is empty")]
    EmptyName { index: usize },

    #[error("Duplicate parameter name: {name}")]
    DuplicateName { name: String },

    #[error("Invalid bounds for {name}: lower={lower} must be < upper={upper}")]
    InvalidBounds { name: String, lower: f64, upper: f64 },

    #[error("Non-finite bound for {name}: [{lower}, {upper}]")]
    NonFiniteBound { name: String, lower: f64, upper: f64 },

    #[error("Invalid sampler setting: {what}")]
    InvalidSampler { what: String },

    #[error("Too many dimensions: {requested} requested, at most {max} supported")]
    TooManyDimensions { requested: usize, max: usize },

    #[error("Parameter arity mismatch: {field} takes {expected} parameters, space has {actual}")]
    ArityMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Initial state dimension mismatch: {field} has {expected} states, got {actual}")]
    StateDimensionMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
