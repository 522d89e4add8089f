//! Analysis configuration file schema.

use serde::{Deserialize, Serialize};

/// Current schema version written by this crate.
pub const LATEST_VERSION: u32 = 1;

/// One sensitivity study: a system, its parameter ranges and run settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "latest_version")]
    pub version: u32,
    pub name: String,
    pub system: SystemDef,
    pub initial_state: Vec<f64>,
    /// Ranges for every system parameter, in the system's parameter order.
    pub parameters: Vec<ParameterDef>,
    /// Parameter values for single trajectories (plots); not used by the
    /// analysis itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal: Option<Vec<f64>>,
    #[serde(default)]
    pub sampling: SamplingDef,
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default)]
    pub observable: ObservableDef,
    #[serde(default)]
    pub failure_policy: FailurePolicyDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

fn latest_version() -> u32 {
    LATEST_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SystemDef {
    Lorenz,
    Yang,
    DisturbedLorenz {
        #[serde(default = "default_sigma")]
        sigma: f64,
        #[serde(default = "default_rho")]
        rho: f64,
        #[serde(default = "default_beta")]
        beta: f64,
    },
}

fn default_sigma() -> f64 {
    10.0
}

fn default_rho() -> f64 {
    28.0
}

fn default_beta() -> f64 {
    8.0 / 3.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterDef {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingDef {
    /// Sobol base count `N`.
    pub num_samples: usize,
    /// Defaults to `num_samples` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morris_trajectories: Option<usize>,
    pub num_levels: usize,
    pub second_order: bool,
    pub scramble: bool,
    pub seed: u64,
    pub num_resamples: usize,
    pub conf_level: f64,
}

impl Default for SamplingDef {
    fn default() -> Self {
        Self {
            num_samples: 32,
            morris_trajectories: None,
            num_levels: 4,
            second_order: true,
            scramble: false,
            seed: 0,
            num_resamples: 100,
            conf_level: 0.95,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorDef {
    #[default]
    Dopri45,
    Rk4,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverDef {
    pub t_start: f64,
    pub t_end: f64,
    pub num_points: usize,
    pub rtol: f64,
    pub atol: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_step: Option<f64>,
    pub max_steps: usize,
    pub integrator: IntegratorDef,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            t_start: 0.0,
            t_end: 50.0,
            num_points: 10_000,
            rtol: 1e-3,
            atol: 1e-6,
            max_step: None,
            max_steps: 1_000_000,
            integrator: IntegratorDef::Dopri45,
        }
    }
}

/// Scalar output: a state component at the final time, or at a grid index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ObservableDef {
    pub component: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicyDef {
    #[default]
    FlagRow,
    FailFast,
}
