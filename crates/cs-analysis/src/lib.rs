//! Sensitivity analysis of parameterized dynamical systems.
//!
//! Provides:
//! - `BatchRunner` evaluating a design in parallel with row-aligned outputs
//! - `SobolAnalyzer` (first, total and second order indices)
//! - `MorrisAnalyzer` (elementary effects)
//! - `analyze` / `analyze_with` tying sampling, simulation and analysis together

pub mod batch;
pub mod error;
pub mod morris;
pub mod pipeline;
pub mod sobol;
pub mod stats;

pub use batch::{BatchOptions, BatchRunner, CancelToken, FailurePolicy, RowFailure, SimulationOutput};
pub use error::{AnalysisError, AnalysisResult};
pub use morris::{MorrisAnalyzer, MorrisResult};
pub use pipeline::{AnalysisOptions, analyze, analyze_with};
pub use sobol::{SobolAnalyzer, SobolResult};
pub use stats::Bootstrap;
