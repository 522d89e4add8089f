//! Continuous-time simulation of parameterized vector fields.
//!
//! Provides:
//! - `VectorField` trait for pluggable dynamical systems
//! - Lorenz, Yang and disturbed Lorenz systems
//! - Adaptive Dormand–Prince 5(4) solves (via `ode_solvers`) and a fixed-step RK4 integrator
//! - `solve` producing a trajectory on a uniform output grid
//! - Configurable scalar observables over a trajectory

pub mod error;
pub mod field;
pub mod integrator;
pub mod observable;
pub mod solve;
pub mod systems;

// Re-exports for public API
pub use error::{FailureReason, SimError, SimResult};
pub use field::VectorField;
pub use integrator::{Integrator, RK4, Step};
pub use observable::{Observable, ObservationTime};
pub use solve::{IntegratorType, SolveOptions, Trajectory, solve};
pub use systems::{DisturbedLorenz, Lorenz, Yang};
