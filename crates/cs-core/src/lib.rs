//! cs-core: stable foundation for chaosens.
//!
//! Contains:
//! - numeric (Real + tolerances + unit-interval helpers)
//! - space (validated sensitivity-analysis input domain)
//! - ids (compact group/row identifiers for designs)
//! - error (configuration errors shared by every crate)
//! - timing (accumulating timers for batch instrumentation)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod space;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{ConfigError, ConfigResult};
pub use ids::*;
pub use numeric::*;
pub use space::{Bounds, ParameterSpace};
