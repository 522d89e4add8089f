//! Parameter designs for sensitivity analysis.
//!
//! Provides:
//! - A Sobol low-discrepancy sequence (via the `sobol` crate) with a seeded digital shift
//! - Saltelli radial designs for variance-based (Sobol) indices
//! - Morris one-at-a-time trajectory designs for screening
//! - A `Design` type whose rows carry their group/trajectory id

pub mod design;
pub mod morris;
pub mod saltelli;
pub mod sobol_seq;

pub use design::{Design, DesignRow, Scheme};
pub use morris::MorrisSampler;
pub use saltelli::SaltelliSampler;
pub use sobol_seq::{SobolSequence, max_dimensions};
