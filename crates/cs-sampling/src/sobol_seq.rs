//! Sobol low-discrepancy sequence in base 2.
//!
//! Points come from the `sobol` crate with the Joe & Kuo D6 direction
//! numbers. This module skips the all-zero first point and layers an
//! optional seeded digital shift on top.

use cs_core::{ConfigError, ConfigResult};
use rand::Rng;
use sobol::{Sobol, SobolParams};
use sobol::params::JoeKuoD6;

const SHIFT_SCALE: f64 = (1_u64 << 32) as f64;

/// Highest dimension the direction-number table supports.
pub fn max_dimensions() -> usize {
    JoeKuoD6::standard().max_dims()
}

/// Sobol sequence generator over `[0, 1)^d`.
///
/// The first point returned is `(0.5, ..., 0.5)` (or its shifted image when
/// scrambled).
pub struct SobolSequence {
    inner: Sobol<f64>,
    dims: usize,
    shift: Option<Vec<u32>>,
}

impl SobolSequence {
    pub fn new(dims: usize) -> ConfigResult<Self> {
        if dims == 0 {
            return Err(ConfigError::InvalidSampler {
                what: "Sobol sequence needs at least one dimension".into(),
            });
        }
        let params = JoeKuoD6::standard();
        let max = params.max_dims();
        if dims > max {
            return Err(ConfigError::TooManyDimensions {
                requested: dims,
                max,
            });
        }

        let mut inner = Sobol::<f64>::new(dims, &params);
        // origin
        inner.next();
        Ok(Self {
            inner,
            dims,
            shift: None,
        })
    }

    /// Apply a random digital shift: every point is XOR-ed with one random
    /// 32-bit word per dimension. Preserves the low-discrepancy structure.
    pub fn scrambled<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.shift = Some((0..self.dims).map(|_| rng.r#gen()).collect());
        self
    }

    pub fn dimension(&self) -> usize {
        self.dims
    }

    /// Advance the sequence and return the next point, or `None` once the
    /// sequence is exhausted.
    pub fn next_point(&mut self) -> Option<Vec<f64>> {
        let point = self.inner.next()?;
        Some(match &self.shift {
            None => point,
            Some(shift) => point
                .iter()
                .zip(shift)
                .map(|(&u, &s)| f64::from(((u * SHIFT_SCALE) as u32) ^ s) / SHIFT_SCALE)
                .collect(),
        })
    }
}

impl Iterator for SobolSequence {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_point()
    }
}
