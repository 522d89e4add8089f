//! Small descriptive statistics and bootstrap helpers shared by the analyzers.

use cs_core::{ConfigError, ConfigResult};
use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Variance with `ddof` delta degrees of freedom; NaN when `len <= ddof`.
pub fn variance(xs: &[f64], ddof: usize) -> f64 {
    if xs.len() <= ddof {
        return f64::NAN;
    }
    let m = mean(xs);
    xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (xs.len() - ddof) as f64
}

pub fn std_dev(xs: &[f64], ddof: usize) -> f64 {
    variance(xs, ddof).sqrt()
}

/// Bootstrap settings shared by the Sobol and Morris analyzers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bootstrap {
    /// Resamples drawn per estimate.
    pub num_resamples: usize,
    /// Two-sided confidence level in `(0, 1)`.
    pub conf_level: f64,
    pub seed: u64,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            num_resamples: 100,
            conf_level: 0.95,
            seed: 0,
        }
    }
}

impl Bootstrap {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.num_resamples < 2 {
            return Err(ConfigError::InvalidArg {
                what: "num_resamples must be at least 2",
            });
        }
        if !(self.conf_level > 0.0 && self.conf_level < 1.0) {
            return Err(ConfigError::InvalidArg {
                what: "conf_level must lie strictly between 0 and 1",
            });
        }
        Ok(())
    }

    /// Standard normal quantile for the two-sided interval, e.g. 1.96 at 0.95.
    pub fn z_score(&self) -> ConfigResult<f64> {
        self.validate()?;
        let normal = Normal::new(0.0, 1.0).map_err(|_| ConfigError::InvalidArg {
            what: "standard normal distribution unavailable",
        })?;
        Ok(normal.inverse_cdf(0.5 + self.conf_level / 2.0))
    }

    /// Half-width `z * std(estimates, ddof = 1)` over the finite estimates;
    /// NaN when fewer than two are finite.
    pub fn half_width(z: f64, estimates: &[f64]) -> f64 {
        let finite: Vec<f64> = estimates.iter().copied().filter(|x| x.is_finite()).collect();
        if finite.len() < 2 {
            return f64::NAN;
        }
        z * std_dev(&finite, 1)
    }
}

/// Indices `0..n` drawn with replacement, `n` of them.
pub fn resample_indices<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<usize> {
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{Tolerances, nearly_equal};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn mean_and_variance() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(mean(&xs), 2.5);
        assert_eq!(variance(&xs, 0), 1.25);
        assert!(nearly_equal(variance(&xs, 1), 5.0 / 3.0, Tolerances::default()));
        assert!(variance(&[1.0], 1).is_nan());
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn z_score_at_95_percent() {
        let z = Bootstrap::default().z_score().unwrap();
        assert!((z - 1.959964).abs() < 1e-5, "z={z}");
    }

    #[test]
    fn invalid_bootstrap_settings() {
        let mut b = Bootstrap::default();
        b.conf_level = 1.0;
        assert!(b.z_score().is_err());
        b.conf_level = 0.9;
        b.num_resamples = 1;
        assert!(b.validate().is_err());
    }

    #[test]
    fn half_width_ignores_non_finite_estimates() {
        assert_eq!(Bootstrap::half_width(2.0, &[1.0, 1.0, f64::NAN]), 0.0);
        assert!(Bootstrap::half_width(2.0, &[1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn resampled_indices_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let idx = resample_indices(&mut rng, 7);
        assert_eq!(idx.len(), 7);
        assert!(idx.iter().all(|&i| i < 7));
    }
}
