//! Sensitivity-analysis input domain.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::numeric::{Real, lerp};

/// Closed interval `[lower, upper]` with `lower < upper`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub lower: Real,
    pub upper: Real,
}

impl Bounds {
    pub fn width(&self) -> Real {
        self.upper - self.lower
    }

    /// Map a unit-interval coordinate onto this interval.
    ///
    /// Clamped so rounding never pushes `u = 1` past `upper`.
    pub fn scale(&self, u: Real) -> Real {
        lerp(self.lower, self.upper, u).clamp(self.lower, self.upper)
    }

    pub fn contains(&self, x: Real) -> bool {
        x >= self.lower && x <= self.upper
    }
}

impl From<(Real, Real)> for Bounds {
    fn from((lower, upper): (Real, Real)) -> Self {
        Self { lower, upper }
    }
}

/// Validated, immutable description of the parameters under analysis.
///
/// Construction fails with [`ConfigError`] when the lengths disagree, a name
/// is empty or repeated, or any interval is not finite with `lower < upper`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParameterSpace {
    names: Vec<String>,
    bounds: Vec<Bounds>,
}

impl ParameterSpace {
    pub fn new<S, B>(num_vars: usize, names: Vec<S>, bounds: Vec<B>) -> ConfigResult<Self>
    where
        S: Into<String>,
        B: Into<Bounds>,
    {
        if num_vars == 0 {
            return Err(ConfigError::NoVariables);
        }
        if names.len() != num_vars || bounds.len() != num_vars {
            return Err(ConfigError::LengthMismatch {
                num_vars,
                names: names.len(),
                bounds: bounds.len(),
            });
        }

        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let bounds: Vec<Bounds> = bounds.into_iter().map(Into::into).collect();

        let mut seen = HashSet::with_capacity(num_vars);
        for (index, (name, b)) in names.iter().zip(&bounds).enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyName { index });
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateName { name: name.clone() });
            }
            if !b.lower.is_finite() || !b.upper.is_finite() {
                return Err(ConfigError::NonFiniteBound {
                    name: name.clone(),
                    lower: b.lower,
                    upper: b.upper,
                });
            }
            if b.lower >= b.upper {
                return Err(ConfigError::InvalidBounds {
                    name: name.clone(),
                    lower: b.lower,
                    upper: b.upper,
                });
            }
        }

        Ok(Self { names, bounds })
    }

    pub fn num_vars(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Map a point of the unit hypercube onto the parameter bounds.
    pub fn scale_point(&self, unit: &[Real]) -> Vec<Real> {
        unit.iter()
            .zip(&self.bounds)
            .map(|(&u, b)| b.scale(u))
            .collect()
    }

    pub fn contains(&self, point: &[Real]) -> bool {
        point.len() == self.num_vars() && point.iter().zip(&self.bounds).all(|(&x, b)| b.contains(x))
    }
}
