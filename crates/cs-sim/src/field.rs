//! VectorField trait for pluggable dynamical systems.

use nalgebra::DVector;

/// Derivative function `dx/dt = f(t, x; p)` of a parameterized system.
///
/// Implementations must be pure: the same `(t, x, params)` always yields the
/// same derivative, with no side effects. The state dimension and parameter
/// arity are fixed per variant. `Sync` lets a single field be shared across
/// batch workers.
pub trait VectorField: Sync {
    /// Human-readable system name.
    fn name(&self) -> &str;

    /// State dimension.
    fn dim(&self) -> usize;

    /// Names of the parameters, in the order `rhs` expects them.
    fn param_names(&self) -> &[&'static str];

    fn num_params(&self) -> usize {
        self.param_names().len()
    }

    /// Evaluate the derivative. `x.len() == self.dim()` and
    /// `params.len() == self.num_params()` are checked by the caller.
    fn rhs(&self, t: f64, x: &DVector<f64>, params: &[f64]) -> DVector<f64>;
}

impl<F: VectorField + ?Sized> VectorField for &F {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn param_names(&self) -> &[&'static str] {
        (**self).param_names()
    }

    fn rhs(&self, t: f64, x: &DVector<f64>, params: &[f64]) -> DVector<f64> {
        (**self).rhs(t, x, params)
    }
}
