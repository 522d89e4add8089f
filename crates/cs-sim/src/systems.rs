//! Lorenz-family systems.

use nalgebra::{DVector, dvector};

use crate::field::VectorField;

/// Classic Lorenz system, parameters `(sigma, beta, rho)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lorenz;

impl VectorField for Lorenz {
    fn name(&self) -> &str {
        "Lorenz"
    }

    fn dim(&self) -> usize {
        3
    }

    fn param_names(&self) -> &[&'static str] {
        &["sigma", "beta", "rho"]
    }

    fn rhs(&self, _t: f64, x: &DVector<f64>, p: &[f64]) -> DVector<f64> {
        let (sigma, beta, rho) = (p[0], p[1], p[2]);
        dvector![
            sigma * (x[1] - x[0]),
            x[0] * (rho - x[2]) - x[1],
            x[0] * x[1] - beta * x[2]
        ]
    }
}

/// Yang system, parameters `(alpha, beta, gamma)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Yang;

impl VectorField for Yang {
    fn name(&self) -> &str {
        "Yang"
    }

    fn dim(&self) -> usize {
        3
    }

    fn param_names(&self) -> &[&'static str] {
        &["alpha", "beta", "gamma"]
    }

    fn rhs(&self, _t: f64, x: &DVector<f64>, p: &[f64]) -> DVector<f64> {
        let (alpha, beta, gamma) = (p[0], p[1], p[2]);
        dvector![
            alpha * (x[1] - x[0]),
            gamma * x[0] - x[0] * x[2],
            x[0] * x[1] - beta * x[2]
        ]
    }
}

/// Nominal Lorenz system run side by side with a disturbed copy.
///
/// States `0..3` are the nominal `(x, y, z)`, states `3..6` the disturbed
/// copy. The base Lorenz constants are fixed at construction; the analysed
/// parameters `(eps, delta, ni)` shape the disturbance: a forcing
/// `eps * sin(delta * t)` on `x` and a coupling `ni * (y_nominal - y)` that
/// pulls the disturbed `y` towards the nominal one.
#[derive(Clone, Copy, Debug)]
pub struct DisturbedLorenz {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl DisturbedLorenz {
    pub fn new(sigma: f64, rho: f64, beta: f64) -> Self {
        Self { sigma, rho, beta }
    }
}

impl Default for DisturbedLorenz {
    fn default() -> Self {
        Self::new(10.0, 28.0, 8.0 / 3.0)
    }
}

impl VectorField for DisturbedLorenz {
    fn name(&self) -> &str {
        "Disturbed Lorenz"
    }

    fn dim(&self) -> usize {
        6
    }

    fn param_names(&self) -> &[&'static str] {
        &["eps", "delta", "ni"]
    }

    fn rhs(&self, t: f64, x: &DVector<f64>, p: &[f64]) -> DVector<f64> {
        let (eps, delta, ni) = (p[0], p[1], p[2]);
        let Self { sigma, rho, beta } = *self;
        let disturbance = eps * (delta * t).sin();
        dvector![
            sigma * (x[1] - x[0]),
            x[0] * (rho - x[2]) - x[1],
            x[0] * x[1] - beta * x[2],
            sigma * (x[4] - x[3]) + disturbance,
            x[3] * (rho - x[5]) - x[4] + ni * (x[1] - x[4]),
            x[3] * x[4] - beta * x[5]
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lorenz_rhs_matches_hand_computation() {
        let x = dvector![1.0, 2.0, 3.0];
        let dx = Lorenz.rhs(0.0, &x, &[10.0, 8.0 / 3.0, 28.0]);
        assert_eq!(dx[0], 10.0);
        assert_eq!(dx[1], 1.0 * (28.0 - 3.0) - 2.0);
        assert!((dx[2] - (2.0 - 8.0)).abs() < 1e-12);
    }

    #[test]
    fn lorenz_origin_is_fixed_point() {
        let dx = Lorenz.rhs(0.0, &DVector::zeros(3), &[10.0, 8.0 / 3.0, 28.0]);
        assert_eq!(dx, DVector::zeros(3));
    }

    #[test]
    fn yang_rhs_matches_hand_computation() {
        let x = dvector![1.0, 2.0, 3.0];
        let dx = Yang.rhs(0.0, &x, &[10.0, 2.0, 20.0]);
        assert_eq!(dx[0], 10.0);
        assert_eq!(dx[1], 20.0 - 3.0);
        assert_eq!(dx[2], 2.0 - 6.0);
    }

    #[test]
    fn disturbed_lorenz_reduces_to_nominal_without_disturbance() {
        let sys = DisturbedLorenz::default();
        let x = dvector![1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
        let dx = sys.rhs(0.7, &x, &[0.0, 5.0, 1.0]);
        let nominal = Lorenz.rhs(0.7, &dvector![1.0, 2.0, 3.0], &[10.0, 8.0 / 3.0, 28.0]);
        for i in 0..3 {
            assert!((dx[i] - nominal[i]).abs() < 1e-12);
            assert!((dx[i + 3] - nominal[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn arities_and_dims() {
        assert_eq!((Lorenz.dim(), Lorenz.num_params()), (3, 3));
        assert_eq!((Yang.dim(), Yang.num_params()), (3, 3));
        let d = DisturbedLorenz::default();
        assert_eq!((d.dim(), d.num_params()), (6, 3));
    }
}
