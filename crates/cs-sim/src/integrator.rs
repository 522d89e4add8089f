//! Single-step time integrators.

use nalgebra::DVector;

use crate::field::VectorField;

/// Result of one attempted step.
#[derive(Clone, Debug)]
pub struct Step {
    /// Proposed state at `t + dt`.
    pub x: DVector<f64>,
    /// Derivative at the proposed state, reused as the next step's first stage.
    pub dxdt: DVector<f64>,
}

/// Trait for fixed-step time integrators.
pub trait Integrator {
    /// Advance `x` by `dt`, given `dxdt = f(t, x)`.
    fn step<F: VectorField + ?Sized>(
        &self,
        field: &F,
        params: &[f64],
        t: f64,
        x: &DVector<f64>,
        dxdt: &DVector<f64>,
        dt: f64,
    ) -> Step;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<F: VectorField + ?Sized>(
        &self,
        field: &F,
        params: &[f64],
        t: f64,
        x: &DVector<f64>,
        dxdt: &DVector<f64>,
        dt: f64,
    ) -> Step {
        let k1 = dxdt;
        let k2 = field.rhs(t + 0.5 * dt, &(x + k1 * (0.5 * dt)), params);
        let k3 = field.rhs(t + 0.5 * dt, &(x + &k2 * (0.5 * dt)), params);
        let k4 = field.rhs(t + dt, &(x + &k3 * dt), params);

        // Combine: x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = k1 + &k2 * 2.0 + &k3 * 2.0 + &k4;
        let x_new = x + k_sum * (dt / 6.0);
        let dxdt_new = field.rhs(t + dt, &x_new, params);

        Step {
            x: x_new,
            dxdt: dxdt_new,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    /// dx/dt = -k x
    struct Decay;

    impl VectorField for Decay {
        fn name(&self) -> &str {
            "decay"
        }
        fn dim(&self) -> usize {
            1
        }
        fn param_names(&self) -> &[&'static str] {
            &["k"]
        }
        fn rhs(&self, _t: f64, x: &DVector<f64>, p: &[f64]) -> DVector<f64> {
            x * -p[0]
        }
    }

    fn single_step<I: Integrator>(integrator: &I, dt: f64) -> Step {
        let x = dvector![1.0];
        let dxdt = Decay.rhs(0.0, &x, &[1.0]);
        integrator.step(&Decay, &[1.0], 0.0, &x, &dxdt, dt)
    }

    #[test]
    fn rk4_single_step_accuracy() {
        let step = single_step(&RK4, 0.1);
        assert!((step.x[0] - (-0.1_f64).exp()).abs() < 1e-6);
        assert!((step.dxdt[0] + step.x[0]).abs() < 1e-15);
    }

    #[test]
    fn rk4_error_is_fourth_order() {
        let exact = |dt: f64| (-dt).exp();
        let coarse = (single_step(&RK4, 0.2).x[0] - exact(0.2)).abs();
        let fine = (single_step(&RK4, 0.1).x[0] - exact(0.1)).abs();
        // local error scales as dt^5
        assert!(coarse / fine > 20.0);
    }
}
