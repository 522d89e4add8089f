//! Trajectory solves on a uniform output grid.

use cs_core::all_finite;
use nalgebra::DVector;
use ode_solvers::dop_shared::{IntegrationError, OutputType};
use ode_solvers::{Dopri5, System};
use tracing::{debug, trace};

use crate::error::{FailureReason, SimError, SimResult};
use crate::field::VectorField;
use crate::integrator::{Integrator, RK4};

type OdeState = ode_solvers::DVector<f64>;

// Hairer's defaults for DOPRI5 step control.
const DOPRI_SAFETY: f64 = 0.9;
const DOPRI_BETA: f64 = 0.04;
const DOPRI_FAC_MIN: f64 = 0.2;
const DOPRI_FAC_MAX: f64 = 10.0;
const DOPRI_STIFFNESS_CHECKS: u32 = 1000;

/// Integrator selection for a solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// Adaptive Dormand–Prince 5(4) from `ode_solvers` (default).
    #[default]
    DormandPrince45,
    /// Fixed-step 4th-order Runge-Kutta, stepping on the output grid.
    RK4,
}

/// Options for trajectory solves.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveOptions {
    /// Integration interval `(t0, t1)`, `t0 < t1`.
    pub t_span: (f64, f64),
    /// Number of evenly spaced output times, including both ends.
    pub num_points: usize,
    /// Relative tolerance (adaptive only)
    pub rtol: f64,
    /// Absolute tolerance (adaptive only)
    pub atol: f64,
    /// Largest step the integrator may take.
    pub max_step: f64,
    /// Initial step for the adaptive integrator; estimated by the solver when `None`.
    pub first_step: Option<f64>,
    /// Maximum number of attempted steps (safety limit)
    pub max_steps: usize,
    pub integrator: IntegratorType,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            t_span: (0.0, 50.0),
            num_points: 10_000,
            rtol: 1e-3,
            atol: 1e-6,
            max_step: f64::INFINITY,
            first_step: None,
            max_steps: 1_000_000,
            integrator: IntegratorType::default(),
        }
    }
}

impl SolveOptions {
    pub fn validate(&self) -> SimResult<()> {
        let (t0, t1) = self.t_span;
        if !t0.is_finite() || !t1.is_finite() {
            return Err(SimError::InvalidArg {
                what: "t_span must be finite",
            });
        }
        if t0 >= t1 {
            return Err(SimError::InvalidArg {
                what: "t_span must satisfy t0 < t1",
            });
        }
        if self.num_points < 2 {
            return Err(SimError::InvalidArg {
                what: "num_points must be at least 2",
            });
        }
        if !(self.rtol > 0.0) || !(self.atol > 0.0) {
            return Err(SimError::InvalidArg {
                what: "rtol and atol must be positive",
            });
        }
        if !(self.max_step > 0.0) {
            return Err(SimError::InvalidArg {
                what: "max_step must be positive",
            });
        }
        if let Some(h0) = self.first_step
            && !(h0 > 0.0 && h0.is_finite())
        {
            return Err(SimError::InvalidArg {
                what: "first_step must be positive and finite",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }

    /// The requested output times: `num_points` evenly spaced values with the
    /// end points hit exactly.
    pub fn time_grid(&self) -> Vec<f64> {
        let (t0, t1) = self.t_span;
        let last = self.num_points - 1;
        let dt = (t1 - t0) / last as f64;
        (0..self.num_points)
            .map(|i| if i == last { t1 } else { t0 + dt * i as f64 })
            .collect()
    }
}

/// States of a solve sampled on the output grid.
#[derive(Clone, Debug)]
pub struct Trajectory {
    /// Output times
    pub t: Vec<f64>,
    /// State snapshots, one per output time
    pub x: Vec<DVector<f64>>,
    /// Accepted integrator steps
    pub accepted_steps: usize,
    /// Rejected integrator steps
    pub rejected_steps: usize,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// State dimension.
    pub fn dim(&self) -> usize {
        self.x.first().map_or(0, |x| x.len())
    }

    pub fn final_state(&self) -> Option<&DVector<f64>> {
        self.x.last()
    }

    /// Time series of one state component, e.g. for phase-space plots.
    pub fn component(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.dim()).then(|| self.x.iter().map(|x| x[index]).collect())
    }
}

/// Solve `field` from `initial_state` with fixed `params` over `opts.t_span`.
///
/// Never retries: a failed integration is reported as
/// [`SimError::IntegrationFailure`] with the last time reached.
pub fn solve<F: VectorField + ?Sized>(
    field: &F,
    initial_state: &[f64],
    params: &[f64],
    opts: &SolveOptions,
) -> SimResult<Trajectory> {
    opts.validate()?;
    if initial_state.len() != field.dim() {
        return Err(SimError::DimensionMismatch {
            what: "initial state",
            expected: field.dim(),
            actual: initial_state.len(),
        });
    }
    if params.len() != field.num_params() {
        return Err(SimError::DimensionMismatch {
            what: "parameters",
            expected: field.num_params(),
            actual: params.len(),
        });
    }
    if !all_finite(initial_state) {
        return Err(SimError::InvalidArg {
            what: "initial state must be finite",
        });
    }

    let result = match opts.integrator {
        IntegratorType::DormandPrince45 => integrate_adaptive(field, initial_state, params, opts),
        IntegratorType::RK4 => {
            integrate_fixed(field, &RK4, DVector::from_column_slice(initial_state), params, opts)
        }
    };

    match &result {
        Ok(traj) => trace!(
            system = field.name(),
            accepted = traj.accepted_steps,
            rejected = traj.rejected_steps,
            "solve finished"
        ),
        Err(e) => debug!(system = field.name(), error = %e, "solve failed"),
    }
    result
}

fn failure(params: &[f64], last_t: f64, reason: FailureReason) -> SimError {
    SimError::IntegrationFailure {
        params: params.to_vec(),
        last_t,
        reason,
    }
}

/// Adapts a [`VectorField`] with fixed parameters to the `ode_solvers` system
/// interface.
struct FieldSystem<'a, F: ?Sized> {
    field: &'a F,
    params: &'a [f64],
}

impl<F: VectorField + ?Sized> System<f64, OdeState> for FieldSystem<'_, F> {
    fn system(&self, t: f64, y: &OdeState, dy: &mut OdeState) {
        let x = DVector::from_column_slice(y.as_slice());
        let dxdt = self.field.rhs(t, &x, self.params);
        dy.as_mut_slice().copy_from_slice(dxdt.as_slice());
    }

    fn solout(&mut self, _t: f64, y: &OdeState, _dy: &OdeState) -> bool {
        // stop on divergence
        !y.iter().all(|v| v.is_finite())
    }
}

fn integrate_adaptive<F>(
    field: &F,
    x0: &[f64],
    params: &[f64],
    opts: &SolveOptions,
) -> SimResult<Trajectory>
where
    F: VectorField + ?Sized,
{
    let grid = opts.time_grid();
    let (t0, t1) = opts.t_span;
    let dx = (t1 - t0) / (opts.num_points - 1) as f64;
    let h_max = opts.max_step.min(t1 - t0);
    let n_max = u32::try_from(opts.max_steps).unwrap_or(u32::MAX);

    // Dense output runs half a grid interval past `t1` so rounding in the
    // output clock can never drop the final grid point.
    let mut stepper = Dopri5::from_param(
        FieldSystem { field, params },
        t0,
        t1 + 0.5 * dx,
        dx,
        OdeState::from_column_slice(x0),
        opts.rtol,
        opts.atol,
        DOPRI_SAFETY,
        DOPRI_BETA,
        DOPRI_FAC_MIN,
        DOPRI_FAC_MAX,
        h_max,
        opts.first_step.unwrap_or(0.0),
        n_max,
        DOPRI_STIFFNESS_CHECKS,
        OutputType::Dense,
    );

    let stats = stepper.integrate().map_err(|e| {
        let (last_t, reason) = match e {
            IntegrationError::MaxNumStepReached { x, .. } => (x, FailureReason::MaxStepsExceeded),
            IntegrationError::StepSizeUnderflow { x, .. } => (x, FailureReason::StepSizeUnderflow),
            IntegrationError::StiffnessDetected { x, .. } => (x, FailureReason::StiffnessDetected),
        };
        failure(params, last_t, reason)
    })?;

    // Dense output may or may not repeat the initial point.
    let tol = 1e-6 * dx;
    let mut out_t = Vec::with_capacity(grid.len());
    let mut out_x = Vec::with_capacity(grid.len());
    if stepper.x_out().first().is_none_or(|t| (t - t0).abs() > tol) {
        out_t.push(t0);
        out_x.push(DVector::from_column_slice(x0));
    }
    for (t, y) in stepper.x_out().iter().zip(stepper.y_out()) {
        if out_t.len() == grid.len() {
            break;
        }
        if !y.iter().all(|v| v.is_finite()) {
            break;
        }
        out_t.push(*t);
        out_x.push(DVector::from_column_slice(y.as_slice()));
    }

    if out_t.len() < grid.len() {
        let last_t = out_t.last().copied().unwrap_or(t0);
        return Err(failure(params, last_t, FailureReason::NonFinite));
    }
    // Snap the solver's accumulated output clock onto the exact grid.
    if let Some((t, _)) = out_t.iter().zip(&grid).find(|(t, g)| (*t - *g).abs() > tol) {
        return Err(failure(params, *t, FailureReason::OutputGridMismatch));
    }

    Ok(Trajectory {
        t: grid,
        x: out_x,
        accepted_steps: stats.accepted_steps as usize,
        rejected_steps: stats.rejected_steps as usize,
    })
}

fn integrate_fixed<F, I>(
    field: &F,
    integrator: &I,
    x0: DVector<f64>,
    params: &[f64],
    opts: &SolveOptions,
) -> SimResult<Trajectory>
where
    F: VectorField + ?Sized,
    I: Integrator,
{
    let grid = opts.time_grid();
    let interval = grid[1] - grid[0];
    let substeps = if opts.max_step.is_finite() && opts.max_step < interval {
        (interval / opts.max_step).ceil() as usize
    } else {
        1
    };

    let mut t = grid[0];
    let mut x = x0;
    let mut dxdt = field.rhs(t, &x, params);

    let mut out_t = Vec::with_capacity(grid.len());
    let mut out_x = Vec::with_capacity(grid.len());
    out_t.push(t);
    out_x.push(x.clone());

    let mut steps = 0;
    for &target in &grid[1..] {
        let h = (target - t) / substeps as f64;
        for sub in 0..substeps {
            if steps >= opts.max_steps {
                return Err(failure(params, t, FailureReason::MaxStepsExceeded));
            }
            let step = integrator.step(field, params, t, &x, &dxdt, h);
            steps += 1;
            if !step.x.iter().all(|v| v.is_finite()) || !step.dxdt.iter().all(|v| v.is_finite())
            {
                return Err(failure(params, t, FailureReason::NonFinite));
            }
            t = if sub + 1 == substeps { target } else { t + h };
            x = step.x;
            dxdt = step.dxdt;
        }
        out_t.push(t);
        out_x.push(x.clone());
    }

    Ok(Trajectory {
        t: out_t,
        x: out_x,
        accepted_steps: steps,
        rejected_steps: 0,
    })
}
