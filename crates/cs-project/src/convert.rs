//! Conversion from the file schema to the typed pipeline configuration.

use cs_analysis::{AnalysisOptions, BatchOptions, FailurePolicy};
use cs_core::{ConfigResult, ParameterSpace};
use cs_sim::{IntegratorType, Observable, ObservationTime, SolveOptions};

use crate::schema::{
    AnalysisConfig, FailurePolicyDef, IntegratorDef, ObservableDef, SolverDef,
};

impl AnalysisConfig {
    pub fn parameter_space(&self) -> ConfigResult<ParameterSpace> {
        ParameterSpace::new(
            self.parameters.len(),
            self.parameters.iter().map(|p| p.name.clone()).collect(),
            self.parameters.iter().map(|p| (p.lower, p.upper)).collect(),
        )
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        let s = &self.sampling;
        AnalysisOptions {
            batch: BatchOptions {
                solve: self.solver.solve_options(),
                observable: self.observable.observable(),
                policy: self.failure_policy.into(),
                threads: self.threads,
            },
            second_order: s.second_order,
            scramble: s.scramble,
            morris_trajectories: s.morris_trajectories,
            num_levels: s.num_levels,
            num_resamples: s.num_resamples,
            conf_level: s.conf_level,
            seed: s.seed,
        }
    }

    /// Parameters for a single trajectory: `nominal` when given, otherwise
    /// the midpoint of every range.
    pub fn nominal_params(&self) -> Vec<f64> {
        match &self.nominal {
            Some(values) => values.clone(),
            None => self
                .parameters
                .iter()
                .map(|p| 0.5 * (p.lower + p.upper))
                .collect(),
        }
    }
}

impl SolverDef {
    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            t_span: (self.t_start, self.t_end),
            num_points: self.num_points,
            rtol: self.rtol,
            atol: self.atol,
            max_step: self.max_step.unwrap_or(f64::INFINITY),
            first_step: None,
            max_steps: self.max_steps,
            integrator: match self.integrator {
                IntegratorDef::Dopri45 => IntegratorType::DormandPrince45,
                IntegratorDef::Rk4 => IntegratorType::RK4,
            },
        }
    }
}

impl ObservableDef {
    pub fn observable(&self) -> Observable {
        Observable {
            component: self.component,
            time: self
                .time_index
                .map_or(ObservationTime::Final, ObservationTime::Index),
        }
    }
}

impl From<FailurePolicyDef> for FailurePolicy {
    fn from(def: FailurePolicyDef) -> Self {
        match def {
            FailurePolicyDef::FlagRow => FailurePolicy::FlagRow,
            FailurePolicyDef::FailFast => FailurePolicy::FailFast,
        }
    }
}
