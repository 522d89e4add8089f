//! End-to-end sensitivity analysis: sample, simulate, analyze.

use cs_core::{ConfigError, ParameterSpace};
use cs_sampling::{MorrisSampler, SaltelliSampler};
use cs_sim::VectorField;
use tracing::info;

use crate::batch::{BatchOptions, BatchRunner, CancelToken};
use crate::error::AnalysisResult;
use crate::morris::{MorrisAnalyzer, MorrisResult};
use crate::sobol::{SobolAnalyzer, SobolResult};
use crate::stats::Bootstrap;

/// Knobs for one pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisOptions {
    pub batch: BatchOptions,
    /// Emit `BA_j` rows and report `S2`.
    pub second_order: bool,
    /// Apply a seeded digital shift to the Sobol sequence.
    pub scramble: bool,
    /// Morris trajectory count; `None` uses the Sobol base count.
    pub morris_trajectories: Option<usize>,
    pub num_levels: usize,
    pub num_resamples: usize,
    pub conf_level: f64,
    /// Seed for the Morris design, the digital shift and the bootstrap.
    pub seed: u64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            batch: BatchOptions::default(),
            second_order: true,
            scramble: false,
            morris_trajectories: None,
            num_levels: 4,
            num_resamples: 100,
            conf_level: 0.95,
            seed: 0,
        }
    }
}

impl AnalysisOptions {
    fn bootstrap(&self) -> Bootstrap {
        Bootstrap {
            num_resamples: self.num_resamples,
            conf_level: self.conf_level,
            seed: self.seed,
        }
    }
}

/// Run Sobol and Morris analyses with default options.
///
/// `num_samples` is the Sobol base count `N`; Morris uses `N` trajectories.
pub fn analyze<F: VectorField + ?Sized>(
    field: &F,
    initial_state: &[f64],
    space: &ParameterSpace,
    num_samples: usize,
) -> AnalysisResult<(SobolResult, MorrisResult)> {
    analyze_with(
        field,
        initial_state,
        space,
        num_samples,
        &AnalysisOptions::default(),
        None,
    )
}

/// Run Sobol and Morris analyses.
///
/// Everything that can be checked up front is checked before the first
/// simulation: parameter arity, state dimension, sampler and bootstrap
/// settings. The pipeline returns data only; rendering is left to callers.
pub fn analyze_with<F: VectorField + ?Sized>(
    field: &F,
    initial_state: &[f64],
    space: &ParameterSpace,
    num_samples: usize,
    options: &AnalysisOptions,
    cancel: Option<&CancelToken>,
) -> AnalysisResult<(SobolResult, MorrisResult)> {
    if space.num_vars() != field.num_params() {
        return Err(ConfigError::ArityMismatch {
            field: field.name().to_string(),
            expected: field.num_params(),
            actual: space.num_vars(),
        }
        .into());
    }
    if initial_state.len() != field.dim() {
        return Err(ConfigError::StateDimensionMismatch {
            field: field.name().to_string(),
            expected: field.dim(),
            actual: initial_state.len(),
        }
        .into());
    }
    let bootstrap = options.bootstrap();
    bootstrap.validate()?;

    let mut saltelli =
        SaltelliSampler::new(num_samples).with_second_order(options.second_order);
    if options.scramble {
        saltelli = saltelli.with_seed(options.seed);
    }
    let morris = MorrisSampler::new(options.morris_trajectories.unwrap_or(num_samples))
        .with_levels(options.num_levels)
        .with_seed(options.seed);

    let sobol_design = saltelli.sample(space)?;
    let morris_design = morris.sample(space)?;

    info!(
        system = field.name(),
        params = space.num_vars(),
        sobol_rows = sobol_design.len(),
        morris_rows = morris_design.len(),
        "Starting sensitivity analysis"
    );

    let runner = BatchRunner::new(options.batch.clone());

    let sobol_output = runner.run_with_cancel(field, &sobol_design, initial_state, cancel)?;
    let sobol = SobolAnalyzer::new(bootstrap).analyze(space, &sobol_design, &sobol_output)?;
    info!(
        flagged = sobol_output.num_flagged(),
        excluded = sobol.excluded_groups.len(),
        "Sobol analysis complete"
    );

    let morris_output = runner.run_with_cancel(field, &morris_design, initial_state, cancel)?;
    let morris = MorrisAnalyzer::new(bootstrap).analyze(space, &morris_design, &morris_output)?;
    info!(
        flagged = morris_output.num_flagged(),
        excluded = morris.excluded_trajectories.len(),
        "Morris analysis complete"
    );

    Ok((sobol, morris))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use cs_sim::Lorenz;

    fn lorenz_space() -> ParameterSpace {
        ParameterSpace::new(
            3,
            vec!["sigma", "beta", "rho"],
            vec![(0.5, 20.0), (0.5, 5.0), (20.0, 50.0)],
        )
        .unwrap()
    }

    #[test]
    fn arity_and_state_are_checked_first() {
        let two = ParameterSpace::new(2, vec!["a", "b"], vec![(0.0, 1.0); 2]).unwrap();
        assert!(matches!(
            analyze(&Lorenz, &[1.0, 1.0, 1.0], &two, 4),
            Err(AnalysisError::Config(ConfigError::ArityMismatch { expected: 3, actual: 2, .. }))
        ));
        assert!(matches!(
            analyze(&Lorenz, &[1.0, 1.0], &lorenz_space(), 4),
            Err(AnalysisError::Config(ConfigError::StateDimensionMismatch { .. }))
        ));
    }

    #[test]
    fn invalid_sampler_settings_fail_before_simulating() {
        let mut opts = AnalysisOptions::default();
        opts.num_levels = 5;
        assert!(matches!(
            analyze_with(&Lorenz, &[1.0; 3], &lorenz_space(), 4, &opts, None),
            Err(AnalysisError::Config(ConfigError::InvalidSampler { .. }))
        ));
        assert!(matches!(
            analyze(&Lorenz, &[1.0; 3], &lorenz_space(), 0),
            Err(AnalysisError::Config(ConfigError::InvalidSampler { .. }))
        ));
    }

    #[test]
    fn cancellation_discards_the_run() {
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            analyze_with(
                &Lorenz,
                &[1.0; 3],
                &lorenz_space(),
                4,
                &AnalysisOptions::default(),
                Some(&token)
            ),
            Err(AnalysisError::Cancelled)
        );
    }
}
