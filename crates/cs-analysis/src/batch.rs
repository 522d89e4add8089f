//! Parallel evaluation of a design: one trajectory solve per row.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cs_core::timing::{AccumulatingTimer, Timer};
use cs_core::{ConfigError, GroupId};
use cs_sampling::Design;
use cs_sim::{Observable, ObservationTime, SimError, SolveOptions, VectorField, solve};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{AnalysisError, AnalysisResult};

/// What to do when a single row fails to integrate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Store NaN for the row, record the failure and keep going.
    #[default]
    FlagRow,
    /// Abort the whole batch with the failing row's error.
    FailFast,
}

/// Options shared by every row of a batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchOptions {
    pub solve: SolveOptions,
    pub observable: Observable,
    pub policy: FailurePolicy,
    /// Worker count; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

/// Coarse cancellation flag checked before each row starts.
///
/// Clones share the same flag, so one handle can be given to another thread
/// and cancelled from there.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A row whose integration failed under [`FailurePolicy::FlagRow`].
#[derive(Clone, Debug, PartialEq)]
pub struct RowFailure {
    pub row: usize,
    pub group: GroupId,
    pub params: Vec<f64>,
    pub error: SimError,
}

/// Scalar outputs positionally aligned with the design rows.
///
/// Failed rows hold NaN and are flagged; analyzers skip every group that
/// contains a flagged or non-finite value.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationOutput {
    values: Vec<f64>,
    flagged: Vec<bool>,
    failures: Vec<RowFailure>,
}

impl SimulationOutput {
    /// Outputs computed elsewhere, with no rows flagged.
    pub fn from_values(values: Vec<f64>) -> Self {
        let flagged = vec![false; values.len()];
        Self {
            values,
            flagged,
            failures: Vec::new(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_flagged(&self, row: usize) -> bool {
        self.flagged.get(row).copied().unwrap_or(false)
    }

    /// Row has a usable value: not flagged and finite.
    pub fn is_valid(&self, row: usize) -> bool {
        !self.is_flagged(row) && self.values.get(row).is_some_and(|v| v.is_finite())
    }

    pub fn failures(&self) -> &[RowFailure] {
        &self.failures
    }

    pub fn num_flagged(&self) -> usize {
        self.failures.len()
    }
}

enum RowValue {
    Value(f64),
    Failed(SimError),
}

/// Runs every row of a design through `solve` and the configured observable.
#[derive(Clone, Debug, Default)]
pub struct BatchRunner {
    pub options: BatchOptions,
}

impl BatchRunner {
    pub fn new(options: BatchOptions) -> Self {
        Self { options }
    }

    pub fn run<F: VectorField + ?Sized>(
        &self,
        field: &F,
        design: &Design,
        initial_state: &[f64],
    ) -> AnalysisResult<SimulationOutput> {
        self.run_with_cancel(field, design, initial_state, None)
    }

    /// Evaluate every row in parallel; the output order always matches the
    /// design's row order.
    ///
    /// Configuration problems fail before any row runs. Cancellation
    /// abandons the remaining rows and discards partial results.
    pub fn run_with_cancel<F: VectorField + ?Sized>(
        &self,
        field: &F,
        design: &Design,
        initial_state: &[f64],
        cancel: Option<&CancelToken>,
    ) -> AnalysisResult<SimulationOutput> {
        self.validate(field, design, initial_state)?;

        info!(
            system = field.name(),
            rows = design.len(),
            threads = ?self.options.threads,
            "Running simulation batch"
        );

        let timer = AccumulatingTimer::new();
        let evaluate = || -> AnalysisResult<Vec<RowValue>> {
            design
                .rows()
                .par_iter()
                .enumerate()
                .map(|(i, row)| {
                    if cancel.is_some_and(CancelToken::is_cancelled) {
                        return Err(AnalysisError::Cancelled);
                    }
                    let t = Timer::start("row");
                    let result = solve(field, initial_state, &row.values, &self.options.solve)
                        .and_then(|traj| self.options.observable.extract(&traj));
                    t.stop_into(&timer);

                    match result {
                        Ok(y) => Ok(RowValue::Value(y)),
                        Err(e) => {
                            debug!(row = i, group = %row.group, error = %e, "Row failed");
                            match self.options.policy {
                                FailurePolicy::FlagRow => Ok(RowValue::Failed(e)),
                                FailurePolicy::FailFast => {
                                    Err(AnalysisError::Integration { row: i, source: e })
                                }
                            }
                        }
                    }
                })
                .collect()
        };

        let outcomes = match self.options.threads {
            Some(n) => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| AnalysisError::WorkerPool {
                    message: e.to_string(),
                })?
                .install(evaluate),
            None => evaluate(),
        }?;

        let mut values = Vec::with_capacity(outcomes.len());
        let mut flagged = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (i, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                RowValue::Value(y) => {
                    values.push(y);
                    flagged.push(false);
                }
                RowValue::Failed(error) => {
                    let row = &design.rows()[i];
                    values.push(f64::NAN);
                    flagged.push(true);
                    failures.push(RowFailure {
                        row: i,
                        group: row.group,
                        params: row.values.clone(),
                        error,
                    });
                }
            }
        }

        if !failures.is_empty() {
            warn!(
                flagged = failures.len(),
                rows = values.len(),
                "Rows failed to integrate and were flagged"
            );
        }
        debug!(
            rows = timer.count(),
            total_s = timer.total_seconds(),
            avg_s = timer.average_seconds(),
            "Batch timing"
        );

        Ok(SimulationOutput {
            values,
            flagged,
            failures,
        })
    }

    fn validate<F: VectorField + ?Sized>(
        &self,
        field: &F,
        design: &Design,
        initial_state: &[f64],
    ) -> AnalysisResult<()> {
        if design.num_vars() != field.num_params() {
            return Err(ConfigError::ArityMismatch {
                field: field.name().to_string(),
                expected: field.num_params(),
                actual: design.num_vars(),
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
        self.options
            .solve
            .validate()
            .map_err(AnalysisError::SolveOptions)?;

        let observable = self.options.observable;
        if observable.component >= field.dim() {
            return Err(ConfigError::InvalidArg {
                what: "observable component exceeds the state dimension",
            }
            .into());
        }
        if let ObservationTime::Index(i) = observable.time
            && i >= self.options.solve.num_points
        {
            return Err(ConfigError::InvalidArg {
                what: "observable time index exceeds the output grid",
            }
            .into());
        }
        if self.options.threads == Some(0) {
            return Err(ConfigError::InvalidArg {
                what: "thread count must be positive",
            }
            .into());
        }
        Ok(())
    }
}
