//! Variance-based Sobol indices from a Saltelli design.

use cs_core::{ConfigError, ParameterSpace};
use cs_sampling::{Design, Scheme};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::batch::SimulationOutput;
use crate::error::{AnalysisError, AnalysisResult};
use crate::stats::{Bootstrap, mean, resample_indices, std_dev, variance};

/// First-, total- and (optionally) second-order indices per parameter,
/// ordered like the parameter space's names.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SobolResult {
    pub names: Vec<String>,
    pub s1: Vec<f64>,
    pub s1_conf: Vec<f64>,
    pub st: Vec<f64>,
    pub st_conf: Vec<f64>,
    /// `s2[i][j]` for `i < j`; NaN elsewhere.
    pub s2: Option<Vec<Vec<f64>>>,
    pub s2_conf: Option<Vec<Vec<f64>>>,
    /// Groups skipped because they held a flagged or non-finite output.
    pub excluded_groups: Vec<usize>,
}

impl SobolResult {
    /// `(S1, ST)` for a parameter name.
    pub fn get(&self, name: &str) -> Option<(f64, f64)> {
        let i = self.names.iter().position(|n| n == name)?;
        Some((self.s1[i], self.st[i]))
    }

    pub fn s2(&self, i: usize, j: usize) -> Option<f64> {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        if lo == hi {
            return None;
        }
        self.s2.as_ref()?.get(lo)?.get(hi).copied()
    }
}

/// Point estimates over one set of groups.
struct Estimates {
    s1: Vec<f64>,
    st: Vec<f64>,
    s2: Option<Vec<Vec<f64>>>,
}

/// Saltelli estimators with bootstrap confidence intervals.
///
/// Every group is laid out `A, AB_1..AB_k, [BA_1..BA_k,] B`. With `V` the
/// variance of all outputs in the groups used:
///
/// - `S1_j = mean(f(B) (f(AB_j) - f(A))) / V`
/// - `ST_j = mean((f(A) - f(AB_j))^2) / (2 V)`
/// - `S2_jl = mean(f(BA_j) f(AB_l) - f(A) f(B)) / V - S1_j - S1_l`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SobolAnalyzer {
    pub bootstrap: Bootstrap,
}

impl SobolAnalyzer {
    pub fn new(bootstrap: Bootstrap) -> Self {
        Self { bootstrap }
    }

    /// Analyze the outputs of a Saltelli `design`.
    pub fn analyze(
        &self,
        space: &ParameterSpace,
        design: &Design,
        output: &SimulationOutput,
    ) -> AnalysisResult<SobolResult> {
        let Scheme::Saltelli { second_order, .. } = design.scheme() else {
            return Err(AnalysisError::SchemeMismatch {
                analyzer: "Sobol",
                scheme: "Morris",
            });
        };
        if design.num_vars() != space.num_vars() {
            return Err(ConfigError::ArityMismatch {
                field: "design".to_string(),
                expected: design.num_vars(),
                actual: space.num_vars(),
            }
            .into());
        }
        let group_size = design.group_size();
        if output.len() % group_size != 0 {
            return Err(AnalysisError::DesignShape {
                len: output.len(),
                group_size,
            });
        }
        if output.len() != design.len() {
            return Err(AnalysisError::OutputMismatch {
                design: design.len(),
                output: output.len(),
            });
        }
        self.analyze_output(space, output, second_order)
    }

    /// Analyze outputs laid out in Saltelli groups without the design at
    /// hand; the group size follows from `k` and `second_order`.
    pub fn analyze_output(
        &self,
        space: &ParameterSpace,
        output: &SimulationOutput,
        second_order: bool,
    ) -> AnalysisResult<SobolResult> {
        let z = self.bootstrap.z_score()?;
        let k = space.num_vars();
        let group_size = if second_order { 2 * k + 2 } else { k + 2 };
        if output.is_empty() || output.len() % group_size != 0 {
            return Err(AnalysisError::DesignShape {
                len: output.len(),
                group_size,
            });
        }
        let total = output.len() / group_size;

        let mut valid_starts = Vec::with_capacity(total);
        let mut excluded_groups = Vec::new();
        for g in 0..total {
            let start = g * group_size;
            if (start..start + group_size).all(|row| output.is_valid(row)) {
                valid_starts.push(start);
            } else {
                excluded_groups.push(g);
            }
        }
        if !excluded_groups.is_empty() {
            warn!(
                excluded = excluded_groups.len(),
                total, "Sobol groups with flagged rows were excluded"
            );
        }
        if valid_starts.len() < 2 {
            return Err(AnalysisError::InsufficientGroups {
                valid: valid_starts.len(),
                total,
                required: 2,
            });
        }

        // Standardize over every valid output.
        let used: Vec<f64> = valid_starts
            .iter()
            .flat_map(|&s| output.values()[s..s + group_size].iter().copied())
            .collect();
        let mu = mean(&used);
        let sd = std_dev(&used, 0);
        if !(sd > 0.0) {
            return Err(AnalysisError::ZeroVariance);
        }
        let y: Vec<f64> = output.values().iter().map(|v| (v - mu) / sd).collect();
        let groups: Vec<&[f64]> = valid_starts
            .iter()
            .map(|&s| &y[s..s + group_size])
            .collect();

        let point = estimate(&groups, k, second_order).ok_or(AnalysisError::ZeroVariance)?;

        // Bootstrap over whole groups.
        let mut rng = StdRng::seed_from_u64(self.bootstrap.seed);
        let resamples: Vec<Option<Estimates>> = (0..self.bootstrap.num_resamples)
            .map(|_| {
                let picked: Vec<&[f64]> = resample_indices(&mut rng, groups.len())
                    .into_iter()
                    .map(|i| groups[i])
                    .collect();
                estimate(&picked, k, second_order)
            })
            .collect();
        let conf = |value: &dyn Fn(&Estimates) -> f64| -> f64 {
            let draws: Vec<f64> = resamples
                .iter()
                .map(|e| e.as_ref().map_or(f64::NAN, value))
                .collect();
            Bootstrap::half_width(z, &draws)
        };

        let s1_conf = (0..k).map(|j| conf(&|e| e.s1[j])).collect();
        let st_conf = (0..k).map(|j| conf(&|e| e.st[j])).collect();
        let s2_conf = second_order.then(|| {
            (0..k)
                .map(|j| {
                    (0..k)
                        .map(|l| {
                            if j < l {
                                conf(&|e| e.s2.as_ref().map_or(f64::NAN, |m| m[j][l]))
                            } else {
                                f64::NAN
                            }
                        })
                        .collect()
                })
                .collect()
        });

        debug!(
            groups = groups.len(),
            resamples = self.bootstrap.num_resamples,
            "Sobol indices estimated"
        );

        Ok(SobolResult {
            names: space.names().to_vec(),
            s1: point.s1,
            s1_conf,
            st: point.st,
            st_conf,
            s2: point.s2,
            s2_conf,
            excluded_groups,
        })
    }
}

fn estimate(groups: &[&[f64]], k: usize, second_order: bool) -> Option<Estimates> {
    let all: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let v = variance(&all, 0);
    if !(v > 0.0) {
        return None;
    }
    let n = groups.len() as f64;
    let a = |g: &[f64]| g[0];
    let b = |g: &[f64]| g[g.len() - 1];
    let avg = |f: &dyn Fn(&[f64]) -> f64| groups.iter().map(|g| f(*g)).sum::<f64>() / n;

    let s1: Vec<f64> = (0..k)
        .map(|j| avg(&|g| b(g) * (g[1 + j] - a(g))) / v)
        .collect();
    let st: Vec<f64> = (0..k)
        .map(|j| 0.5 * avg(&|g| (a(g) - g[1 + j]).powi(2)) / v)
        .collect();
    let s2 = second_order.then(|| {
        (0..k)
            .map(|j| {
                (0..k)
                    .map(|l| {
                        if j < l {
                            let vjl = avg(&|g| g[1 + k + j] * g[1 + l] - a(g) * b(g)) / v;
                            vjl - s1[j] - s1[l]
                        } else {
                            f64::NAN
                        }
                    })
                    .collect()
            })
            .collect()
    });

    Some(Estimates { s1, st, s2 })
}
