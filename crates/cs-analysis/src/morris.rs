//! Morris elementary-effects screening.

use cs_core::{ConfigError, ParameterSpace};
use cs_sampling::{Design, Scheme};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::batch::SimulationOutput;
use crate::error::{AnalysisError, AnalysisResult};
use crate::stats::{Bootstrap, mean, resample_indices, std_dev};

/// Elementary-effect statistics per parameter, ordered like the parameter
/// space's names.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MorrisResult {
    pub names: Vec<String>,
    /// Mean of the signed effects.
    pub mu: Vec<f64>,
    /// Mean of the absolute effects.
    pub mu_star: Vec<f64>,
    /// Sample standard deviation of the signed effects.
    pub sigma: Vec<f64>,
    pub mu_star_conf: Vec<f64>,
    /// Trajectories skipped because they held a flagged or non-finite output.
    pub excluded_trajectories: Vec<usize>,
}

impl MorrisResult {
    /// `(mu_star, sigma)` for a parameter name.
    pub fn get(&self, name: &str) -> Option<(f64, f64)> {
        let i = self.names.iter().position(|n| n == name)?;
        Some((self.mu_star[i], self.sigma[i]))
    }
}

/// Aggregates one elementary effect per parameter and trajectory.
///
/// Along a trajectory exactly one unit coordinate `j` changes between
/// consecutive rows; the effect is `(y_r - y_{r-1}) / (u_r[j] - u_{r-1}[j])`,
/// which carries the sign of the step direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MorrisAnalyzer {
    pub bootstrap: Bootstrap,
}

impl MorrisAnalyzer {
    pub fn new(bootstrap: Bootstrap) -> Self {
        Self { bootstrap }
    }

    pub fn analyze(
        &self,
        space: &ParameterSpace,
        design: &Design,
        output: &SimulationOutput,
    ) -> AnalysisResult<MorrisResult> {
        if !matches!(design.scheme(), Scheme::Morris { .. }) {
            return Err(AnalysisError::SchemeMismatch {
                analyzer: "Morris",
                scheme: "Saltelli",
            });
        }
        let k = space.num_vars();
        if design.num_vars() != k {
            return Err(ConfigError::ArityMismatch {
                field: "design".to_string(),
                expected: design.num_vars(),
                actual: k,
            }
            .into());
        }
        let z = self.bootstrap.z_score()?;

        let group_size = k + 1;
        if output.is_empty() || output.len() % group_size != 0 {
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

        let mut effects: Vec<Vec<f64>> = vec![Vec::new(); k];
        let mut excluded_trajectories = Vec::new();
        for (t, traj) in design.groups().enumerate() {
            let start = t * group_size;
            if !(start..start + group_size).all(|row| output.is_valid(row)) {
                excluded_trajectories.push(t);
                continue;
            }
            let y = &output.values()[start..start + group_size];
            for (step, pair) in traj.windows(2).enumerate() {
                let (prev, next) = (&pair[0].unit, &pair[1].unit);
                let changed: Vec<usize> = (0..k).filter(|&i| prev[i] != next[i]).collect();
                let [j] = changed[..] else {
                    return Err(AnalysisError::MalformedTrajectory {
                        trajectory: t,
                        step,
                        changed: changed.len(),
                    });
                };
                effects[j].push((y[step + 1] - y[step]) / (next[j] - prev[j]));
            }
        }

        let total = design.num_groups();
        if !excluded_trajectories.is_empty() {
            warn!(
                excluded = excluded_trajectories.len(),
                total, "Morris trajectories with flagged rows were excluded"
            );
        }
        if excluded_trajectories.len() == total {
            return Err(AnalysisError::InsufficientGroups {
                valid: 0,
                total,
                required: 1,
            });
        }

        let mut rng = StdRng::seed_from_u64(self.bootstrap.seed);
        let mut mu = Vec::with_capacity(k);
        let mut mu_star = Vec::with_capacity(k);
        let mut sigma = Vec::with_capacity(k);
        let mut mu_star_conf = Vec::with_capacity(k);
        for ee in &effects {
            let abs: Vec<f64> = ee.iter().map(|e| e.abs()).collect();
            mu.push(mean(ee));
            mu_star.push(mean(&abs));
            sigma.push(if ee.len() < 2 { 0.0 } else { std_dev(ee, 1) });

            let draws: Vec<f64> = (0..self.bootstrap.num_resamples)
                .map(|_| {
                    let picked: Vec<f64> = resample_indices(&mut rng, abs.len())
                        .into_iter()
                        .map(|i| abs[i])
                        .collect();
                    mean(&picked)
                })
                .collect();
            mu_star_conf.push(Bootstrap::half_width(z, &draws));
        }

        debug!(
            trajectories = total - excluded_trajectories.len(),
            "Morris effects aggregated"
        );

        Ok(MorrisResult {
            names: space.names().to_vec(),
            mu,
            mu_star,
            sigma,
            mu_star_conf,
            excluded_trajectories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_sampling::{MorrisSampler, SaltelliSampler};

    fn space() -> ParameterSpace {
        ParameterSpace::new(
            3,
            vec!["x0", "x1", "x2"],
            vec![(0.0, 1.0), (-2.0, 2.0), (0.0, 10.0)],
        )
        .unwrap()
    }

    fn outputs(design: &Design, f: impl Fn(&[f64]) -> f64) -> SimulationOutput {
        SimulationOutput::from_values(design.rows().iter().map(|r| f(&r.values)).collect())
    }

    #[test]
    fn linear_model_effects_are_slope_times_width() {
        let design = MorrisSampler::new(20).sample(&space()).unwrap();
        let out = outputs(&design, |x| 2.0 * x[1] - 0.5 * x[2]);
        let res = MorrisAnalyzer::default()
            .analyze(&space(), &design, &out)
            .unwrap();

        assert_eq!(res.mu_star[0], 0.0);
        assert_eq!(res.sigma[0], 0.0);
        assert!((res.mu_star[1] - 8.0).abs() < 1e-9, "{:?}", res.mu_star);
        assert!((res.mu[1] - 8.0).abs() < 1e-9);
        assert!((res.mu_star[2] - 5.0).abs() < 1e-9);
        assert!((res.mu[2] + 5.0).abs() < 1e-9);
        assert!(res.sigma.iter().all(|s| *s < 1e-9));
        assert!(res.mu_star_conf.iter().all(|c| *c < 1e-9));
    }

    #[test]
    fn interaction_shows_up_in_sigma() {
        let design = MorrisSampler::new(30).with_seed(5).sample(&space()).unwrap();
        let out = outputs(&design, |x| x[0] * x[1]);
        let res = MorrisAnalyzer::default()
            .analyze(&space(), &design, &out)
            .unwrap();
        assert!(res.sigma[0] > 0.0);
        assert!(res.mu_star.iter().all(|m| *m >= 0.0));
        assert!(res.sigma.iter().all(|s| *s >= 0.0));
        assert_eq!(res.get("x2"), Some((0.0, 0.0)));
    }

    #[test]
    fn single_trajectory_reports_zero_sigma() {
        let design = MorrisSampler::new(1).sample(&space()).unwrap();
        let out = outputs(&design, |x| x[0] + x[1] * x[1]);
        let res = MorrisAnalyzer::default()
            .analyze(&space(), &design, &out)
            .unwrap();
        assert_eq!(res.sigma, vec![0.0; 3]);
        assert!(res.mu_star_conf.iter().all(|c| c.abs() < 1e-12));
    }

    #[test]
    fn flagged_trajectories_are_skipped() {
        let design = MorrisSampler::new(6).sample(&space()).unwrap();
        let mut values: Vec<f64> = design.rows().iter().map(|r| r.values[0]).collect();
        values[4 * 2 + 1] = f64::NAN;
        let res = MorrisAnalyzer::default()
            .analyze(&space(), &design, &SimulationOutput::from_values(values))
            .unwrap();
        assert_eq!(res.excluded_trajectories, vec![2]);
        assert!((res.mu_star[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn all_trajectories_flagged_is_an_error() {
        let design = MorrisSampler::new(2).sample(&space()).unwrap();
        let out = SimulationOutput::from_values(vec![f64::NAN; design.len()]);
        assert!(matches!(
            MorrisAnalyzer::default().analyze(&space(), &design, &out),
            Err(AnalysisError::InsufficientGroups { valid: 0, .. })
        ));
    }

    #[test]
    fn shape_and_scheme_errors() {
        let design = MorrisSampler::new(3).sample(&space()).unwrap();
        let short = SimulationOutput::from_values(vec![0.0; design.len() - 1]);
        assert_eq!(
            MorrisAnalyzer::default().analyze(&space(), &design, &short),
            Err(AnalysisError::DesignShape {
                len: 11,
                group_size: 4
            })
        );

        let saltelli = SaltelliSampler::new(2).sample(&space()).unwrap();
        let out = SimulationOutput::from_values(vec![0.0; saltelli.len()]);
        assert!(matches!(
            MorrisAnalyzer::default().analyze(&space(), &saltelli, &out),
            Err(AnalysisError::SchemeMismatch { .. })
        ));
    }
}
