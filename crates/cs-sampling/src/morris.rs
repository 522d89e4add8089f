//! Morris one-at-a-time trajectory design.

use cs_core::{ConfigError, ConfigResult, GroupId, ParameterSpace};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::design::{Design, DesignRow, Scheme};

/// Morris sampler configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct MorrisSampler {
    pub num_trajectories: usize,
    /// Grid levels `p`, even and at least 4.
    pub num_levels: usize,
    pub seed: u64,
}

impl MorrisSampler {
    pub fn new(num_trajectories: usize) -> Self {
        Self {
            num_trajectories,
            num_levels: 4,
            seed: 0,
        }
    }

    pub fn with_levels(mut self, num_levels: usize) -> Self {
        self.num_levels = num_levels;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Step between consecutive trajectory points in the unit cube,
    /// `p / (2 (p - 1))`.
    pub fn delta(num_levels: usize) -> f64 {
        num_levels as f64 / (2.0 * (num_levels as f64 - 1.0))
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.num_trajectories == 0 {
            return Err(ConfigError::InvalidSampler {
                what: "number of Morris trajectories must be positive".into(),
            });
        }
        if self.num_levels < 4 || self.num_levels % 2 != 0 {
            return Err(ConfigError::InvalidSampler {
                what: format!(
                    "num_levels must be an even integer >= 4, got {}",
                    self.num_levels
                ),
            });
        }
        Ok(())
    }

    /// Generate `num_trajectories` trajectories of `k + 1` rows.
    ///
    /// Each trajectory starts from a random grid point `x*` whose
    /// coordinates are drawn from `{0, 1/(p-1), ..., 1 - Δ}`, then moves
    /// coordinates one at a time, in random order, by `Δ` in a random
    /// direction: coordinates heading down start at `x* + Δ` and end at
    /// `x*`, so every row stays inside the unit cube.
    pub fn sample(&self, space: &ParameterSpace) -> ConfigResult<Design> {
        self.validate()?;

        let k = space.num_vars();
        let p = self.num_levels;
        let delta = Self::delta(p);
        let step = 1.0 / (p as f64 - 1.0);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let scheme = Scheme::Morris {
            num_trajectories: self.num_trajectories,
            num_levels: p,
        };
        let mut rows = Vec::with_capacity(self.num_trajectories * (k + 1));
        let mut order: Vec<usize> = (0..k).collect();

        for r in 0..self.num_trajectories {
            let group = GroupId::from_index(r as u32);

            let base: Vec<f64> = (0..k)
                .map(|_| rng.gen_range(0..p / 2) as f64 * step)
                .collect();
            let upward: Vec<bool> = (0..k).map(|_| rng.gen_bool(0.5)).collect();
            order.shuffle(&mut rng);

            let mut unit: Vec<f64> = base
                .iter()
                .zip(&upward)
                .map(|(&x, &up)| if up { x } else { x + delta })
                .collect();
            rows.push(DesignRow {
                group,
                values: space.scale_point(&unit),
                unit: unit.clone(),
            });

            for &j in &order {
                unit[j] = if upward[j] { base[j] + delta } else { base[j] };
                rows.push(DesignRow {
                    group,
                    values: space.scale_point(&unit),
                    unit: unit.clone(),
                });
            }
        }

        debug!(
            rows = rows.len(),
            trajectories = self.num_trajectories,
            levels = p,
            "Morris design generated"
        );
        Ok(Design::new(scheme, k, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> ParameterSpace {
        ParameterSpace::new(
            3,
            vec!["sigma", "beta", "rho"],
            vec![(0.5, 20.0), (0.5, 5.0), (20.0, 50.0)],
        )
        .unwrap()
    }

    #[test]
    fn delta_for_four_levels_is_two_thirds() {
        assert!((MorrisSampler::delta(4) - 2.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn row_count_is_r_times_k_plus_1() {
        let design = MorrisSampler::new(32).sample(&space()).unwrap();
        assert_eq!(design.len(), 32 * 4);
        assert_eq!(design.num_groups(), 32);
    }

    #[test]
    fn unit_coordinates_lie_on_the_level_grid() {
        let design = MorrisSampler::new(20).with_levels(6).sample(&space()).unwrap();
        for row in design.rows() {
            for &u in &row.unit {
                let level = u * 5.0;
                assert!((level - level.round()).abs() < 1e-9, "u={u}");
                assert!((0.0..=1.0 + 1e-12).contains(&u));
            }
        }
    }

    #[test]
    fn each_coordinate_moves_exactly_once_per_trajectory() {
        let design = MorrisSampler::new(10).sample(&space()).unwrap();
        let delta = MorrisSampler::delta(4);
        for traj in design.groups() {
            let mut moved = vec![0; 3];
            for w in traj.windows(2) {
                for i in 0..3 {
                    let d = w[1].unit[i] - w[0].unit[i];
                    if d != 0.0 {
                        assert!((d.abs() - delta).abs() < 1e-12);
                        moved[i] += 1;
                    }
                }
            }
            assert_eq!(moved, vec![1, 1, 1]);
        }
    }

    #[test]
    fn invalid_levels_and_counts_are_rejected() {
        for levels in [2, 3, 5] {
            assert!(matches!(
                MorrisSampler::new(4).with_levels(levels).sample(&space()),
                Err(ConfigError::InvalidSampler { .. })
            ));
        }
        assert!(MorrisSampler::new(0).sample(&space()).is_err());
    }
}
