//! Saltelli radial design for Sobol indices.

use cs_core::{ConfigError, ConfigResult, GroupId, ParameterSpace};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::design::{Design, DesignRow, Scheme};
use crate::sobol_seq::SobolSequence;

/// Saltelli sampler configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SaltelliSampler {
    /// Base sample count `N`; powers of two keep the Sobol points balanced.
    pub base_samples: usize,
    /// Emit the `BA_j` rows needed for second-order indices.
    pub second_order: bool,
    /// Digital-shift seed; `None` uses the plain Sobol sequence.
    pub seed: Option<u64>,
}

impl SaltelliSampler {
    pub fn new(base_samples: usize) -> Self {
        Self {
            base_samples,
            second_order: true,
            seed: None,
        }
    }

    pub fn with_second_order(mut self, second_order: bool) -> Self {
        self.second_order = second_order;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generate `N` radial groups.
    ///
    /// Each group is built from one `2k`-dimensional Sobol point split into
    /// `A` (first `k` coordinates) and `B` (last `k`) and is laid out as
    /// `A, AB_1..AB_k, BA_1..BA_k, B`, where `AB_j` is `A` with coordinate
    /// `j` taken from `B` and `BA_j` is `B` with coordinate `j` taken from
    /// `A`. Without second order the `BA_j` rows are omitted.
    pub fn sample(&self, space: &ParameterSpace) -> ConfigResult<Design> {
        if self.base_samples == 0 {
            return Err(ConfigError::InvalidSampler {
                what: "base sample count N must be positive".into(),
            });
        }
        if !self.base_samples.is_power_of_two() {
            warn!(
                n = self.base_samples,
                "Sobol base sample count is not a power of two; balance properties are lost"
            );
        }

        let k = space.num_vars();
        let mut seq = SobolSequence::new(2 * k)?;
        if let Some(seed) = self.seed {
            seq = seq.scrambled(&mut StdRng::seed_from_u64(seed));
        }

        let scheme = Scheme::Saltelli {
            base_samples: self.base_samples,
            second_order: self.second_order,
        };
        let mut rows = Vec::with_capacity(self.base_samples * scheme.group_size(k));

        for i in 0..self.base_samples {
            let group = GroupId::from_index(i as u32);
            let point = seq.next_point().ok_or_else(|| ConfigError::InvalidSampler {
                what: format!("base sample count {} exceeds the Sobol sequence", self.base_samples),
            })?;
            let (a, b) = point.split_at(k);

            let mut push = |unit: Vec<f64>| {
                rows.push(DesignRow {
                    group,
                    values: space.scale_point(&unit),
                    unit,
                });
            };

            push(a.to_vec());
            for j in 0..k {
                let mut ab = a.to_vec();
                ab[j] = b[j];
                push(ab);
            }
            if self.second_order {
                for j in 0..k {
                    let mut ba = b.to_vec();
                    ba[j] = a[j];
                    push(ba);
                }
            }
            push(b.to_vec());
        }

        debug!(
            rows = rows.len(),
            groups = self.base_samples,
            second_order = self.second_order,
            "Saltelli design generated"
        );
        Ok(Design::new(scheme, k, rows))
    }
}
