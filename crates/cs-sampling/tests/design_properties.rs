//! Property tests for Saltelli and Morris designs over random parameter spaces.

use cs_core::ParameterSpace;
use cs_sampling::{MorrisSampler, SaltelliSampler};
use proptest::prelude::*;

fn arb_space() -> impl Strategy<Value = ParameterSpace> {
    prop::collection::vec((-50.0_f64..50.0, 1e-3_f64..100.0), 1..=6).prop_map(|raw| {
        let k = raw.len();
        let names: Vec<String> = (0..k).map(|i| format!("p{i}")).collect();
        let bounds: Vec<(f64, f64)> = raw.iter().map(|&(lo, w)| (lo, lo + w)).collect();
        ParameterSpace::new(k, names, bounds).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn saltelli_rows_count_and_bounds(space in arb_space(), log_n in 0_u32..7, seed in proptest::option::of(any::<u64>())) {
        let n = 1_usize << log_n;
        let mut sampler = SaltelliSampler::new(n);
        sampler.seed = seed;
        let design = sampler.sample(&space).unwrap();
        let k = space.num_vars();

        prop_assert_eq!(design.len(), n * (2 * k + 2));
        for row in design.rows() {
            prop_assert_eq!(row.values.len(), k);
            prop_assert!(space.contains(&row.values));
        }
    }

    #[test]
    fn morris_rows_count_bounds_and_one_at_a_time(
        space in arb_space(),
        r in 1_usize..20,
        half_levels in 2_usize..6,
        seed in any::<u64>(),
    ) {
        let design = MorrisSampler::new(r)
            .with_levels(2 * half_levels)
            .with_seed(seed)
            .sample(&space)
            .unwrap();
        let k = space.num_vars();

        prop_assert_eq!(design.len(), r * (k + 1));
        for row in design.rows() {
            prop_assert!(space.contains(&row.values));
        }
        for traj in design.groups() {
            for w in traj.windows(2) {
                let changed = w[0]
                    .unit
                    .iter()
                    .zip(&w[1].unit)
                    .filter(|(a, b)| a != b)
                    .count();
                prop_assert_eq!(changed, 1);
            }
        }
    }

    #[test]
    fn fixed_seed_reproduces_designs(space in arb_space(), seed in any::<u64>()) {
        let m1 = MorrisSampler::new(8).with_seed(seed).sample(&space).unwrap();
        let m2 = MorrisSampler::new(8).with_seed(seed).sample(&space).unwrap();
        prop_assert_eq!(m1, m2);

        let s1 = SaltelliSampler::new(8).with_seed(seed).sample(&space).unwrap();
        let s2 = SaltelliSampler::new(8).with_seed(seed).sample(&space).unwrap();
        prop_assert_eq!(s1, s2);
    }
}
