//! Pipeline runs on non-chaotic fields where the answer is known.

use cs_analysis::{AnalysisOptions, BatchOptions, FailurePolicy, analyze_with};
use cs_core::ParameterSpace;
use cs_sim::{SolveOptions, VectorField};
use nalgebra::DVector;

/// `dx/dt = rate`; the second parameter never enters the dynamics.
struct Drift;

impl VectorField for Drift {
    fn name(&self) -> &str {
        "drift"
    }
    fn dim(&self) -> usize {
        1
    }
    fn param_names(&self) -> &[&'static str] {
        &["rate", "inert"]
    }
    fn rhs(&self, _t: f64, _x: &DVector<f64>, p: &[f64]) -> DVector<f64> {
        DVector::from_element(1, p[0])
    }
}

/// Finite-time blow-up whenever `a > 1`.
struct Blowup;

impl VectorField for Blowup {
    fn name(&self) -> &str {
        "blowup"
    }
    fn dim(&self) -> usize {
        1
    }
    fn param_names(&self) -> &[&'static str] {
        &["a", "b"]
    }
    fn rhs(&self, _t: f64, x: &DVector<f64>, p: &[f64]) -> DVector<f64> {
        if p[0] > 1.0 {
            x.map(|v| 10.0 * v * v)
        } else {
            x.map(|v| -p[1] * v)
        }
    }
}

fn short_run() -> AnalysisOptions {
    AnalysisOptions {
        batch: BatchOptions {
            solve: SolveOptions {
                t_span: (0.0, 1.0),
                num_points: 11,
                ..SolveOptions::default()
            },
            ..BatchOptions::default()
        },
        ..AnalysisOptions::default()
    }
}

fn space() -> ParameterSpace {
    ParameterSpace::new(2, vec!["rate", "inert"], vec![(-1.0, 3.0), (0.0, 5.0)]).unwrap()
}

#[test]
fn independent_parameter_is_screened_out() {
    let (sobol, morris) = analyze_with(&Drift, &[0.0], &space(), 64, &short_run(), None).unwrap();

    assert_eq!(sobol.names, vec!["rate", "inert"]);
    assert_eq!(sobol.s1[1], 0.0);
    assert_eq!(sobol.st[1], 0.0);
    assert_eq!(morris.mu_star[1], 0.0);
    assert_eq!(morris.sigma[1], 0.0);

    assert!(sobol.s1[0] > 0.8, "S1={:?}", sobol.s1);
    assert!(sobol.st[0] > 0.8, "ST={:?}", sobol.st);
    // x(1) = rate, so every effect equals the width of the rate interval.
    assert!((morris.mu_star[0] - 4.0).abs() < 1e-6, "{:?}", morris.mu_star);
    assert!(morris.sigma[0] < 1e-6);
}

#[test]
fn diverging_rows_are_flagged_and_excluded() {
    let space = ParameterSpace::new(2, vec!["a", "b"], vec![(0.0, 1.5), (0.0, 1.0)]).unwrap();
    let (sobol, morris) = analyze_with(&Blowup, &[1.0], &space, 32, &short_run(), None).unwrap();

    assert!(!sobol.excluded_groups.is_empty());
    assert!(sobol.excluded_groups.len() < 32);
    assert!(sobol.s1.iter().all(|s| s.is_finite()));
    assert!(morris.mu_star.iter().all(|m| m.is_finite() && *m >= 0.0));
}

#[test]
fn fail_fast_aborts_on_divergence() {
    let space = ParameterSpace::new(2, vec!["a", "b"], vec![(0.0, 1.5), (0.0, 1.0)]).unwrap();
    let mut opts = short_run();
    opts.batch.policy = FailurePolicy::FailFast;
    let err = analyze_with(&Blowup, &[1.0], &space, 32, &opts, None).unwrap_err();
    assert!(err.row().is_some(), "{err}");
}
