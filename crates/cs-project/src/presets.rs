//! Built-in studies for the three shipped systems.

use crate::schema::{
    AnalysisConfig, FailurePolicyDef, LATEST_VERSION, ObservableDef, ParameterDef, SamplingDef,
    SolverDef, SystemDef,
};

/// Names accepted by [`builtin`].
pub const BUILTIN_NAMES: &[&str] = &["lorenz", "yang", "disturbed_lorenz"];

fn ranges(defs: &[(&str, f64, f64)]) -> Vec<ParameterDef> {
    defs.iter()
        .map(|&(name, lower, upper)| ParameterDef {
            name: name.to_string(),
            lower,
            upper,
        })
        .collect()
}

fn study(
    name: &str,
    system: SystemDef,
    initial_state: Vec<f64>,
    parameters: Vec<ParameterDef>,
    nominal: Vec<f64>,
) -> AnalysisConfig {
    AnalysisConfig {
        version: LATEST_VERSION,
        name: name.to_string(),
        system,
        initial_state,
        parameters,
        nominal: Some(nominal),
        sampling: SamplingDef::default(),
        solver: SolverDef::default(),
        observable: ObservableDef::default(),
        failure_policy: FailurePolicyDef::default(),
        threads: None,
    }
}

/// A built-in study by name, or `None` if unknown.
pub fn builtin(name: &str) -> Option<AnalysisConfig> {
    let config = match name {
        "lorenz" => study(
            "Lorenz",
            SystemDef::Lorenz,
            vec![1.0; 3],
            ranges(&[("sigma", 0.5, 20.0), ("beta", 0.5, 5.0), ("rho", 20.0, 50.0)]),
            vec![10.0, 8.0 / 3.0, 28.0],
        ),
        "yang" => study(
            "Yang",
            SystemDef::Yang,
            vec![1.5; 3],
            ranges(&[("alpha", 0.5, 20.0), ("beta", 0.5, 5.0), ("gamma", 5.0, 30.0)]),
            vec![10.0, 8.0 / 3.0, 28.0],
        ),
        "disturbed_lorenz" => study(
            "Disturbed Lorenz",
            SystemDef::DisturbedLorenz {
                sigma: 10.0,
                rho: 28.0,
                beta: 8.0 / 3.0,
            },
            vec![1.0; 6],
            ranges(&[("eps", 0.5, 2.0), ("delta", 3.0, 8.0), ("ni", 0.2, 3.0)]),
            vec![1.0, 5.0, 1.0],
        ),
        _ => return None,
    };
    Some(config)
}
