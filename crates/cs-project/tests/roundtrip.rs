use cs_project::schema::*;
use cs_project::{BUILTIN_NAMES, builtin, load_json, load_yaml, save_json, save_yaml};

#[test]
fn roundtrip_yaml_builtins() {
    let temp_dir = std::env::temp_dir();
    for name in BUILTIN_NAMES {
        let config = builtin(name).unwrap();
        let path = temp_dir.join(format!("cs_project_roundtrip_{name}.yaml"));
        save_yaml(&path, &config).unwrap();
        let loaded = load_yaml(&path).unwrap();
        assert_eq!(config, loaded);
    }
}

#[test]
fn roundtrip_json_with_overrides() {
    let mut config = builtin("disturbed_lorenz").unwrap();
    config.solver.integrator = IntegratorDef::Rk4;
    config.solver.max_step = Some(0.01);
    config.observable.time_index = Some(10);
    config.failure_policy = FailurePolicyDef::FailFast;
    config.sampling.morris_trajectories = Some(12);
    config.threads = Some(4);

    let path = std::env::temp_dir().join("cs_project_roundtrip_overrides.json");
    save_json(&path, &config).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn minimal_yaml_fills_defaults() {
    let yaml = r#"
name: minimal
system:
  type: lorenz
initial_state: [1, 1, 1]
parameters:
  - { name: sigma, lower: 0.5, upper: 20 }
  - { name: beta, lower: 0.5, upper: 5 }
  - { name: rho, lower: 20, upper: 50 }
"#;
    let config = cs_project::from_yaml_str(yaml).unwrap();
    assert_eq!(config.version, LATEST_VERSION);
    assert_eq!(config.sampling, SamplingDef::default());
    assert_eq!(config.solver, SolverDef::default());
    assert_eq!(config.observable, ObservableDef::default());
    assert_eq!(config.failure_policy, FailurePolicyDef::FlagRow);
    assert!(config.nominal.is_none());
}

#[test]
fn disturbed_lorenz_base_constants_default() {
    let yaml = r#"
name: d
system: { type: disturbed_lorenz }
initial_state: [1, 1, 1, 1, 1, 1]
parameters:
  - { name: eps, lower: 0.5, upper: 2 }
  - { name: delta, lower: 3, upper: 8 }
  - { name: ni, lower: 0.2, upper: 3 }
"#;
    let config = cs_project::from_yaml_str(yaml).unwrap();
    assert_eq!(
        config.system,
        SystemDef::DisturbedLorenz {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0
        }
    );
}
