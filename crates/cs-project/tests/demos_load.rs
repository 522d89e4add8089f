use std::path::Path;

#[test]
fn demo_configs_load_and_validate() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/configs");
    let demos = ["lorenz.yaml", "yang_quick.yaml", "disturbed_lorenz.yaml"];

    for name in demos {
        let path = root.join(name);
        let config =
            cs_project::load(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        cs_project::validate_config(&config)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
    }
}

#[test]
fn lorenz_demo_matches_builtin() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/configs");
    let loaded = cs_project::load_yaml(&root.join("lorenz.yaml")).unwrap();
    assert_eq!(loaded, cs_project::builtin("lorenz").unwrap());
}

#[test]
fn yang_demo_overrides_reach_the_options() {
    use cs_sim::{IntegratorType, ObservationTime};

    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/configs");
    let config = cs_project::load_yaml(&root.join("yang_quick.yaml")).unwrap();
    let opts = config.analysis_options();

    assert!(!opts.second_order);
    assert!(opts.scramble);
    assert_eq!(opts.seed, 7);
    assert_eq!(opts.batch.threads, Some(2));
    assert_eq!(opts.batch.solve.t_span, (0.0, 5.0));
    assert_eq!(opts.batch.solve.num_points, 501);
    assert_eq!(opts.batch.solve.integrator, IntegratorType::DormandPrince45);
    assert_eq!(opts.batch.observable.component, 2);
    assert_eq!(opts.batch.observable.time, ObservationTime::Index(250));
}
