use cs_core::ConfigError;
use cs_project::{
    AnalysisConfig, ProjectError, ValidationError, builtin, from_yaml_str, validate_config,
};

fn field_of(err: ValidationError) -> String {
    match err {
        ValidationError::InvalidValue { field, .. } => field,
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn parameters_must_follow_system_order() {
    let mut config = builtin("lorenz").unwrap();
    config.parameters.swap(1, 2);
    assert_eq!(field_of(validate_config(&config).unwrap_err()), "parameters");
}

#[test]
fn inverted_bounds_are_rejected() {
    let mut config = builtin("lorenz").unwrap();
    config.parameters[0].lower = 30.0;
    assert!(matches!(
        validate_config(&config),
        Err(ValidationError::Space(ConfigError::InvalidBounds { .. }))
    ));
}

#[test]
fn duplicate_names_are_rejected() {
    let mut config = builtin("yang").unwrap();
    config.parameters[2].name = "alpha".to_string();
    assert!(matches!(
        validate_config(&config),
        Err(ValidationError::Space(ConfigError::DuplicateName { .. }))
    ));
}

#[test]
fn state_dimension_must_match_system() {
    let mut config = builtin("disturbed_lorenz").unwrap();
    config.initial_state.truncate(3);
    assert_eq!(field_of(validate_config(&config).unwrap_err()), "initial_state");
}

#[test]
fn sampler_and_solver_settings_are_checked() {
    let cases: [(&str, fn(&mut AnalysisConfig)); 8] = [
        ("sampling.num_samples", |c| c.sampling.num_samples = 0),
        ("sampling.num_levels", |c| c.sampling.num_levels = 5),
        ("sampling.conf_level", |c| c.sampling.conf_level = 1.5),
        ("solver.t_end", |c| c.solver.t_end = -1.0),
        ("solver.num_points", |c| c.solver.num_points = 1),
        ("observable.component", |c| c.observable.component = 3),
        ("observable.time_index", |c| c.observable.time_index = Some(10_000)),
        ("threads", |c| c.threads = Some(0)),
    ];
    for (field, mutate) in cases {
        let mut config = builtin("lorenz").unwrap();
        mutate(&mut config);
        assert_eq!(field_of(validate_config(&config).unwrap_err()), field);
    }
}

#[test]
fn newer_versions_are_unsupported() {
    let mut config = builtin("lorenz").unwrap();
    config.version = 99;
    assert!(matches!(
        validate_config(&config),
        Err(ValidationError::UnsupportedVersion { version: 99 })
    ));
}

#[test]
fn unknown_system_type_is_a_yaml_error() {
    let yaml = "name: x\nsystem: { type: rossler }\ninitial_state: [1]\nparameters: []\n";
    assert!(matches!(from_yaml_str(yaml), Err(ProjectError::Yaml(_))));
}
