//! Semantic validation of analysis configurations.

use std::collections::HashSet;

use cs_core::{ConfigError, all_finite};

use crate::schema::{AnalysisConfig, LATEST_VERSION};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Invalid parameter space: {0}")]
    Space(#[from] ConfigError),
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_config(config: &AnalysisConfig) -> Result<(), ValidationError> {
    if config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }
    if config.name.trim().is_empty() {
        return Err(invalid("name", "", "must not be empty"));
    }

    let system = &config.system;
    let dim = system.dim();
    let expected = system.param_names();

    if config.initial_state.len() != dim {
        return Err(invalid(
            "initial_state",
            format!("{:?}", config.initial_state),
            &format!("{} needs {} states", system.label(), dim),
        ));
    }
    if !all_finite(&config.initial_state) {
        return Err(invalid(
            "initial_state",
            format!("{:?}", config.initial_state),
            "values must be finite",
        ));
    }

    let names: Vec<&str> = config.parameters.iter().map(|p| p.name.as_str()).collect();
    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(*name) {
            return Err(ConfigError::DuplicateName {
                name: name.to_string(),
            }
            .into());
        }
    }
    if names != expected {
        return Err(invalid(
            "parameters",
            names.join(", "),
            &format!(
                "{} expects parameters [{}] in this order",
                system.label(),
                expected.join(", ")
            ),
        ));
    }
    config.parameter_space()?;

    if let Some(nominal) = &config.nominal
        && nominal.len() != expected.len()
    {
        return Err(invalid(
            "nominal",
            format!("{nominal:?}"),
            &format!("{} needs {} parameter values", system.label(), expected.len()),
        ));
    }

    let sampling = &config.sampling;
    if sampling.num_samples == 0 {
        return Err(invalid("sampling.num_samples", 0, "must be positive"));
    }
    if sampling.morris_trajectories == Some(0) {
        return Err(invalid("sampling.morris_trajectories", 0, "must be positive"));
    }
    if sampling.num_levels < 4 || sampling.num_levels % 2 != 0 {
        return Err(invalid(
            "sampling.num_levels",
            sampling.num_levels,
            "must be an even integer >= 4",
        ));
    }
    if sampling.num_resamples < 2 {
        return Err(invalid(
            "sampling.num_resamples",
            sampling.num_resamples,
            "must be at least 2",
        ));
    }
    if !(sampling.conf_level > 0.0 && sampling.conf_level < 1.0) {
        return Err(invalid(
            "sampling.conf_level",
            sampling.conf_level,
            "must lie strictly between 0 and 1",
        ));
    }

    let solver = &config.solver;
    if !(solver.t_start.is_finite() && solver.t_end.is_finite() && solver.t_start < solver.t_end)
    {
        return Err(invalid(
            "solver.t_end",
            solver.t_end,
            "time span must be finite with t_start < t_end",
        ));
    }
    if solver.num_points < 2 {
        return Err(invalid("solver.num_points", solver.num_points, "must be at least 2"));
    }
    if !(solver.rtol > 0.0 && solver.atol > 0.0) {
        return Err(invalid(
            "solver.rtol",
            format!("rtol={}, atol={}", solver.rtol, solver.atol),
            "tolerances must be positive",
        ));
    }
    if let Some(h) = solver.max_step
        && !(h > 0.0)
    {
        return Err(invalid("solver.max_step", h, "must be positive"));
    }
    if solver.max_steps == 0 {
        return Err(invalid("solver.max_steps", 0, "must be positive"));
    }

    if config.observable.component >= dim {
        return Err(invalid(
            "observable.component",
            config.observable.component,
            &format!("{} has {} states", system.label(), dim),
        ));
    }
    if let Some(i) = config.observable.time_index
        && i >= solver.num_points
    {
        return Err(invalid(
            "observable.time_index",
            i,
            "must be below solver.num_points",
        ));
    }
    if config.threads == Some(0) {
        return Err(invalid("threads", 0, "must be positive"));
    }

    Ok(())
}
