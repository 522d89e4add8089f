//! cs-project: analysis configuration files, validation and presets.

pub mod convert;
pub mod presets;
pub mod schema;
pub mod system;
pub mod validate;

pub use presets::{BUILTIN_NAMES, builtin};
pub use schema::*;
pub use system::FieldVisitor;
pub use validate::{ValidationError, validate_config};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ProjectResult<AnalysisConfig> {
    let config: AnalysisConfig = serde_yaml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<AnalysisConfig> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &std::path::Path, config: &AnalysisConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<AnalysisConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AnalysisConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_json(path: &std::path::Path, config: &AnalysisConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<AnalysisConfig> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
