//! oc-project: engine parameter files and validation.

pub mod schema;
pub mod validate;

pub use schema::{EngineParameters, Parameter, RawParameters};
pub use validate::{ConfigError, ConfigResult, validate_parameters};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unsupported file format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> ProjectResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Read parameters without validating them.
pub fn load_raw(path: &Path) -> ProjectResult<RawParameters> {
    let format = format_of(path)?;
    let content = std::fs::read_to_string(path)?;
    let raw = match format {
        Format::Yaml => serde_yaml::from_str(&content)?,
        Format::Json => serde_json::from_str(&content)?,
    };
    tracing::debug!(path = %path.display(), "parameters loaded");
    Ok(raw)
}

/// Read and validate a parameter file (format chosen by extension).
pub fn load(path: &Path) -> ProjectResult<EngineParameters> {
    Ok(validate_parameters(&load_raw(path)?)?)
}

pub fn load_yaml(path: &Path) -> ProjectResult<EngineParameters> {
    let content = std::fs::read_to_string(path)?;
    let raw: RawParameters = serde_yaml::from_str(&content)?;
    Ok(validate_parameters(&raw)?)
}

pub fn load_json(path: &Path) -> ProjectResult<EngineParameters> {
    let content = std::fs::read_to_string(path)?;
    let raw: RawParameters = serde_json::from_str(&content)?;
    Ok(validate_parameters(&raw)?)
}

/// Read parameters from the process environment, by their short names
/// (`n`, `z`, `rv`, `T1`, ...).
pub fn load_env() -> ProjectResult<EngineParameters> {
    let raw = RawParameters::from_lookup(|name| std::env::var(name).ok())?;
    Ok(validate_parameters(&raw)?)
}

pub fn save_yaml(path: &Path, params: &EngineParameters) -> ProjectResult<()> {
    let content = serde_yaml::to_string(&params.to_raw())?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn save_json(path: &Path, params: &EngineParameters) -> ProjectResult<()> {
    let content = serde_json::to_string_pretty(&params.to_raw())?;
    std::fs::write(path, content)?;
    Ok(())
}
