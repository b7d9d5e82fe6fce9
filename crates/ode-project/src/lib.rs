//! ode-project: equation file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_equation};

/// Newest equation file version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

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

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<EquationFile> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &std::path::Path, file: &EquationFile) -> ProjectResult<()> {
    validate_equation(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<EquationFile> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn save_json(path: &std::path::Path, file: &EquationFile) -> ProjectResult<()> {
    validate_equation(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Parse and validate an equation file held in memory.
pub fn from_yaml_str(content: &str) -> ProjectResult<EquationFile> {
    let file: EquationFile = serde_yaml::from_str(content)?;
    validate_equation(&file)?;
    Ok(file)
}

pub fn from_json_str(content: &str) -> ProjectResult<EquationFile> {
    let file: EquationFile = serde_json::from_str(content)?;
    validate_equation(&file)?;
    Ok(file)
}
