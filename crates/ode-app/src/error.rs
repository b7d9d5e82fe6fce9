//! Error types for the ode-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Equation file error: {0}")]
    Project(String),

    #[error("Unsupported equation file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for ode-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<ode_project::ProjectError> for AppError {
    fn from(err: ode_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<ode_core::OdeError> for AppError {
    fn from(err: ode_core::OdeError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<ode_sim::SimError> for AppError {
    fn from(err: ode_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}
