//! Error types for integration runs.

use ode_core::OdeError;
use thiserror::Error;

/// Errors encountered while integrating a state-space system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Ode(#[from] OdeError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Step limit of {max_steps} reached on interval {interval} at t = {t}")]
    StepLimit {
        interval: usize,
        t: f64,
        max_steps: usize,
    },
}

pub type SimResult<T> = Result<T, SimError>;
