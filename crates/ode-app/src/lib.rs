//! Application service layer for the linear ODE toolkit.
//!
//! Glues equation files, models and the integrator together: compile a
//! file into a state space, run it, and query or render the trajectory.

pub mod compile;
pub mod error;
pub mod query;
pub mod run_service;

// Re-export key types for convenience
pub use compile::{CompiledEquation, compile_equation, sim_options, time_grid};
pub use error::{AppError, AppResult};
pub use query::{RunSummary, extract_series, summarize};
pub use run_service::{
    RunResponse, RunTimingSummary, load_equation, render_run, run_equation, run_file,
};
