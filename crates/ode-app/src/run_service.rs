//! Run execution service.

use std::path::Path;
use std::time::Instant;

use ode_project::EquationFile;
use ode_sim::{Series, Trajectory, TrajectoryRenderer, integrate, render_selected};
use tracing::info;

use crate::compile::compile_equation;
use crate::error::{AppError, AppResult};
use crate::query::{RunSummary, summarize};

/// Wall-clock timing of a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub solve_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub name: String,
    pub trajectory: Trajectory,
    /// Derivative orders selected for output
    pub outputs: Vec<usize>,
    pub series: Vec<Series>,
    pub summary: RunSummary,
    pub timing: RunTimingSummary,
}

/// Compile and integrate an equation file.
pub fn run_equation(file: &EquationFile) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    let compiled = compile_equation(file)?;
    timing.compile_time_s = started.elapsed().as_secs_f64();

    let solve_started = Instant::now();
    let trajectory = integrate(
        &compiled.state_space,
        &compiled.initial,
        compiled.grid.points(),
        &compiled.options,
    )?;
    timing.solve_time_s = solve_started.elapsed().as_secs_f64();

    let series = trajectory.select(&compiled.outputs)?;
    let summary = summarize(&trajectory)?;
    timing.total_time_s = started.elapsed().as_secs_f64();

    info!(
        name = %compiled.name,
        records = summary.record_count,
        steps = trajectory.stats.steps,
        total_time_s = timing.total_time_s,
        "run finished"
    );

    Ok(RunResponse {
        name: compiled.name,
        trajectory,
        outputs: compiled.outputs,
        series,
        summary,
        timing,
    })
}

/// Load an equation file (`.yaml`, `.yml` or `.json`) and run it.
pub fn run_file(path: &Path) -> AppResult<RunResponse> {
    let file = load_equation(path)?;
    run_equation(&file)
}

/// Load an equation file, choosing the format from the extension.
pub fn load_equation(path: &Path) -> AppResult<EquationFile> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let file = match extension.as_deref() {
        Some("yaml" | "yml") => ode_project::load_yaml(path)?,
        Some("json") => ode_project::load_json(path)?,
        _ => {
            return Err(AppError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    Ok(file)
}

/// Hand a finished run to a renderer, restricted to its selected outputs.
pub fn render_run<R: TrajectoryRenderer>(
    response: &RunResponse,
    renderer: &mut R,
) -> Result<(), R::Error> {
    render_selected(renderer, &response.trajectory, &response.outputs)
}
