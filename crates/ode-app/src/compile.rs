//! Turn a validated equation file into runnable parts.

use nalgebra::DVector;
use ode_model::{ForcingScale, LinearOdeModel, StateSpace};
use ode_project::{EquationFile, ForcingDef, GridDef, IntegratorDef, MethodDef};
use ode_sim::{IntegratorType, SimOptions, TimeGrid};
use tracing::debug;

use crate::error::AppResult;

/// Everything needed to integrate one equation file.
#[derive(Debug, Clone)]
pub struct CompiledEquation {
    pub name: String,
    pub model: LinearOdeModel,
    pub state_space: StateSpace,
    /// Initial state; all zeros when the file gives none
    pub initial: DVector<f64>,
    pub grid: TimeGrid,
    pub options: SimOptions,
    /// Derivative orders to report
    pub outputs: Vec<usize>,
}

pub fn compile_equation(file: &EquationFile) -> AppResult<CompiledEquation> {
    ode_project::validate_equation(file).map_err(ode_project::ProjectError::from)?;

    let mut model = LinearOdeModel::new(file.terms.iter().copied());
    if let Some(initial) = &file.initial {
        model.set_initial_condition(initial)?;
    }

    let state_space = model.build_state_space_with(forcing_scale(file.forcing))?;
    let initial = model
        .initial_condition()
        .cloned()
        .unwrap_or_else(|| DVector::zeros(state_space.order()));

    let grid = time_grid(&file.grid)?;
    let options = sim_options(file.integrator.as_ref());
    let outputs = if file.outputs.is_empty() {
        (0..state_space.order()).collect()
    } else {
        file.outputs.clone()
    };

    debug!(
        name = %file.name,
        order = state_space.order(),
        points = grid.len(),
        "compiled equation"
    );

    Ok(CompiledEquation {
        name: file.name.clone(),
        model,
        state_space,
        initial,
        grid,
        options,
        outputs,
    })
}

fn forcing_scale(def: ForcingDef) -> ForcingScale {
    match def {
        ForcingDef::Literal => ForcingScale::Literal,
        ForcingDef::Normalized => ForcingScale::Normalized,
    }
}

pub fn time_grid(def: &GridDef) -> AppResult<TimeGrid> {
    Ok(match def {
        GridDef::Points { points } => TimeGrid::from_points(points.clone()),
        GridDef::Linspace { start, end, count } => TimeGrid::linspace(*start, *end, *count)?,
        GridDef::Arange { start, stop, step } => TimeGrid::arange(*start, *stop, *step)?,
    })
}

pub fn sim_options(def: Option<&IntegratorDef>) -> SimOptions {
    let mut options = SimOptions::default();
    let Some(def) = def else {
        return options;
    };

    options.integrator = match def.method {
        MethodDef::Rk4 => IntegratorType::RK4,
        MethodDef::ForwardEuler => IntegratorType::ForwardEuler,
        MethodDef::DormandPrince => IntegratorType::DormandPrince,
    };
    options.max_step = def.max_step;
    if let Some(rtol) = def.rtol {
        options.tolerances.rel = rtol;
    }
    if let Some(atol) = def.atol {
        options.tolerances.abs = atol;
    }
    if let Some(max_steps) = def.max_steps {
        options.max_steps = max_steps;
    }
    options
}
