//! Equation file validation logic.

use ode_core::MAX_GRID_POINTS;

use crate::schema::{EquationFile, GridDef, IntegratorDef};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_equation(file: &EquationFile) -> Result<(), ValidationError> {
    if file.version == 0 || file.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    for (idx, term) in file.terms.iter().enumerate() {
        if !term.magnitude().is_finite() {
            return Err(invalid(
                format!("terms[{idx}].magnitude"),
                term.magnitude(),
                "must be finite",
            ));
        }
    }

    let order = file.order().ok_or_else(|| ValidationError::Unsupported {
        feature: format!("equation '{}' without derivative terms", file.name),
        reason: "at least one term of degree >= 1 is required".to_string(),
    })?;
    if order == 0 {
        return Err(ValidationError::Unsupported {
            feature: format!("equation '{}' of order 0", file.name),
            reason: "algebraic equations have no state to integrate".to_string(),
        });
    }

    if let Some(initial) = &file.initial {
        if initial.len() != order {
            return Err(invalid(
                "initial".to_string(),
                format!("{initial:?}"),
                &format!("expected {order} values for an order-{order} equation"),
            ));
        }
        if let Some(value) = initial.iter().find(|v| !v.is_finite()) {
            return Err(invalid("initial".to_string(), value, "must be finite"));
        }
    }

    validate_grid(&file.grid)?;

    if let Some(integrator) = &file.integrator {
        validate_integrator(integrator)?;
    }

    for (idx, &k) in file.outputs.iter().enumerate() {
        if k >= order {
            return Err(invalid(
                format!("outputs[{idx}]"),
                k,
                &format!("derivative order must be below {order}"),
            ));
        }
    }

    Ok(())
}

fn validate_grid(grid: &GridDef) -> Result<(), ValidationError> {
    match grid {
        GridDef::Points { points } => {
            if points.is_empty() {
                return Err(invalid("grid.points".to_string(), "[]", "needs at least one point"));
            }
            if let Some(t) = points.iter().find(|t| !t.is_finite()) {
                return Err(invalid("grid.points".to_string(), t, "must be finite"));
            }
        }
        GridDef::Linspace { start, end, count } => {
            if *count == 0 {
                return Err(invalid("grid.count".to_string(), count, "must be positive"));
            }
            if *count > MAX_GRID_POINTS {
                return Err(invalid(
                    "grid.count".to_string(),
                    count,
                    &format!("at most {MAX_GRID_POINTS} points"),
                ));
            }
            finite("grid.start", *start)?;
            finite("grid.end", *end)?;
        }
        GridDef::Arange { start, stop, step } => {
            finite("grid.start", *start)?;
            finite("grid.stop", *stop)?;
            if !step.is_finite() || *step == 0.0 {
                return Err(invalid("grid.step".to_string(), step, "must be finite and non-zero"));
            }
            let count = ((stop - start) / step).ceil();
            if count <= 0.0 {
                return Err(invalid(
                    "grid.step".to_string(),
                    step,
                    "does not move from start towards stop",
                ));
            }
            if !count.is_finite() || count > MAX_GRID_POINTS as f64 {
                return Err(invalid(
                    "grid.step".to_string(),
                    step,
                    &format!("grid would exceed {MAX_GRID_POINTS} points"),
                ));
            }
        }
    }
    Ok(())
}

fn validate_integrator(def: &IntegratorDef) -> Result<(), ValidationError> {
    for (field, value) in [
        ("integrator.max_step", def.max_step),
        ("integrator.rtol", def.rtol),
        ("integrator.atol", def.atol),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(invalid(field.to_string(), v, "must be finite and positive"));
            }
        }
    }
    if def.max_steps == Some(0) {
        return Err(invalid(
            "integrator.max_steps".to_string(),
            0,
            "must be positive",
        ));
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field.to_string(), value, "must be finite"))
    }
}

fn invalid(field: String, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
