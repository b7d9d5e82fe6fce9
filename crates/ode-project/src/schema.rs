//! Equation file schema definitions.

use ode_core::CoefficientTerm;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquationFile {
    pub version: u32,
    pub name: String,
    pub terms: Vec<CoefficientTerm>,
    /// `[x, x', ..., x^(N-1)]` at the first grid point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<Vec<f64>>,
    pub grid: GridDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrator: Option<IntegratorDef>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub forcing: ForcingDef,
    /// Derivative orders to report; empty means all of them
    #[serde(default)]
    pub outputs: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum GridDef {
    Points { points: Vec<f64> },
    Linspace { start: f64, end: f64, count: usize },
    Arange { start: f64, stop: f64, step: f64 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IntegratorDef {
    #[serde(default)]
    pub method: MethodDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MethodDef {
    #[default]
    Rk4,
    ForwardEuler,
    DormandPrince,
}

/// Placement of the constant term in the forcing vector.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ForcingDef {
    #[default]
    Literal,
    Normalized,
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

impl EquationFile {
    /// Highest non-constant degree among the terms.
    pub fn order(&self) -> Option<usize> {
        self.terms
            .iter()
            .filter_map(|term| usize::try_from(term.degree()).ok())
            .max()
    }
}
