//! Coefficient terms of a linear constant-coefficient ODE.
//!
//! A term pairs a real magnitude with the derivative degree it multiplies:
//!
//! ```text
//! degree -1 : constant (forcing) term
//! degree  0 : x
//! degree  1 : dx/dt
//! degree  k : k-th derivative
//! ```
//!
//! Newton's second law with mass `m` is written with the acceleration term
//! `CoefficientTerm::derivative(-m, 2)`.

use crate::{OdeError, OdeResult};

/// Degree marking the constant (forcing) term.
pub const CONSTANT_DEGREE: i32 = -1;

/// A single (magnitude, derivative-degree) pair.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TermRepr", into = "TermRepr"))]
pub struct CoefficientTerm {
    magnitude: f64,
    degree: i32,
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct TermRepr {
    magnitude: f64,
    degree: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<TermRepr> for CoefficientTerm {
    type Error = OdeError;

    fn try_from(repr: TermRepr) -> OdeResult<Self> {
        Self::new(repr.magnitude, repr.degree)
    }
}

#[cfg(feature = "serde")]
impl From<CoefficientTerm> for TermRepr {
    fn from(term: CoefficientTerm) -> Self {
        Self {
            magnitude: term.magnitude,
            degree: term.degree,
        }
    }
}

impl CoefficientTerm {
    /// Create a term, rejecting degrees below the constant marker.
    pub fn new(magnitude: f64, degree: i32) -> OdeResult<Self> {
        if degree < CONSTANT_DEGREE {
            return Err(OdeError::InvalidDegree { degree });
        }
        Ok(Self { magnitude, degree })
    }

    /// Constant (forcing) term.
    pub fn constant(magnitude: f64) -> Self {
        Self {
            magnitude,
            degree: CONSTANT_DEGREE,
        }
    }

    /// Term multiplying the `order`-th derivative (0 is the function itself).
    pub fn derivative(magnitude: f64, order: u16) -> Self {
        Self {
            magnitude,
            degree: i32::from(order),
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn degree(&self) -> i32 {
        self.degree
    }

    pub fn is_constant(&self) -> bool {
        self.degree == CONSTANT_DEGREE
    }

    /// Slot of this term in a coefficient table indexed by `degree + 1`.
    pub fn slot(&self) -> usize {
        // degree >= -1 is upheld by every constructor, deserialization included
        (self.degree + 1) as usize
    }
}

/// Display label for a derivative order: `x`, `x'`, `x''`, ...
pub fn derivative_label(order: usize) -> String {
    format!("x{}", "'".repeat(order))
}
