//! First-order state-space form `x' = A x + b`.

use nalgebra::{DMatrix, DVector};
use ode_core::{OdeError, OdeResult};

/// How the constant term is placed in the last entry of `b`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ForcingScale {
    /// Constant term copied as-is, without dividing by the leading
    /// coefficient. Compatible with existing equation definitions.
    #[default]
    Literal,
    /// Constant term divided by the leading coefficient, like the
    /// lower-order coefficients in the bottom row of `A`.
    Normalized,
}

/// Linear time-invariant system `x' = A x + b`.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSpace {
    a: DMatrix<f64>,
    b: DVector<f64>,
}

impl StateSpace {
    /// Build from an explicit matrix and offset vector.
    ///
    /// `a` must be square and `b` must have one entry per row of `a`.
    pub fn new(a: DMatrix<f64>, b: DVector<f64>) -> OdeResult<Self> {
        if a.nrows() != a.ncols() {
            return Err(OdeError::DimensionMismatch {
                what: "state matrix columns",
                expected: a.nrows(),
                actual: a.ncols(),
            });
        }
        if b.len() != a.nrows() {
            return Err(OdeError::DimensionMismatch {
                what: "forcing vector",
                expected: a.nrows(),
                actual: b.len(),
            });
        }
        if a.nrows() == 0 {
            return Err(OdeError::UnderdeterminedSystem {
                what: "state space has no states",
            });
        }
        Ok(Self { a, b })
    }

    /// Number of states (the equation order).
    pub fn order(&self) -> usize {
        self.b.len()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn into_parts(self) -> (DMatrix<f64>, DVector<f64>) {
        (self.a, self.b)
    }

    /// Evaluate `A x + b`. The caller guarantees `x.len() == self.order()`.
    pub fn derivative(&self, x: &DVector<f64>) -> DVector<f64> {
        &self.a * x + &self.b
    }

    /// Evaluate `A x + b`, checking the state length first.
    pub fn try_derivative(&self, x: &DVector<f64>) -> OdeResult<DVector<f64>> {
        self.check_state(x)?;
        Ok(self.derivative(x))
    }

    /// Reject a state vector whose length differs from the order.
    pub fn check_state(&self, x: &DVector<f64>) -> OdeResult<()> {
        if x.len() != self.order() {
            return Err(OdeError::DimensionMismatch {
                what: "state vector",
                expected: self.order(),
                actual: x.len(),
            });
        }
        Ok(())
    }
}
