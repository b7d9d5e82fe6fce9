//! TransientModel trait for pluggable dynamic systems.

use nalgebra::DVector;
use ode_core::Tolerances;
use ode_model::StateSpace;

use crate::error::SimResult;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - RHS (right-hand side) computation: x_dot = f(t, x)
/// - Scalar field arithmetic for integration: add states, scale by scalar
/// - A weighted error norm for adaptive step control
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;

    /// RMS of `err_i / (abs + rel * max(|x0_i|, |x1_i|))`.
    fn error_norm(
        &self,
        err: &Self::State,
        x0: &Self::State,
        x1: &Self::State,
        tol: &Tolerances,
    ) -> f64;

    /// True when every component is finite.
    fn is_finite(&self, x: &Self::State) -> bool;
}

impl TransientModel for StateSpace {
    type State = DVector<f64>;

    fn rhs(&self, _t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>> {
        Ok(self.derivative(x))
    }

    fn add(&self, a: &DVector<f64>, b: &DVector<f64>) -> DVector<f64> {
        a + b
    }

    fn scale(&self, a: &DVector<f64>, scale: f64) -> DVector<f64> {
        a * scale
    }

    fn error_norm(
        &self,
        err: &DVector<f64>,
        x0: &DVector<f64>,
        x1: &DVector<f64>,
        tol: &Tolerances,
    ) -> f64 {
        if err.is_empty() {
            return 0.0;
        }
        let sum: f64 = err
            .iter()
            .zip(x0.iter().zip(x1.iter()))
            .map(|(e, (a, b))| {
                let r = e / tol.scale(*a, *b);
                r * r
            })
            .sum();
        (sum / err.len() as f64).sqrt()
    }

    fn is_finite(&self, x: &DVector<f64>) -> bool {
        x.iter().all(|v| v.is_finite())
    }
}
