//! Time integrators.

use ode_core::Tolerances;

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// Trait for fixed-step time integrators.
pub trait Integrator {
    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;

    /// Right-hand side evaluations per step.
    fn rhs_per_step(&self) -> usize;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let k1 = model.rhs(t, x)?;

        let x2 = model.add(x, &model.scale(&k1, 0.5 * dt));
        let k2 = model.rhs(t + 0.5 * dt, &x2)?;

        let x3 = model.add(x, &model.scale(&k2, 0.5 * dt));
        let k3 = model.rhs(t + 0.5 * dt, &x3)?;

        let x4 = model.add(x, &model.scale(&k3, dt));
        let k4 = model.rhs(t + dt, &x4)?;

        // Combine: x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = model.add(
            &model.add(&k1, &model.scale(&k2, 2.0)),
            &model.add(&model.scale(&k3, 2.0), &k4),
        );

        Ok(model.add(x, &model.scale(&k_sum, dt / 6.0)))
    }

    fn rhs_per_step(&self) -> usize {
        4
    }
}

/// Forward Euler (explicit, 1st order).
/// Calls rhs() once per step instead of 4 times (RK4).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let xdot = model.rhs(t, x)?;
        Ok(model.add(x, &model.scale(&xdot, dt)))
    }

    fn rhs_per_step(&self) -> usize {
        1
    }
}

// Dormand-Prince 5(4) tableau
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights, advancing solution
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// 5th minus embedded 4th-order weights
const E1: f64 = B1 - 5179.0 / 57600.0;
const E3: f64 = B3 - 7571.0 / 16695.0;
const E4: f64 = B4 - 393.0 / 640.0;
const E5: f64 = B5 + 92097.0 / 339200.0;
const E6: f64 = B6 - 187.0 / 2100.0;
const E7: f64 = -1.0 / 40.0;

/// Outcome of one adaptive advance across a grid interval.
#[derive(Clone, Debug)]
pub struct AdaptiveStep<S> {
    /// State at the end of the interval
    pub state: S,
    /// Suggested magnitude for the first step of the next interval
    pub next_h: f64,
    pub accepted: usize,
    pub rejected: usize,
    pub rhs_evals: usize,
}

/// Dormand-Prince 5(4) with local extrapolation and step-size control.
#[derive(Clone, Debug)]
pub struct DormandPrince {
    pub tolerances: Tolerances,
    /// Upper bound on step magnitude
    pub max_step: f64,
    /// Step attempts allowed per interval
    pub max_steps: usize,
}

impl DormandPrince {
    /// Integrate from `t` across a signed span `dt`, starting with step
    /// magnitude `h_init` (clamped to the span).
    pub fn advance<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
        h_init: f64,
    ) -> SimResult<AdaptiveStep<M::State>> {
        let span = dt.abs();
        let direction = if dt < 0.0 { -1.0 } else { 1.0 };

        let mut state = x.clone();
        let mut done = 0.0;
        let mut h = h_init.min(self.max_step).min(span);
        let mut accepted = 0;
        let mut rejected = 0;
        let mut rhs_evals = 1;

        let mut k1 = model.rhs(t, &state)?;

        for _ in 0..self.max_steps {
            if span - done <= 0.0 {
                break;
            }
            let last = h >= span - done;
            if last {
                h = span - done;
            }
            let ts = t + direction * done;
            let hs = direction * h;

            let x2 = combine(model, &state, hs, &[(A21, &k1)]);
            let k2 = model.rhs(ts + C2 * hs, &x2)?;
            let x3 = combine(model, &state, hs, &[(A31, &k1), (A32, &k2)]);
            let k3 = model.rhs(ts + C3 * hs, &x3)?;
            let x4 = combine(model, &state, hs, &[(A41, &k1), (A42, &k2), (A43, &k3)]);
            let k4 = model.rhs(ts + C4 * hs, &x4)?;
            let x5 = combine(
                model,
                &state,
                hs,
                &[(A51, &k1), (A52, &k2), (A53, &k3), (A54, &k4)],
            );
            let k5 = model.rhs(ts + C5 * hs, &x5)?;
            let x6 = combine(
                model,
                &state,
                hs,
                &[(A61, &k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
            );
            let k6 = model.rhs(ts + hs, &x6)?;
            let next = combine(
                model,
                &state,
                hs,
                &[(B1, &k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)],
            );
            let k7 = model.rhs(ts + hs, &next)?;
            rhs_evals += 6;

            let err = model.scale(
                &weighted(
                    model,
                    &[(E1, &k1), (E3, &k3), (E4, &k4), (E5, &k5), (E6, &k6), (E7, &k7)],
                ),
                hs,
            );
            let err_norm = model.error_norm(&err, &state, &next, &self.tolerances);

            // Non-finite error estimates cannot be controlled; let them propagate
            if err_norm <= 1.0 || !err_norm.is_finite() {
                accepted += 1;
                done = if last { span } else { done + h };
                state = next;
                k1 = k7;
            } else {
                rejected += 1;
            }

            let factor = if err_norm == 0.0 || !err_norm.is_finite() {
                5.0
            } else {
                (0.9 * err_norm.powf(-0.2)).clamp(0.2, 5.0)
            };
            h = (h * factor).min(self.max_step);
        }

        if span - done > 0.0 {
            return Err(SimError::StepLimit {
                interval: 0,
                t: t + direction * done,
                max_steps: self.max_steps,
            });
        }

        Ok(AdaptiveStep {
            state,
            next_h: h,
            accepted,
            rejected,
            rhs_evals,
        })
    }
}

/// `terms` combined as `sum(c_i * k_i)`.
fn weighted<M: TransientModel>(model: &M, terms: &[(f64, &M::State)]) -> M::State {
    let (c0, k0) = terms[0];
    terms[1..]
        .iter()
        .fold(model.scale(k0, c0), |acc, (c, k)| {
            model.add(&acc, &model.scale(k, *c))
        })
}

/// `x + h * sum(c_i * k_i)`.
fn combine<M: TransientModel>(
    model: &M,
    x: &M::State,
    h: f64,
    terms: &[(f64, &M::State)],
) -> M::State {
    model.add(x, &model.scale(&weighted(model, terms), h))
}
