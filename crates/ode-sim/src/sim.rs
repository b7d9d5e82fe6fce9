//! Simulation runner and result recording.

use nalgebra::DVector;
use ode_core::{OdeError, Tolerances, ensure_finite};
use ode_model::{LinearOdeModel, StateSpace};
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};
use crate::integrator::{DormandPrince, ForwardEuler, Integrator, RK4};
use crate::model::TransientModel;
use crate::trajectory::Trajectory;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, 4 rhs calls per step).
    #[default]
    RK4,
    /// Forward Euler (1st-order, 1 rhs call per step).
    ForwardEuler,
    /// Adaptive Dormand-Prince 5(4), controlled by `SimOptions::tolerances`.
    DormandPrince,
}

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
    /// Largest internal step. `None` takes one fixed step per grid interval
    /// and leaves the adaptive scheme unbounded.
    pub max_step: Option<f64>,
    /// Error control for the adaptive scheme
    pub tolerances: Tolerances,
    /// Maximum number of internal steps per grid interval (safety limit)
    pub max_steps: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            integrator: IntegratorType::default(),
            max_step: None,
            tolerances: Tolerances::default(),
            max_steps: 100_000,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if let Some(h) = self.max_step {
            if !h.is_finite() || h <= 0.0 {
                return Err(SimError::InvalidArg {
                    what: "max_step must be finite and positive",
                });
            }
        }
        self.tolerances.validate()?;
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }
}

/// Work counters accumulated over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Accepted internal steps
    pub steps: usize,
    /// Rejected adaptive steps
    pub rejected_steps: usize,
    /// Right-hand side evaluations
    pub rhs_evals: usize,
}

/// Record of simulation results, one state per requested time point.
#[derive(Clone, Debug, PartialEq)]
pub struct SimRecord<S> {
    /// Time points (as requested)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<S>,
    pub stats: SimStats,
}

/// Integrate `model` from `x0` and report the state at every point of
/// `times`.
///
/// The first record is `x0` itself. Intervals may be negative (integrated
/// backward) or zero (state carried over unchanged). Non-finite states are
/// propagated rather than reported as errors.
pub fn run_sim<M: TransientModel>(
    model: &M,
    x0: &M::State,
    times: &[f64],
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    if times.is_empty() {
        return Err(OdeError::EmptyTimeGrid.into());
    }
    for &t in times {
        ensure_finite(t, "time point")?;
    }
    opts.validate()?;

    debug!(
        points = times.len(),
        integrator = ?opts.integrator,
        max_step = ?opts.max_step,
        "starting integration"
    );

    let mut stats = SimStats::default();
    let mut x = x0.clone();
    let mut x_record = Vec::with_capacity(times.len());
    x_record.push(x.clone());

    let adaptive = DormandPrince {
        tolerances: opts.tolerances,
        max_step: opts.max_step.unwrap_or(f64::INFINITY),
        max_steps: opts.max_steps,
    };
    let mut h_next = f64::INFINITY;
    let mut warned = false;

    for (interval, window) in times.windows(2).enumerate() {
        let (t, dt) = (window[0], window[1] - window[0]);
        if dt != 0.0 {
            x = match opts.integrator {
                IntegratorType::RK4 => {
                    fixed_interval(&RK4, model, t, &x, dt, interval, opts, &mut stats)?
                }
                IntegratorType::ForwardEuler => fixed_interval(
                    &ForwardEuler,
                    model,
                    t,
                    &x,
                    dt,
                    interval,
                    opts,
                    &mut stats,
                )?,
                IntegratorType::DormandPrince => {
                    let out = adaptive
                        .advance(model, t, &x, dt, h_next)
                        .map_err(|err| match err {
                            SimError::StepLimit { t, max_steps, .. } => SimError::StepLimit {
                                interval,
                                t,
                                max_steps,
                            },
                            other => other,
                        })?;
                    stats.steps += out.accepted;
                    stats.rejected_steps += out.rejected;
                    stats.rhs_evals += out.rhs_evals;
                    h_next = out.next_h;
                    out.state
                }
            };
        }

        if !warned && !model.is_finite(&x) {
            warn!(
                interval,
                t = window[1],
                "state became non-finite; values are propagated as-is"
            );
            warned = true;
        }
        x_record.push(x.clone());
    }

    debug!(
        steps = stats.steps,
        rejected = stats.rejected_steps,
        rhs_evals = stats.rhs_evals,
        "integration finished"
    );

    Ok(SimRecord {
        t: times.to_vec(),
        x: x_record,
        stats,
    })
}

/// Cover one grid interval with equal fixed steps no longer than `max_step`.
#[allow(clippy::too_many_arguments)]
fn fixed_interval<I: Integrator, M: TransientModel>(
    integrator: &I,
    model: &M,
    t: f64,
    x: &M::State,
    dt: f64,
    interval: usize,
    opts: &SimOptions,
    stats: &mut SimStats,
) -> SimResult<M::State> {
    let substeps = match opts.max_step {
        Some(h) => (dt.abs() / h).ceil().max(1.0),
        None => 1.0,
    };
    if substeps > opts.max_steps as f64 {
        return Err(SimError::StepLimit {
            interval,
            t,
            max_steps: opts.max_steps,
        });
    }
    let substeps = substeps as usize;
    let h = dt / substeps as f64;

    let mut state = x.clone();
    for j in 0..substeps {
        state = integrator.step(model, t + h * j as f64, &state, h)?;
    }
    stats.steps += substeps;
    stats.rhs_evals += substeps * integrator.rhs_per_step();
    Ok(state)
}

/// Integrate a state space from `x0` over `times`.
pub fn integrate(
    state_space: &StateSpace,
    x0: &DVector<f64>,
    times: &[f64],
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    state_space.check_state(x0)?;
    run_sim(state_space, x0, times, opts)
}

/// Build the state space of `model` and integrate it from its stored
/// initial condition.
pub fn simulate(
    model: &LinearOdeModel,
    times: &[f64],
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    let state_space = model.build_state_space()?;
    let x0 = model.initial_condition().ok_or(SimError::InvalidArg {
        what: "model has no initial condition",
    })?;
    integrate(&state_space, x0, times, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;
    use ode_core::CoefficientTerm;

    use crate::grid::TimeGrid;

    fn decay() -> StateSpace {
        StateSpace::new(DMatrix::from_element(1, 1, -1.0), DVector::zeros(1)).unwrap()
    }

    fn x0() -> DVector<f64> {
        DVector::from_element(1, 1.0)
    }

    fn final_error(opts: &SimOptions) -> f64 {
        let rec = integrate(&decay(), &x0(), &[0.0, 1.0], opts).unwrap();
        (rec.x[1][0] - (-1.0_f64).exp()).abs()
    }

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.integrator, IntegratorType::RK4);
        assert_eq!(opts.max_step, None);
        assert_eq!(opts.max_steps, 100_000);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn sim_options_invalid() {
        let bad_step = SimOptions {
            max_step: Some(0.0),
            ..SimOptions::default()
        };
        assert!(matches!(bad_step.validate(), Err(SimError::InvalidArg { .. })));

        let bad_limit = SimOptions {
            max_steps: 0,
            ..SimOptions::default()
        };
        assert!(matches!(bad_limit.validate(), Err(SimError::InvalidArg { .. })));

        let bad_tol = SimOptions {
            tolerances: Tolerances {
                abs: -1.0,
                rel: 1e-6,
            },
            ..SimOptions::default()
        };
        assert!(matches!(
            bad_tol.validate(),
            Err(SimError::Ode(OdeError::InvalidArg { .. }))
        ));
    }

    #[test]
    fn single_point_returns_initial_state() {
        let x = DVector::from_element(1, 0.123);
        let rec = integrate(&decay(), &x, &[5.0], &SimOptions::default()).unwrap();
        assert_eq!(rec.t, vec![5.0]);
        assert_eq!(rec.x, vec![x]);
        assert_eq!(rec.stats, SimStats::default());
    }

    #[test]
    fn empty_grid_is_rejected() {
        let err = integrate(&decay(), &x0(), &[], &SimOptions::default()).unwrap_err();
        assert_eq!(err, SimError::Ode(OdeError::EmptyTimeGrid));
    }

    #[test]
    fn wrong_state_length_is_rejected() {
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let err = integrate(&decay(), &x, &[0.0, 1.0], &SimOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SimError::Ode(OdeError::DimensionMismatch {
                expected: 1,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn non_finite_time_is_rejected() {
        let err = integrate(&decay(), &x0(), &[0.0, f64::NAN], &SimOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::Ode(OdeError::NonFinite {
                what: "time point",
                ..
            })
        ));
    }

    #[test]
    fn repeated_time_keeps_state() {
        let rec = integrate(&decay(), &x0(), &[0.0, 0.5, 0.5], &SimOptions::default()).unwrap();
        assert_eq!(rec.x[1], rec.x[2]);
        assert_eq!(rec.stats.steps, 1);
    }

    #[test]
    fn backward_interval_grows_decay() {
        let opts = SimOptions {
            max_step: Some(0.01),
            ..SimOptions::default()
        };
        let rec = integrate(&decay(), &x0(), &[0.0, -1.0], &opts).unwrap();
        assert!((rec.x[1][0] - 1.0_f64.exp()).abs() < 1e-9);
    }

    #[test]
    fn substeps_follow_max_step() {
        let opts = SimOptions {
            max_step: Some(0.3),
            ..SimOptions::default()
        };
        let rec = integrate(&decay(), &x0(), &[0.0, 1.0], &opts).unwrap();
        assert_eq!(rec.stats.steps, 4);
        assert_eq!(rec.stats.rhs_evals, 16);
    }

    #[test]
    fn fixed_step_limit() {
        let opts = SimOptions {
            max_step: Some(0.1),
            max_steps: 5,
            ..SimOptions::default()
        };
        let err = integrate(&decay(), &x0(), &[0.0, 0.2, 1.2], &opts).unwrap_err();
        assert!(matches!(
            err,
            SimError::StepLimit {
                interval: 1,
                max_steps: 5,
                ..
            }
        ));
    }

    #[test]
    fn rk4_is_fourth_order() {
        let coarse = final_error(&SimOptions {
            max_step: Some(0.1),
            ..SimOptions::default()
        });
        let fine = final_error(&SimOptions {
            max_step: Some(0.05),
            ..SimOptions::default()
        });
        let ratio = coarse / fine;
        assert!(ratio > 14.0 && ratio < 18.0, "ratio = {ratio}");
    }

    #[test]
    fn euler_is_first_order() {
        let coarse = final_error(&SimOptions {
            integrator: IntegratorType::ForwardEuler,
            max_step: Some(0.01),
            ..SimOptions::default()
        });
        let fine = final_error(&SimOptions {
            integrator: IntegratorType::ForwardEuler,
            max_step: Some(0.005),
            ..SimOptions::default()
        });
        let ratio = coarse / fine;
        assert!(ratio > 1.9 && ratio < 2.1, "ratio = {ratio}");
    }

    #[test]
    fn dormand_prince_tracks_exponential() {
        let opts = SimOptions {
            integrator: IntegratorType::DormandPrince,
            tolerances: Tolerances {
                abs: 1e-10,
                rel: 1e-10,
            },
            ..SimOptions::default()
        };
        let grid = TimeGrid::linspace(0.0, 3.0, 7).unwrap();
        let rec = integrate(&decay(), &x0(), grid.points(), &opts).unwrap();
        for (t, x) in rec.t.iter().zip(&rec.x) {
            assert!((x[0] - (-t).exp()).abs() < 1e-8, "t = {t}");
        }
        assert!(rec.stats.steps >= 6);
    }

    #[test]
    fn overflow_is_propagated() {
        let ss = StateSpace::new(DMatrix::from_element(1, 1, 1e300), DVector::zeros(1)).unwrap();
        let x = DVector::from_element(1, 1e300);
        let rec = integrate(&ss, &x, &[0.0, 1.0, 2.0], &SimOptions::default()).unwrap();
        assert!(!rec.x[2][0].is_finite());
    }

    #[test]
    fn simulate_requires_initial_condition() {
        let mut model = LinearOdeModel::new([
            CoefficientTerm::derivative(1.0, 1),
            CoefficientTerm::derivative(-1.0, 0),
        ]);
        let err = simulate(&model, &[0.0, 1.0], &SimOptions::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidArg { .. }));

        model.set_initial_condition(&[2.0]).unwrap();
        let rec = simulate(&model, &[0.0, 1.0], &SimOptions::default()).unwrap();
        assert_eq!(rec.x[0][0], 2.0);
    }

    #[test]
    fn simulate_surfaces_model_errors() {
        let model = LinearOdeModel::new([CoefficientTerm::constant(1.0)]);
        let err = simulate(&model, &[0.0], &SimOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SimError::Ode(OdeError::UnderdeterminedSystem { .. })
        ));
    }
}
