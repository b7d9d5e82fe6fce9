//! Time integration of state-space ODE systems.
//!
//! Provides:
//! - `TransientModel` trait for pluggable right-hand sides
//! - Fixed-step RK4 and forward Euler, adaptive Dormand-Prince 5(4)
//! - Time grids and a runner producing one state per grid point
//! - Trajectory inspection and the renderer seam

pub mod error;
pub mod grid;
pub mod integrator;
pub mod model;
pub mod render;
pub mod sim;
pub mod trajectory;

pub use error::{SimError, SimResult};
pub use grid::TimeGrid;
pub use integrator::{AdaptiveStep, DormandPrince, ForwardEuler, Integrator, RK4};
pub use model::TransientModel;
pub use render::{SeriesCollector, TrajectoryRenderer, render_selected};
pub use sim::{IntegratorType, SimOptions, SimRecord, SimStats, integrate, run_sim, simulate};
pub use trajectory::{Series, Trajectory};
