//! Renderer seam for trajectories.
//!
//! No drawing backend lives here; callers inject one.

use ode_core::OdeError;

use crate::trajectory::{Series, Trajectory};

/// Consumer of a trajectory, typically a plotting backend.
pub trait TrajectoryRenderer {
    type Error: From<OdeError>;

    /// Draw the requested derivative orders against time.
    ///
    /// Implementations may assume every order is below `trajectory.order()`
    /// when invoked through [`render_selected`].
    fn render(&mut self, trajectory: &Trajectory, orders: &[usize]) -> Result<(), Self::Error>;
}

/// Check the requested orders, then hand the trajectory to `renderer`.
pub fn render_selected<R: TrajectoryRenderer>(
    renderer: &mut R,
    trajectory: &Trajectory,
    orders: &[usize],
) -> Result<(), R::Error> {
    for &k in orders {
        trajectory.check_order(k)?;
    }
    renderer.render(trajectory, orders)
}

/// Renderer that keeps the selected series in memory.
#[derive(Clone, Debug, Default)]
pub struct SeriesCollector {
    pub times: Vec<f64>,
    pub series: Vec<Series>,
}

impl TrajectoryRenderer for SeriesCollector {
    type Error = OdeError;

    fn render(&mut self, trajectory: &Trajectory, orders: &[usize]) -> Result<(), OdeError> {
        self.series = trajectory.select(orders)?;
        self.times = trajectory.times().to_vec();
        Ok(())
    }
}
