//! Time grids at which trajectories are reported.

use ode_core::MAX_GRID_POINTS;

use crate::error::{SimError, SimResult};

/// Ordered time points. Consecutive points may decrease or repeat.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeGrid(Vec<f64>);

impl TimeGrid {
    pub fn from_points(points: impl Into<Vec<f64>>) -> Self {
        Self(points.into())
    }

    /// `count` evenly spaced points from `start` to `end` inclusive.
    ///
    /// A single point yields `[start]`; zero points yield an empty grid.
    /// At most [`MAX_GRID_POINTS`] points are generated.
    pub fn linspace(start: f64, end: f64, count: usize) -> SimResult<Self> {
        if count > MAX_GRID_POINTS {
            return Err(SimError::InvalidArg {
                what: "grid point count exceeds MAX_GRID_POINTS",
            });
        }
        Ok(match count {
            0 => Self(Vec::new()),
            1 => Self(vec![start]),
            _ => {
                let step = (end - start) / (count - 1) as f64;
                let mut points: Vec<f64> =
                    (0..count).map(|i| start + step * i as f64).collect();
                points[count - 1] = end;
                Self(points)
            }
        })
    }

    /// Points `start, start + step, ...` strictly before `stop`.
    ///
    /// `step` may be negative for a descending grid; it must be finite and
    /// non-zero, and the grid may hold at most [`MAX_GRID_POINTS`] points.
    pub fn arange(start: f64, stop: f64, step: f64) -> SimResult<Self> {
        if !step.is_finite() || step == 0.0 {
            return Err(SimError::InvalidArg {
                what: "grid step must be finite and non-zero",
            });
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(SimError::InvalidArg {
                what: "grid bounds must be finite",
            });
        }
        let count = ((stop - start) / step).ceil().max(0.0);
        if !count.is_finite() || count > MAX_GRID_POINTS as f64 {
            return Err(SimError::InvalidArg {
                what: "grid point count exceeds MAX_GRID_POINTS",
            });
        }
        let count = count as usize;
        Ok(Self((0..count).map(|i| start + step * i as f64).collect()))
    }

    pub fn points(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_points(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for TimeGrid {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
