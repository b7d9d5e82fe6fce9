//! Integrated trajectories and per-derivative series.

use nalgebra::DVector;
use ode_core::{OdeError, OdeResult, derivative_label};

use crate::sim::SimRecord;

/// States of a linear system, one per requested time point.
///
/// Component `k` of each state is the `k`-th derivative of the unknown.
pub type Trajectory = SimRecord<DVector<f64>>;

/// One derivative order sampled over the trajectory's time points.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub order: usize,
    /// `x`, `x'`, `x''`, ...
    pub label: String,
    pub values: Vec<f64>,
}

impl SimRecord<DVector<f64>> {
    /// Number of state components (the equation order).
    pub fn order(&self) -> usize {
        self.x.first().map_or(0, |x| x.len())
    }

    pub fn times(&self) -> &[f64] {
        &self.t
    }

    pub fn states(&self) -> &[DVector<f64>] {
        &self.x
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn state(&self, index: usize) -> OdeResult<&DVector<f64>> {
        self.x.get(index).ok_or(OdeError::IndexOutOfBounds {
            what: "trajectory record",
            index,
            len: self.x.len(),
        })
    }

    pub fn final_state(&self) -> Option<&DVector<f64>> {
        self.x.last()
    }

    /// Values of derivative order `k` over time.
    pub fn component(&self, k: usize) -> OdeResult<Vec<f64>> {
        self.check_order(k)?;
        Ok(self.x.iter().map(|x| x[k]).collect())
    }

    /// Labelled series for each requested derivative order, in request order.
    pub fn select(&self, orders: &[usize]) -> OdeResult<Vec<Series>> {
        orders
            .iter()
            .map(|&k| {
                Ok(Series {
                    order: k,
                    label: derivative_label(k),
                    values: self.component(k)?,
                })
            })
            .collect()
    }

    pub(crate) fn check_order(&self, k: usize) -> OdeResult<()> {
        let order = self.order();
        if k >= order {
            return Err(OdeError::IndexOutOfBounds {
                what: "derivative order",
                index: k,
                len: order,
            });
        }
        Ok(())
    }
}
