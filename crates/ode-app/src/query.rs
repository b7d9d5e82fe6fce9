//! Query helpers for extracting data from trajectories.

use ode_sim::{SimStats, Trajectory};

use crate::error::{AppError, AppResult};

/// Summary of a run's time range and data.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub order: usize,
    pub final_state: Vec<f64>,
    pub stats: SimStats,
}

/// Get run summary from a trajectory.
pub fn summarize(trajectory: &Trajectory) -> AppResult<RunSummary> {
    let (Some(first), Some(last)) = (trajectory.t.first(), trajectory.t.last()) else {
        return Err(AppError::InvalidInput("No records in run".to_string()));
    };

    Ok(RunSummary {
        time_range: (*first, *last),
        record_count: trajectory.len(),
        order: trajectory.order(),
        final_state: trajectory
            .final_state()
            .map(|x| x.iter().copied().collect())
            .unwrap_or_default(),
        stats: trajectory.stats,
    })
}

/// Extract `(t, value)` pairs for derivative order `k`.
pub fn extract_series(trajectory: &Trajectory, k: usize) -> AppResult<Vec<(f64, f64)>> {
    let values = trajectory.component(k)?;
    Ok(trajectory.t.iter().copied().zip(values).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;
    use ode_sim::SimRecord;

    fn sample() -> Trajectory {
        SimRecord {
            t: vec![1.0, 0.5],
            x: vec![
                DVector::from_vec(vec![1.0, 2.0]),
                DVector::from_vec(vec![3.0, 4.0]),
            ],
            stats: SimStats::default(),
        }
    }

    #[test]
    fn summary_uses_first_and_last_time() {
        let summary = summarize(&sample()).unwrap();
        assert_eq!(summary.time_range, (1.0, 0.5));
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.order, 2);
        assert_eq!(summary.final_state, vec![3.0, 4.0]);
    }

    #[test]
    fn empty_trajectory_has_no_summary() {
        let empty = SimRecord {
            t: vec![],
            x: vec![],
            stats: SimStats::default(),
        };
        assert!(matches!(summarize(&empty), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn series_pairs_time_with_values() {
        let series = extract_series(&sample(), 1).unwrap();
        assert_eq!(series, vec![(1.0, 2.0), (0.5, 4.0)]);
        assert!(matches!(extract_series(&sample(), 2), Err(AppError::Model(_))));
    }
}
