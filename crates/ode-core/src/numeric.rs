use crate::OdeError;

/// Largest number of points a generated time grid may hold
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// Absolute and relative tolerance pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-6,
        }
    }
}

impl Tolerances {
    /// Error scale for one component: `abs + rel * max(|a|, |b|)`.
    pub fn scale(&self, a: f64, b: f64) -> f64 {
        self.abs + self.rel * a.abs().max(b.abs())
    }

    pub fn validate(&self) -> Result<(), OdeError> {
        if !self.abs.is_finite() || self.abs <= 0.0 {
            return Err(OdeError::InvalidArg {
                what: "absolute tolerance must be finite and positive",
            });
        }
        if !self.rel.is_finite() || self.rel <= 0.0 {
            return Err(OdeError::InvalidArg {
                what: "relative tolerance must be finite and positive",
            });
        }
        Ok(())
    }
}

pub fn nearly_equal(a: f64, b: f64, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, OdeError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(OdeError::NonFinite { what, value: v })
    }
}
