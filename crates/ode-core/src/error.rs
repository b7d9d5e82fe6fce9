use thiserror::Error;

pub type OdeResult<T> = Result<T, OdeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OdeError {
    #[error("Dimension mismatch for {what}: expected {expected} elements, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Leading coefficient of degree {degree} sums to zero")]
    SingularLeadingCoefficient { degree: usize },

    #[error("Underdetermined system: {what}")]
    UnderdeterminedSystem { what: &'static str },

    #[error("Time grid has no points")]
    EmptyTimeGrid,

    #[error("Invalid derivative degree {degree} (must be >= -1)")]
    InvalidDegree { degree: i32 },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
