//! ode-core: shared foundation for the linear ODE toolkit.
//!
//! Contains:
//! - term (coefficient/derivative-degree pairs)
//! - numeric (tolerances + float helpers)
//! - error (shared error taxonomy)

pub mod error;
pub mod numeric;
pub mod term;

pub use error::{OdeError, OdeResult};
pub use numeric::*;
pub use term::{CONSTANT_DEGREE, CoefficientTerm, derivative_label};
