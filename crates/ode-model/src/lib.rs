//! Linear constant-coefficient ODE models and their first-order reduction.
//!
//! A [`LinearOdeModel`] holds coefficient terms `(c_k, k)` read as the
//! leading term balancing the lower-order ones:
//!
//! ```text
//! c_N x^(N) = c_(N-1) x^(N-1) + ... + c_1 x' + c_0 x + c_-1
//! ```
//!
//! and derives the companion-form [`StateSpace`] `x' = A x + b` over the
//! state `[x, x', ..., x^(N-1)]`.

pub mod model;
pub mod state_space;

pub use model::LinearOdeModel;
pub use state_space::{ForcingScale, StateSpace};

pub use ode_core::{CoefficientTerm, OdeError, OdeResult};
