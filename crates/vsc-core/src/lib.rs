//! vsc-core: shared foundation for the VSC simulator.
//!
//! Contains:
//! - numeric (Real, finiteness check, residual norms)
//! - vars (dynamic state `x` and algebraic state `y`)
//! - params (electrical constants, controller gains, Newton overrides)
//! - scenario (control mode, PCC voltages, references)
//! - inputs (per-step voltages fed to the DAE)
//! - error (shared error types)

pub mod error;
pub mod inputs;
pub mod numeric;
pub mod params;
pub mod scenario;
pub mod vars;

// Re-exports: nice ergonomics for downstream crates
pub use error::{VscError, VscResult};
pub use inputs::Inputs;
pub use numeric::*;
pub use params::{NewtonOverrides, Params, REQUIRED_PARAM_KEYS, ResidualNorm};
pub use scenario::{ControlMode, Scenario};
pub use vars::{ALGEBRAIC_KEYS, AlgebraicVector, STATE_KEYS, StateVector};
