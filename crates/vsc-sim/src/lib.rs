//! Time-domain simulation of the VSC DAE.
//!
//! Provides:
//! - explicit integrators (Euler/RK1, RK2 midpoint, RK4) over any [`IntegrableState`]
//! - [`run_step`], one step of control, algebraic solve and integration
//! - fixed-step and step-doubling adaptive drivers producing a [`Trajectory`]
//! - [`AdaptiveTimestepper`], the step-size controller used by the adaptive driver

pub mod adaptive;
pub mod error;
pub mod integrator;
pub mod sim;
pub mod state;
pub mod step;
pub mod timestepper;

pub use adaptive::{AdaptiveOptions, run_simulation_adaptive};
pub use error::{SimError, SimResult};
pub use integrator::{Integrator, IntegratorKind, Rk1, Rk2, Rk4, step_forward};
pub use sim::{Snapshot, Trajectory, run_simulation};
pub use state::{IntegrableState, NamedState};
pub use step::{
    DaeState, NewtonSummary, StepOptions, StepResult, apply_scenario_limits, run_step,
};
pub use timestepper::AdaptiveTimestepper;
