//! Error types for simulation operations.

use thiserror::Error;
use vsc_core::VscError;
use vsc_solver::SolverError;

/// Errors encountered while stepping or driving a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Missing derivative for state variable '{key}'")]
    MissingDerivative { key: String },

    #[error("State variable '{key}' missing from compared state")]
    StateMismatch { key: String },

    #[error("Step budget of {max_steps} attempts exhausted at t = {t_reached} (t_end = {t_end})")]
    StepBudgetExhausted {
        max_steps: usize,
        t_reached: f64,
        t_end: f64,
    },

    #[error("Unknown integrator '{name}' (expected euler, rk1, rk2 or rk4)")]
    UnknownIntegrator { name: String },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Core error: {0}")]
    Core(#[from] VscError),
}

pub type SimResult<T> = Result<T, SimError>;
