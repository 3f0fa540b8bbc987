//! Error types for solver operations.

use thiserror::Error;
use vsc_core::VscError;

/// Errors that can occur while solving the algebraic subsystem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Singular matrix: zero pivot in column {column}")]
    SingularMatrix { column: usize },

    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid Newton configuration: {what}")]
    InvalidConfig { what: &'static str },

    #[error("Core error: {0}")]
    Core(#[from] VscError),
}

pub type SolverResult<T> = Result<T, SolverError>;
