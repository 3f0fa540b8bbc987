//! Algebraic solver for the VSC DAE.
//!
//! This crate resolves the algebraic subsystem `g(x, y) = 0` for `y` with the
//! dynamic state `x` held fixed. The Newton iteration is generic over dense
//! nalgebra vectors; [`solve_algebraic`] binds it to the converter model.

pub mod algebraic;
pub mod error;
pub mod linear;
pub mod newton;

pub use algebraic::{AlgebraicSolution, solve_algebraic};
pub use error::{SolverError, SolverResult};
pub use linear::solve_linear;
pub use newton::{
    DEFAULT_MAX_ITER, DEFAULT_TOL, NewtonConfig, NewtonIteration, NewtonObserver, NewtonResult,
    newton_solve,
};
