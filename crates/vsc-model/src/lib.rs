//! RMS dq-frame DAE model of a voltage-source converter.
//!
//! - `f(x, y)`: dynamic right-hand side (AC filter currents, DC link voltage)
//! - `g(x, y)`: algebraic residual (AC powers, DC current)
//! - analytical Jacobians `df/dx`, `dg/dx`, `dg/dy`
//!
//! Saturation is never differentiated and the converter voltages are held
//! constant inside the algebraic solve, so none of the Jacobians depend on them.

pub mod dae;
pub mod jacobian;

pub use dae::{POWER_FACTOR, active_power, f_rhs, g_residual, reactive_power};
pub use jacobian::{df_dx, dg_dx, dg_dy};
