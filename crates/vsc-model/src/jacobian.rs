//! Analytical Jacobians of the DAE.
//!
//! Rows follow the equation order, columns the variable order:
//! `STATE_KEYS` for `x`, `ALGEBRAIC_KEYS` for `y`.

use crate::dae::POWER_FACTOR;
use nalgebra::Matrix3;
use vsc_core::{AlgebraicVector, Inputs, Params, StateVector};

/// `df/dx`. Constant for the linear filter model.
pub fn df_dx(
    _x: &StateVector,
    _y: &AlgebraicVector,
    params: &Params,
    _inputs: &Inputs,
) -> Matrix3<f64> {
    let r_over_l = params.r / params.l;
    let omega = params.omega;

    Matrix3::new(
        -r_over_l, omega, 0.0, //
        -omega, -r_over_l, 0.0, //
        0.0, 0.0, 0.0,
    )
}

/// `dg/dx`.
pub fn dg_dx(
    x: &StateVector,
    y: &AlgebraicVector,
    _params: &Params,
    inputs: &Inputs,
) -> Matrix3<f64> {
    let vd = inputs.v_pcc_d;
    let vq = inputs.v_pcc_q;

    Matrix3::new(
        0.0, 0.0, y.p_ac / (x.vdc * x.vdc), //
        -POWER_FACTOR * vd, -POWER_FACTOR * vq, 0.0, //
        -POWER_FACTOR * vq, POWER_FACTOR * vd, 0.0,
    )
}

/// `dg/dy`, the Newton matrix of the algebraic solve.
pub fn dg_dy(
    x: &StateVector,
    _y: &AlgebraicVector,
    _params: &Params,
    _inputs: &Inputs,
) -> Matrix3<f64> {
    Matrix3::new(
        1.0, -1.0 / x.vdc, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0,
    )
}
