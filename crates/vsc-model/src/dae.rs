//! DAE equations.
//!
//! ```text
//! L   d(id)/dt  = v_conv_d - R id + w L iq - v_pcc_d
//! L   d(iq)/dt  = v_conv_q - R iq - w L id - v_pcc_q
//! Cdc d(Vdc)/dt = Idc
//!
//! P_ac = 1.5 (v_pcc_d id + v_pcc_q iq)
//! Q_ac = 1.5 (v_pcc_q id - v_pcc_d iq)
//! Idc  = P_ac / Vdc
//! ```

use vsc_core::{AlgebraicVector, Inputs, Params, StateVector};

/// dq power-invariance factor (amplitude-invariant transform).
pub const POWER_FACTOR: f64 = 1.5;

/// Active power injected at the PCC for the given dq currents.
pub fn active_power(id: f64, iq: f64, v_pcc_d: f64, v_pcc_q: f64) -> f64 {
    POWER_FACTOR * (v_pcc_d * id + v_pcc_q * iq)
}

/// Reactive power injected at the PCC for the given dq currents.
pub fn reactive_power(id: f64, iq: f64, v_pcc_d: f64, v_pcc_q: f64) -> f64 {
    POWER_FACTOR * (v_pcc_q * id - v_pcc_d * iq)
}

/// Dynamic right-hand side `x_dot = f(x, y)`.
pub fn f_rhs(x: &StateVector, y: &AlgebraicVector, params: &Params, inputs: &Inputs) -> StateVector {
    let l = params.l;
    let r = params.r;
    let omega = params.omega;

    let did_dt = (inputs.v_conv_d - r * x.id + omega * l * x.iq - inputs.v_pcc_d) / l;
    let diq_dt = (inputs.v_conv_q - r * x.iq - omega * l * x.id - inputs.v_pcc_q) / l;
    let dvdc_dt = y.idc / params.cdc;

    StateVector::new(did_dt, diq_dt, dvdc_dt)
}

/// Algebraic residual `g(x, y)`, zero on the constraint manifold.
///
/// `x.vdc` must be non-zero; the division is not guarded.
pub fn g_residual(
    x: &StateVector,
    y: &AlgebraicVector,
    _params: &Params,
    inputs: &Inputs,
) -> AlgebraicVector {
    let p_calc = active_power(x.id, x.iq, inputs.v_pcc_d, inputs.v_pcc_q);
    let q_calc = reactive_power(x.id, x.iq, inputs.v_pcc_d, inputs.v_pcc_q);
    let idc_calc = y.p_ac / x.vdc;

    AlgebraicVector::new(y.idc - idc_calc, y.p_ac - p_calc, y.q_ac - q_calc)
}
