//! Newton solve of the converter's algebraic subsystem.

use crate::error::SolverResult;
use crate::newton::{NewtonConfig, NewtonObserver, newton_solve};
use nalgebra::{DMatrix, DVector};
use vsc_core::{AlgebraicVector, Inputs, Params, StateVector};
use vsc_model::{dg_dy, g_residual};

/// Outcome of one algebraic solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlgebraicSolution {
    pub y: AlgebraicVector,
    pub residual_norm: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Solve `g(x, y) = 0` for `y` from the guess `y0`.
///
/// `x` and `inputs` (including the saturated converter voltages) are frozen
/// for the whole iteration; only `dg/dy` is used.
pub fn solve_algebraic(
    x: &StateVector,
    y0: &AlgebraicVector,
    params: &Params,
    inputs: &Inputs,
    config: &NewtonConfig,
    observer: Option<NewtonObserver<'_>>,
) -> SolverResult<AlgebraicSolution> {
    let residual = |y: &DVector<f64>| -> SolverResult<DVector<f64>> {
        let y = to_algebraic(y);
        let g = g_residual(x, &y, params, inputs);
        Ok(DVector::from_row_slice(&g.to_array()))
    };
    let jacobian = |y: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
        let j = dg_dy(x, &to_algebraic(y), params, inputs);
        Ok(DMatrix::from_column_slice(3, 3, j.as_slice()))
    };

    let y0 = DVector::from_row_slice(&y0.to_array());
    let result = newton_solve(y0, residual, jacobian, config, observer)?;

    Ok(AlgebraicSolution {
        y: to_algebraic(&result.y),
        residual_norm: result.residual_norm,
        iterations: result.iterations,
        converged: result.converged,
    })
}

fn to_algebraic(y: &DVector<f64>) -> AlgebraicVector {
    AlgebraicVector::new(y[0], y[1], y[2])
}
