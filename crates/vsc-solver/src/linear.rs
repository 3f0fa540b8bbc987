//! Dense linear solve by Gaussian elimination with partial pivoting.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// Solve `a * x = b`.
///
/// At each column the row with the largest-magnitude entry is swapped into the
/// pivot position. A pivot that is exactly zero after the search is reported
/// as [`SolverError::SingularMatrix`]; near-singular systems are not detected.
/// Inputs are not modified.
pub fn solve_linear(a: &DMatrix<f64>, b: &DVector<f64>) -> SolverResult<DVector<f64>> {
    let n = b.len();
    if a.nrows() != n {
        return Err(SolverError::DimensionMismatch {
            what: "matrix rows",
            expected: n,
            actual: a.nrows(),
        });
    }
    if a.ncols() != n {
        return Err(SolverError::DimensionMismatch {
            what: "matrix columns",
            expected: n,
            actual: a.ncols(),
        });
    }

    let mut m = a.clone();
    let mut rhs = b.clone();

    // Forward elimination
    for k in 0..n {
        let mut pivot_row = k;
        let mut pivot_abs = m[(k, k)].abs();
        for i in (k + 1)..n {
            let v = m[(i, k)].abs();
            if v > pivot_abs {
                pivot_row = i;
                pivot_abs = v;
            }
        }

        if pivot_abs == 0.0 {
            return Err(SolverError::SingularMatrix { column: k });
        }

        if pivot_row != k {
            m.swap_rows(k, pivot_row);
            rhs.swap_rows(k, pivot_row);
        }

        for i in (k + 1)..n {
            let factor = m[(i, k)] / m[(k, k)];
            rhs[i] -= factor * rhs[k];
            for j in k..n {
                m[(i, j)] -= factor * m[(k, j)];
            }
        }
    }

    // Back substitution
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let mut s = rhs[i];
        for j in (i + 1)..n {
            s -= m[(i, j)] * x[j];
        }
        x[i] = s / m[(i, i)];
    }

    Ok(x)
}
