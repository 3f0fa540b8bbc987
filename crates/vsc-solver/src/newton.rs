//! Newton-Raphson iteration on a dense residual.

use crate::error::{SolverError, SolverResult};
use crate::linear::solve_linear;
use nalgebra::{DMatrix, DVector};
use vsc_core::{NewtonOverrides, ResidualNorm};

/// Default iteration budget.
pub const DEFAULT_MAX_ITER: usize = 20;
/// Default residual tolerance.
pub const DEFAULT_TOL: f64 = 1e-8;

/// Newton solver configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iter: usize,
    /// Converged when the residual norm is at or below this value
    pub tol: f64,
    /// Norm applied to the residual vector
    pub norm: ResidualNorm,
    /// Emit a debug event per iteration
    pub verbose: bool,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            norm: ResidualNorm::Max,
            verbose: false,
        }
    }
}

impl NewtonConfig {
    /// Merge configuration sources.
    ///
    /// Explicit overrides win over the ones carried in the parameter set,
    /// which win over the defaults. `verbose` is set if either source sets it.
    pub fn resolve(
        params_overrides: &NewtonOverrides,
        explicit: &NewtonOverrides,
    ) -> SolverResult<Self> {
        let defaults = Self::default();
        let config = Self {
            max_iter: explicit
                .max_iter
                .or(params_overrides.max_iter)
                .unwrap_or(defaults.max_iter),
            tol: explicit.tol.or(params_overrides.tol).unwrap_or(defaults.tol),
            norm: explicit
                .norm
                .or(params_overrides.norm)
                .unwrap_or(defaults.norm),
            verbose: explicit.verbose || params_overrides.verbose,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SolverResult<()> {
        if !self.tol.is_finite() || self.tol < 0.0 {
            return Err(SolverError::InvalidConfig {
                what: "tol must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Diagnostic snapshot handed to the observer before each convergence test.
#[derive(Debug)]
pub struct NewtonIteration<'a> {
    pub iteration: usize,
    pub residual_norm: f64,
    pub y: &'a DVector<f64>,
}

/// Per-iteration observer. Read-only; it cannot influence the iteration.
pub type NewtonObserver<'o> = &'o mut dyn FnMut(&NewtonIteration<'_>);

/// Newton iteration result.
#[derive(Clone, Debug, PartialEq)]
pub struct NewtonResult {
    /// Last iterate
    pub y: DVector<f64>,
    /// Residual norm at `y`
    pub residual_norm: f64,
    /// Updates applied; equals `max_iter` when the budget ran out
    pub iterations: usize,
    /// Residual norm at or below `tol`
    pub converged: bool,
}

/// Solve `residual(y) = 0` starting from `y0`.
///
/// Running out of iterations is not an error: the last iterate is returned
/// with `converged == false` and `iterations == max_iter`. A singular Jacobian
/// aborts the solve.
pub fn newton_solve<F, J>(
    y0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
    mut observer: Option<NewtonObserver<'_>>,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<DMatrix<f64>>,
{
    let n = y0.len();
    let mut y = y0;

    for iter in 0..config.max_iter {
        let r = residual_fn(&y)?;
        check_residual(&r, n)?;
        let r_norm = config.norm.eval(r.as_slice());

        if let Some(obs) = observer.as_mut() {
            obs(&NewtonIteration {
                iteration: iter,
                residual_norm: r_norm,
                y: &y,
            });
        }
        if config.verbose {
            tracing::debug!(
                iteration = iter,
                residual_norm = r_norm,
                y = ?y.as_slice(),
                "newton iteration"
            );
        }

        if r_norm <= config.tol {
            return Ok(NewtonResult {
                y,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = jacobian_fn(&y)?;
        if jac.nrows() != n || jac.ncols() != n {
            return Err(SolverError::DimensionMismatch {
                what: "jacobian",
                expected: n,
                actual: if jac.nrows() != n {
                    jac.nrows()
                } else {
                    jac.ncols()
                },
            });
        }

        let dy = solve_linear(&jac, &(-r))?;
        y += dy;
    }

    let r = residual_fn(&y)?;
    check_residual(&r, n)?;
    let r_norm = config.norm.eval(r.as_slice());

    Ok(NewtonResult {
        y,
        residual_norm: r_norm,
        iterations: config.max_iter,
        converged: r_norm <= config.tol,
    })
}

fn check_residual(r: &DVector<f64>, n: usize) -> SolverResult<()> {
    if r.len() != n {
        return Err(SolverError::DimensionMismatch {
            what: "residual",
            expected: n,
            actual: r.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqrt2_residual(y: &DVector<f64>) -> SolverResult<DVector<f64>> {
        Ok(DVector::from_element(1, y[0] * y[0] - 2.0))
    }

    fn sqrt2_jacobian(y: &DVector<f64>) -> SolverResult<DMatrix<f64>> {
        Ok(DMatrix::from_element(1, 1, 2.0 * y[0]))
    }

    #[test]
    fn scalar_square_root() {
        let y0 = DVector::from_element(1, 1.0);
        let config = NewtonConfig::default();
        let result = newton_solve(y0, sqrt2_residual, sqrt2_jacobian, &config, None).unwrap();

        assert!(result.converged);
        assert!((result.y[0] - 2.0_f64.sqrt()).abs() < 1e-6);
        assert!(result.iterations > 0 && result.iterations < DEFAULT_MAX_ITER);
    }

    #[test]
    fn exhausted_budget_is_not_an_error() {
        let y0 = DVector::from_element(1, 10.0);
        let config = NewtonConfig {
            max_iter: 2,
            ..NewtonConfig::default()
        };
        let result = newton_solve(y0, sqrt2_residual, sqrt2_jacobian, &config, None).unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 2);
        assert!(result.residual_norm > config.tol);
    }

    #[test]
    fn zero_budget_returns_initial_guess() {
        let y0 = DVector::from_element(1, 3.0);
        let config = NewtonConfig {
            max_iter: 0,
            ..NewtonConfig::default()
        };
        let result = newton_solve(y0, sqrt2_residual, sqrt2_jacobian, &config, None).unwrap();
        assert_eq!(result.y[0], 3.0);
        assert_eq!(result.iterations, 0);
        assert!(!result.converged);
    }

    #[test]
    fn singular_jacobian_propagates() {
        let y0 = DVector::from_element(1, 0.0);
        let err = newton_solve(
            y0,
            sqrt2_residual,
            sqrt2_jacobian,
            &NewtonConfig::default(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, SolverError::SingularMatrix { column: 0 });
    }

    #[test]
    fn observer_sees_every_check_without_changing_result() {
        let config = NewtonConfig::default();
        let plain = newton_solve(
            DVector::from_element(1, 1.0),
            sqrt2_residual,
            sqrt2_jacobian,
            &config,
            None,
        )
        .unwrap();

        let mut seen = Vec::new();
        let mut record = |it: &NewtonIteration<'_>| seen.push((it.iteration, it.residual_norm));
        let observed = newton_solve(
            DVector::from_element(1, 1.0),
            sqrt2_residual,
            sqrt2_jacobian,
            &config,
            Some(&mut record),
        )
        .unwrap();

        assert_eq!(plain, observed);
        assert_eq!(seen.len(), observed.iterations + 1);
        assert_eq!(seen[0], (0, 1.0));
        assert!(seen.last().unwrap().1 <= config.tol);
    }

    #[test]
    fn residual_size_is_checked() {
        let bad = |_: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(DVector::zeros(2)) };
        let err = newton_solve(
            DVector::zeros(3),
            bad,
            |_| Ok(DMatrix::identity(3, 3)),
            &NewtonConfig::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SolverError::DimensionMismatch {
                what: "residual",
                ..
            }
        ));
    }

    #[test]
    fn resolve_precedence() {
        let from_params = NewtonOverrides {
            tol: Some(1e-6),
            max_iter: Some(50),
            norm: None,
            verbose: true,
        };
        let explicit = NewtonOverrides {
            tol: Some(1e-10),
            max_iter: None,
            norm: Some(ResidualNorm::L2),
            verbose: false,
        };
        let config = NewtonConfig::resolve(&from_params, &explicit).unwrap();
        assert_eq!(config.tol, 1e-10);
        assert_eq!(config.max_iter, 50);
        assert_eq!(config.norm, ResidualNorm::L2);
        assert!(config.verbose);

        let config =
            NewtonConfig::resolve(&NewtonOverrides::default(), &NewtonOverrides::default()).unwrap();
        assert_eq!(config, NewtonConfig::default());
    }

    #[test]
    fn resolve_rejects_negative_tolerance() {
        let explicit = NewtonOverrides {
            tol: Some(-1.0),
            ..NewtonOverrides::default()
        };
        assert!(NewtonConfig::resolve(&NewtonOverrides::default(), &explicit).is_err());
    }
}
