//! Explicit fixed-step integrators for the dynamic state.

use crate::error::{SimError, SimResult};
use crate::state::IntegrableState;
use std::fmt;
use std::str::FromStr;
use vsc_core::StateVector;

/// Trait for explicit one-step integrators.
///
/// `f` maps a state to its derivative. Anything else the derivative needs
/// (algebraic variables, parameters, inputs) is captured by the closure.
pub trait Integrator {
    /// Advance `x` by `dt`.
    fn step<S, F>(&self, f: &mut F, x: &S, dt: f64) -> SimResult<S>
    where
        S: IntegrableState,
        F: FnMut(&S) -> SimResult<S>;
}

/// RK1: `x + dt * f(x)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rk1;

impl Integrator for Rk1 {
    fn step<S, F>(&self, f: &mut F, x: &S, dt: f64) -> SimResult<S>
    where
        S: IntegrableState,
        F: FnMut(&S) -> SimResult<S>,
    {
        let k1 = f(x)?;
        tracing::debug!(method = "rk1", dt, k1_norm = k1.max_abs(), "rk step");
        x.add_scaled(&k1, dt)
    }
}

/// RK2, explicit midpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rk2;

impl Integrator for Rk2 {
    fn step<S, F>(&self, f: &mut F, x: &S, dt: f64) -> SimResult<S>
    where
        S: IntegrableState,
        F: FnMut(&S) -> SimResult<S>,
    {
        let k1 = f(x)?;
        let mid = x.add_scaled(&k1, 0.5 * dt)?;
        let k2 = f(&mid)?;
        tracing::debug!(
            method = "rk2",
            dt,
            k1_norm = k1.max_abs(),
            k2_norm = k2.max_abs(),
            "rk step"
        );
        x.add_scaled(&k2, dt)
    }
}

/// Classical RK4.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rk4;

impl Integrator for Rk4 {
    fn step<S, F>(&self, f: &mut F, x: &S, dt: f64) -> SimResult<S>
    where
        S: IntegrableState,
        F: FnMut(&S) -> SimResult<S>,
    {
        let k1 = f(x)?;
        let x2 = x.add_scaled(&k1, 0.5 * dt)?;
        let k2 = f(&x2)?;
        let x3 = x.add_scaled(&k2, 0.5 * dt)?;
        let k3 = f(&x3)?;
        let x4 = x.add_scaled(&k3, dt)?;
        let k4 = f(&x4)?;
        tracing::debug!(
            method = "rk4",
            dt,
            k1_norm = k1.max_abs(),
            k2_norm = k2.max_abs(),
            k3_norm = k3.max_abs(),
            k4_norm = k4.max_abs(),
            "rk step"
        );

        // x + dt/6 * (k1 + 2 k2 + 2 k3 + k4)
        let sixth = dt / 6.0;
        x.add_scaled(&k1, sixth)?
            .add_scaled(&k2, 2.0 * sixth)?
            .add_scaled(&k3, 2.0 * sixth)?
            .add_scaled(&k4, sixth)
    }
}

/// Forward Euler on a precomputed derivative.
pub fn step_forward(x: &StateVector, x_dot: &StateVector, dt: f64) -> StateVector {
    StateVector::new(
        x.id + dt * x_dot.id,
        x.iq + dt * x_dot.iq,
        x.vdc + dt * x_dot.vdc,
    )
}

/// Integrator selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// Forward Euler (default).
    #[default]
    Euler,
    Rk1,
    Rk2,
    Rk4,
}

impl IntegratorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegratorKind::Euler => "euler",
            IntegratorKind::Rk1 => "rk1",
            IntegratorKind::Rk2 => "rk2",
            IntegratorKind::Rk4 => "rk4",
        }
    }

    /// Formal order of accuracy.
    pub fn order(&self) -> u32 {
        match self {
            IntegratorKind::Euler | IntegratorKind::Rk1 => 1,
            IntegratorKind::Rk2 => 2,
            IntegratorKind::Rk4 => 4,
        }
    }
}

impl Integrator for IntegratorKind {
    fn step<S, F>(&self, f: &mut F, x: &S, dt: f64) -> SimResult<S>
    where
        S: IntegrableState,
        F: FnMut(&S) -> SimResult<S>,
    {
        match self {
            IntegratorKind::Euler | IntegratorKind::Rk1 => Rk1.step(f, x, dt),
            IntegratorKind::Rk2 => Rk2.step(f, x, dt),
            IntegratorKind::Rk4 => Rk4.step(f, x, dt),
        }
    }
}

impl FromStr for IntegratorKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(IntegratorKind::Euler),
            "rk1" => Ok(IntegratorKind::Rk1),
            "rk2" => Ok(IntegratorKind::Rk2),
            "rk4" => Ok(IntegratorKind::Rk4),
            _ => Err(SimError::UnknownIntegrator {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NamedState;

    const A: f64 = -5.0;

    fn decay(x: &f64) -> SimResult<f64> {
        Ok(A * x)
    }

    #[test]
    fn order_of_accuracy_on_linear_decay() {
        let dt = 0.1;
        let exact = (A * dt).exp();

        let e1 = (Rk1.step(&mut decay, &1.0, dt).unwrap() - exact).abs();
        let e2 = (Rk2.step(&mut decay, &1.0, dt).unwrap() - exact).abs();
        let e4 = (Rk4.step(&mut decay, &1.0, dt).unwrap() - exact).abs();

        assert!(e4 <= e2, "rk4 {e4} > rk2 {e2}");
        assert!(e2 <= e1, "rk2 {e2} > rk1 {e1}");
    }

    #[test]
    fn rk1_matches_step_forward() {
        let x = StateVector::new(0.3, -0.7, 1.1);
        let mut f = |s: &StateVector| -> SimResult<StateVector> {
            Ok(StateVector::new(-2.0 * s.id, s.id - s.iq, 0.25))
        };
        let x_dot = f(&x).unwrap();

        let generic = Rk1.step(&mut f, &x, 0.01).unwrap();
        let dedicated = step_forward(&x, &x_dot, 0.01);
        for (a, b) in generic.to_array().iter().zip(dedicated.to_array()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn euler_and_rk1_are_the_same_scheme() {
        let a = IntegratorKind::Euler.step(&mut decay, &2.0, 0.05).unwrap();
        let b = IntegratorKind::Rk1.step(&mut decay, &2.0, 0.05).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rk4_calls_rhs_four_times() {
        let mut calls = 0;
        let mut f = |x: &f64| -> SimResult<f64> {
            calls += 1;
            Ok(*x)
        };
        Rk4.step(&mut f, &1.0, 0.1).unwrap();
        assert_eq!(calls, 4);
    }

    #[test]
    fn missing_derivative_is_reported() {
        let x: NamedState = [("id", 0.0), ("iq", 0.0)].into_iter().collect();
        let mut f = |_: &NamedState| -> SimResult<NamedState> {
            Ok([("id", 1.0)].into_iter().collect())
        };
        for kind in [IntegratorKind::Rk1, IntegratorKind::Rk2, IntegratorKind::Rk4] {
            let err = kind.step(&mut f, &x, 0.1).unwrap_err();
            assert_eq!(
                err,
                SimError::MissingDerivative {
                    key: "iq".to_string()
                }
            );
        }
    }

    #[test]
    fn parses_integrator_names() {
        assert_eq!("euler".parse::<IntegratorKind>().unwrap(), IntegratorKind::Euler);
        assert_eq!("RK4".parse::<IntegratorKind>().unwrap(), IntegratorKind::Rk4);
        assert!(matches!(
            "rk3".parse::<IntegratorKind>(),
            Err(SimError::UnknownIntegrator { .. })
        ));
        assert_eq!(IntegratorKind::Rk2.to_string(), "rk2");
    }
}
