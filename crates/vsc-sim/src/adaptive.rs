//! Error-controlled time loop using step doubling.

use crate::error::{SimError, SimResult};
use crate::sim::Trajectory;
use crate::state::IntegrableState;
use crate::step::{DaeState, StepOptions, StepResult, run_step};
use crate::timestepper::AdaptiveTimestepper;
use vsc_core::{Params, Scenario};

/// Settings of an adaptive run.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptiveOptions {
    /// Initial step size
    pub dt: f64,
    pub dt_min: f64,
    pub dt_max: f64,
    /// Local error tolerance on the dynamic state (max-norm)
    pub tol: f64,
    /// Budget of step attempts, rejected ones included
    pub max_steps: usize,
}

impl AdaptiveOptions {
    pub fn new(dt: f64, dt_min: f64, dt_max: f64) -> Self {
        Self {
            dt,
            dt_min,
            dt_max,
            tol: 1e-6,
            max_steps: 100_000,
        }
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Pick the step for an attempt at `t` so the run lands exactly on `t_end`
/// without leaving a final sliver shorter than `dt_min`.
fn clip_step(dt: f64, remaining: f64, dt_min: f64, dt_max: f64) -> (f64, bool) {
    if remaining <= dt {
        return (remaining, true);
    }
    if remaining - dt < dt_min {
        if remaining <= dt_max {
            return (remaining, true);
        }
        return ((0.5 * remaining).clamp(dt_min, dt_max), false);
    }
    (dt, false)
}

/// Integrate from `t = 0` to `t_end` with step-doubling error control.
///
/// Each attempt takes one step of `dt` and two of `dt / 2` from the same
/// state; the max-norm of the difference in `x` is the error estimate. The
/// two-half-step result is accepted when the error is within `tol`, or when
/// the controller has already pushed `dt` down to `dt_min`. Rejected attempts
/// retry from the same state with the smaller `dt`.
///
/// Running out of attempts before `t_end` is an error.
pub fn run_simulation_adaptive(
    initial: DaeState,
    scenario: &Scenario,
    params: &Params,
    t_end: f64,
    adaptive: &AdaptiveOptions,
    opts: &StepOptions<'_>,
) -> SimResult<Trajectory> {
    if !t_end.is_finite() || t_end < 0.0 {
        return Err(SimError::InvalidArg {
            what: "t_end must be non-negative",
        });
    }
    if adaptive.tol.is_nan() || adaptive.tol <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "tol must be positive",
        });
    }
    if adaptive.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }
    let mut stepper = AdaptiveTimestepper::new(adaptive.dt, adaptive.dt_min, adaptive.dt_max)?;

    let mut t = 0.0;
    let mut state = initial;
    let mut record = Trajectory::start(t, &state);

    while t < t_end {
        if record.attempts >= adaptive.max_steps {
            return Err(SimError::StepBudgetExhausted {
                max_steps: adaptive.max_steps,
                t_reached: t,
                t_end,
            });
        }
        record.attempts += 1;

        let (dt, last) = clip_step(
            stepper.current_dt(),
            t_end - t,
            stepper.dt_min,
            stepper.dt_max,
        );

        let coarse = run_step(t, dt, &state, scenario, params, opts, None)?;
        let half = 0.5 * dt;
        let fine_1 = run_step(t, half, &state, scenario, params, opts, None)?;
        let fine_2 = run_step(t + half, half, &fine_1.state, scenario, params, opts, None)?;

        let error = coarse.state.x.max_abs_diff(&fine_2.state.x)?;
        stepper.set_dt(dt);
        let next_dt = stepper.update(error, adaptive.tol)?;
        let forced = next_dt <= stepper.dt_min;

        if error <= adaptive.tol || forced {
            tracing::debug!(t, dt, error, next_dt, forced, "adaptive step accepted");
            record.newton_unconverged += count_unconverged(&[&fine_1, &fine_2]);
            t = if last { t_end } else { t + dt };
            state = fine_2.state;
            record.push(t, dt, &state);
        } else {
            tracing::debug!(t, dt, error, next_dt, "adaptive step rejected");
        }
    }

    Ok(record)
}

fn count_unconverged(steps: &[&StepResult]) -> usize {
    steps.iter().filter(|s| !s.newton.converged).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_takes_the_remainder_when_it_fits() {
        assert_eq!(clip_step(0.1, 0.05, 0.01, 0.2), (0.05, true));
        assert_eq!(clip_step(0.1, 0.1, 0.01, 0.2), (0.1, true));
    }

    #[test]
    fn clip_avoids_a_final_sliver() {
        // 0.105 - 0.1 < dt_min: take it all, it is within dt_max
        assert_eq!(clip_step(0.1, 0.105, 0.01, 0.2), (0.105, true));
        // remainder above dt_max: split it
        let (dt, last) = clip_step(0.1, 0.105, 0.01, 0.1);
        assert!(!last);
        assert!((dt - 0.0525).abs() < 1e-15);
    }

    #[test]
    fn clip_keeps_dt_when_plenty_remains() {
        assert_eq!(clip_step(0.1, 1.0, 0.01, 0.2), (0.1, false));
    }
}
