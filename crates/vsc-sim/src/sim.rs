//! Fixed-step simulation runner and trajectory recording.

use crate::error::{SimError, SimResult};
use crate::step::{DaeState, StepOptions, run_step};
use serde::{Deserialize, Serialize};
use vsc_core::{AlgebraicVector, Params, Scenario, StateVector};

/// State of the system at one recorded instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub t: f64,
    pub x: StateVector,
    pub y: AlgebraicVector,
}

/// Record of a simulation run, one snapshot per accepted step plus the
/// initial state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub snapshots: Vec<Snapshot>,
    /// Step size taken to reach each snapshot after the first
    pub dt_history: Vec<f64>,
    /// Steps whose Newton solve ran out of iterations
    pub newton_unconverged: usize,
    /// Step attempts, including rejected adaptive trials
    pub attempts: usize,
}

impl Trajectory {
    pub fn start(t: f64, state: &DaeState) -> Self {
        Self {
            snapshots: vec![Snapshot {
                t,
                x: state.x,
                y: state.y,
            }],
            ..Self::default()
        }
    }

    pub fn push(&mut self, t: f64, dt: f64, state: &DaeState) {
        self.snapshots.push(Snapshot {
            t,
            x: state.x,
            y: state.y,
        });
        self.dt_history.push(dt);
    }

    pub fn times(&self) -> Vec<f64> {
        self.snapshots.iter().map(|s| s.t).collect()
    }

    pub fn x_history(&self) -> Vec<StateVector> {
        self.snapshots.iter().map(|s| s.x).collect()
    }

    pub fn y_history(&self) -> Vec<AlgebraicVector> {
        self.snapshots.iter().map(|s| s.y).collect()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Run `floor(t_end / dt)` steps of size `dt` from `t = 0`.
///
/// The last recorded time is `n_steps * dt`, which can fall short of `t_end`
/// when `t_end` is not a multiple of `dt`. `t_end == 0` returns only the
/// initial snapshot.
pub fn run_simulation(
    initial: DaeState,
    scenario: &Scenario,
    params: &Params,
    t_end: f64,
    dt: f64,
    opts: &StepOptions<'_>,
) -> SimResult<Trajectory> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "dt must be positive",
        });
    }
    if !t_end.is_finite() || t_end < 0.0 {
        return Err(SimError::InvalidArg {
            what: "t_end must be non-negative",
        });
    }

    let mut t = 0.0;
    let mut state = initial;
    let mut record = Trajectory::start(t, &state);

    let n_steps = (t_end / dt).floor() as usize;
    for _ in 0..n_steps {
        let out = run_step(t, dt, &state, scenario, params, opts, None)?;
        record.attempts += 1;
        if !out.newton.converged {
            record.newton_unconverged += 1;
            tracing::debug!(
                t,
                iterations = out.newton.iterations,
                residual_norm = out.newton.residual_norm,
                "newton did not converge"
            );
        }
        state = out.state;
        t += dt;
        record.push(t, dt, &state);
    }

    Ok(record)
}
