//! One simulation step: control chain, algebraic solve, integration.

use crate::error::SimResult;
use crate::integrator::{Integrator, IntegratorKind, step_forward};
use vsc_controls::{
    ControllerState, CurrentReferenceSource, ScenarioReferences, apply_voltage_saturation,
    compute_converter_voltage_references,
};
use vsc_core::{AlgebraicVector, Inputs, Params, Scenario, StateVector};
use vsc_model::f_rhs;
use vsc_solver::{NewtonConfig, NewtonObserver, solve_algebraic};

/// Everything threaded from one step to the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DaeState {
    pub x: StateVector,
    pub y: AlgebraicVector,
    pub controller: Option<ControllerState>,
}

impl DaeState {
    pub fn new(x: StateVector, y: AlgebraicVector) -> Self {
        Self {
            x,
            y,
            controller: None,
        }
    }
}

/// Newton outcome of a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonSummary {
    pub iterations: usize,
    pub residual_norm: f64,
    pub converged: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    pub state: DaeState,
    pub newton: NewtonSummary,
}

/// Per-step configuration shared by every step of a run.
#[derive(Clone, Copy)]
pub struct StepOptions<'a> {
    pub integrator: IntegratorKind,
    pub newton: &'a NewtonConfig,
    /// Outer control loop (stage 1).
    pub references: &'a dyn CurrentReferenceSource,
}

impl<'a> StepOptions<'a> {
    /// Scenario-driven references with the given integrator and Newton settings.
    pub fn new(integrator: IntegratorKind, newton: &'a NewtonConfig) -> Self {
        Self {
            integrator,
            newton,
            references: &ScenarioReferences,
        }
    }

    pub fn with_references(mut self, references: &'a dyn CurrentReferenceSource) -> Self {
        self.references = references;
        self
    }
}

/// Scenario limits on the post-step state. Currently the identity.
pub fn apply_scenario_limits(
    x: StateVector,
    y: AlgebraicVector,
    _scenario: &Scenario,
) -> (StateVector, AlgebraicVector) {
    (x, y)
}

/// Advance `(x, y)` from `t` to `t + dt`.
///
/// Stages run in a fixed order:
///
/// 1. current references from the outer loop
/// 2. converter voltage references from the inner loop
/// 3. voltage saturation at `V_max`
/// 4. DAE inputs from the saturated voltages and the scenario PCC voltage
/// 5. Newton solve of `g(x, y) = 0` with `x` fixed, warm-started at `y`
/// 6. `x_dot = f(x, y_next)`
/// 7. integration of `x`; `y_next` and the inputs stay frozen across stages
/// 8. scenario limits
///
/// A singular Newton matrix aborts the step. Newton running out of
/// iterations does not; check [`StepResult::newton`].
pub fn run_step(
    t: f64,
    dt: f64,
    state: &DaeState,
    scenario: &Scenario,
    params: &Params,
    opts: &StepOptions<'_>,
    observer: Option<NewtonObserver<'_>>,
) -> SimResult<StepResult> {
    let x = &state.x;

    let refs = opts
        .references
        .current_references(t, x, &state.y, scenario, params);

    let (v_ref, controller) = compute_converter_voltage_references(
        refs.id_ref,
        refs.iq_ref,
        x,
        params,
        state.controller.as_ref(),
    );

    let (v_conv_d, v_conv_q) =
        apply_voltage_saturation(v_ref.v_conv_d_ref, v_ref.v_conv_q_ref, params.v_max);

    let inputs = Inputs::from_scenario(scenario, v_conv_d, v_conv_q);

    let sol = solve_algebraic(x, &state.y, params, &inputs, opts.newton, observer)?;
    let y_next = sol.y;

    let x_dot = f_rhs(x, &y_next, params, &inputs);

    let x_next = match opts.integrator {
        IntegratorKind::Euler => step_forward(x, &x_dot, dt),
        kind => {
            let mut rhs = |xs: &StateVector| -> SimResult<StateVector> {
                Ok(f_rhs(xs, &y_next, params, &inputs))
            };
            kind.step(&mut rhs, x, dt)?
        }
    };

    let (x_next, y_next) = apply_scenario_limits(x_next, y_next, scenario);

    Ok(StepResult {
        state: DaeState {
            x: x_next,
            y: y_next,
            controller,
        },
        newton: NewtonSummary {
            iterations: sol.iterations,
            residual_norm: sol.residual_norm,
            converged: sol.converged,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsc_controls::CurrentReferences;

    #[test]
    fn idle_converter_holds_currents_and_dc_voltage() {
        let params = Params::new(0.1, 0.01, 1.0, 1.0, 1.2, 0.0, 0.0);
        let scenario = Scenario::pq(0.0, 0.0, 0.0, 0.0);
        let state = DaeState::new(StateVector::new(0.0, 0.0, 1.0), AlgebraicVector::default());
        let newton = NewtonConfig::default();
        let opts = StepOptions::new(IntegratorKind::Euler, &newton);

        let out = run_step(0.0, 1e-3, &state, &scenario, &params, &opts, None).unwrap();
        assert_eq!(out.state.x.id, 0.0);
        assert_eq!(out.state.x.iq, 0.0);
        // Vdc moves only through Idc, which is zero here.
        let expected_vdc = 1.0 + 1e-3 * out.state.y.idc / params.cdc;
        assert!((out.state.x.vdc - expected_vdc).abs() < 1e-15);
        assert_eq!(out.state.y.idc, 0.0);
        assert!(out.newton.converged);
    }

    #[test]
    fn step_is_deterministic_and_leaves_input_untouched() {
        let params = Params::new(0.05, 0.01, 0.5, 1.0, 1.2, 2.0, 2.0);
        let scenario = Scenario::pq(1.0, 0.2, 1.0, 0.0);
        let state = DaeState::new(StateVector::new(0.1, 0.0, 1.0), AlgebraicVector::default());
        let before = state.clone();
        let newton = NewtonConfig::default();
        let opts = StepOptions::new(IntegratorKind::Rk4, &newton);

        let a = run_step(0.0, 1e-3, &state, &scenario, &params, &opts, None).unwrap();
        let b = run_step(0.0, 1e-3, &state, &scenario, &params, &opts, None).unwrap();
        assert_eq!(a, b);
        assert_eq!(state, before);
    }

    #[test]
    fn custom_reference_source_drives_inner_loop() {
        let params = Params::new(0.1, 0.0, 1.0, 0.0, 10.0, 1.0, 1.0);
        let scenario = Scenario::pq(0.0, 0.0, 0.0, 0.0);
        let state = DaeState::new(StateVector::new(0.0, 0.0, 1.0), AlgebraicVector::default());
        let newton = NewtonConfig::default();
        let fixed = |_: f64,
                     _: &StateVector,
                     _: &AlgebraicVector,
                     _: &Scenario,
                     _: &Params| CurrentReferences {
            id_ref: 1.0,
            iq_ref: 0.0,
        };
        let opts = StepOptions::new(IntegratorKind::Euler, &newton).with_references(&fixed);

        let out = run_step(0.0, 0.1, &state, &scenario, &params, &opts, None).unwrap();
        // v_conv_d = Kp_id * 1.0 = 1.0, did/dt = 1.0 / L = 10.0
        assert!((out.state.x.id - 1.0).abs() < 1e-12);
    }

    #[test]
    fn controller_state_is_carried_forward() {
        let params = Params::new(0.1, 0.01, 1.0, 1.0, 1.2, 1.0, 1.0);
        let scenario = Scenario::vdc_q(0.0, 0.0, 1.0, 0.0);
        let mut cs = ControllerState::new();
        cs.insert("integral_d", 0.5);
        let state = DaeState {
            x: StateVector::new(0.0, 0.0, 1.0),
            y: AlgebraicVector::default(),
            controller: Some(cs.clone()),
        };
        let newton = NewtonConfig::default();
        let opts = StepOptions::new(IntegratorKind::Euler, &newton);
        let out = run_step(0.0, 1e-3, &state, &scenario, &params, &opts, None).unwrap();
        assert_eq!(out.state.controller, Some(cs));
    }
}
