//! Simulation execution and persistence service.

use std::path::Path;
use std::time::Instant;

use vsc_core::{NewtonOverrides, Params};
use vsc_project::{
    Document, ScenarioConfig, load_params, load_scenario, params_from_map, scenario_from_map,
};
use vsc_results::{
    ColumnarResults, ResultRow, RunInputs, RunManifest, RunStore, RunType,
    columnar_from_trajectory, compute_run_id, rows_from_trajectory, timestamp_now,
};
use vsc_sim::{AdaptiveOptions, DaeState, IntegratorKind, StepOptions, Trajectory};
use vsc_solver::NewtonConfig;

use crate::error::AppResult;

pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed or adaptive stepping.
#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    Fixed { dt: f64 },
    Adaptive(AdaptiveOptions),
}

impl RunMode {
    /// Adaptive stepping from `dt`, bounded by `[dt / 1000, dt]`.
    pub fn adaptive_from_dt(dt: f64) -> Self {
        RunMode::Adaptive(AdaptiveOptions::new(dt, dt * 1e-3, dt))
    }

    pub fn initial_dt(&self) -> f64 {
        match self {
            RunMode::Fixed { dt } => *dt,
            RunMode::Adaptive(opts) => opts.dt,
        }
    }
}

/// What to run, independent of the model inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub t_end: f64,
    pub mode: RunMode,
    pub integrator: IntegratorKind,
    /// Explicit Newton settings; these win over `nr_*` parameter keys.
    pub newton: NewtonOverrides,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self::fixed(1.0, 1e-3)
    }
}

impl SimulationRequest {
    pub fn fixed(t_end: f64, dt: f64) -> Self {
        Self {
            t_end,
            mode: RunMode::Fixed { dt },
            integrator: IntegratorKind::default(),
            newton: NewtonOverrides::default(),
        }
    }

    pub fn adaptive(t_end: f64, options: AdaptiveOptions) -> Self {
        Self {
            mode: RunMode::Adaptive(options),
            ..Self::fixed(t_end, 0.0)
        }
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_newton(mut self, newton: NewtonOverrides) -> Self {
        self.newton = newton;
        self
    }

    fn run_type(&self) -> RunType {
        match &self.mode {
            RunMode::Fixed { dt } => RunType::Fixed {
                dt: *dt,
                t_end: self.t_end,
            },
            RunMode::Adaptive(a) => RunType::Adaptive {
                dt: a.dt,
                dt_min: a.dt_min,
                dt_max: a.dt_max,
                tol: a.tol,
                t_end: self.t_end,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResponse {
    pub trajectory: Trajectory,
    pub integrator: IntegratorKind,
    pub run_type: RunType,
    pub elapsed_s: f64,
}

impl SimulationResponse {
    pub fn rows(&self) -> Vec<ResultRow> {
        rows_from_trajectory(&self.trajectory)
    }

    pub fn columnar(&self) -> ColumnarResults {
        columnar_from_trajectory(&self.trajectory)
    }
}

/// Run one simulation from validated inputs.
///
/// Newton steps that run out of iterations do not fail the run; they are
/// counted in the trajectory and reported with a warning.
pub fn run_simulation(
    params: &Params,
    scenario: &ScenarioConfig,
    request: &SimulationRequest,
) -> AppResult<SimulationResponse> {
    let newton = NewtonConfig::resolve(&params.newton, &request.newton)?;
    let opts = StepOptions::new(request.integrator, &newton);
    let ic = &scenario.initial_conditions;
    let initial = DaeState::new(ic.x0, ic.y0);

    tracing::info!(
        control_mode = scenario.scenario.mode.name(),
        integrator = %request.integrator,
        t_end = request.t_end,
        dt = request.mode.initial_dt(),
        adaptive = matches!(request.mode, RunMode::Adaptive(_)),
        "simulation started"
    );
    let start = Instant::now();

    let trajectory = match &request.mode {
        RunMode::Fixed { dt } => vsc_sim::run_simulation(
            initial,
            &scenario.scenario,
            params,
            request.t_end,
            *dt,
            &opts,
        )?,
        RunMode::Adaptive(adaptive) => vsc_sim::run_simulation_adaptive(
            initial,
            &scenario.scenario,
            params,
            request.t_end,
            adaptive,
            &opts,
        )?,
    };
    let elapsed_s = start.elapsed().as_secs_f64();

    if trajectory.newton_unconverged > 0 {
        tracing::warn!(
            steps = trajectory.newton_unconverged,
            max_iter = newton.max_iter,
            tol = newton.tol,
            "algebraic solve did not converge on some steps"
        );
    }
    tracing::info!(
        samples = trajectory.len(),
        attempts = trajectory.attempts,
        elapsed_s,
        "simulation finished"
    );

    Ok(SimulationResponse {
        trajectory,
        integrator: request.integrator,
        run_type: request.run_type(),
        elapsed_s,
    })
}

/// Validate in-memory configuration objects and run.
pub fn run_from_maps(
    params: &Document,
    scenario: &Document,
    request: &SimulationRequest,
) -> AppResult<SimulationResponse> {
    let params = params_from_map(params)?;
    let scenario = scenario_from_map(scenario)?;
    run_simulation(&params, &scenario, request)
}

/// Load a parameter file and a scenario file.
pub fn load_inputs(
    params_path: &Path,
    scenario_path: &Path,
) -> AppResult<(Params, ScenarioConfig)> {
    Ok((load_params(params_path)?, load_scenario(scenario_path)?))
}

/// Persist a finished run in `store`. Returns the manifest written.
pub fn save_run(
    store: &RunStore,
    params: &Params,
    scenario: &ScenarioConfig,
    response: &SimulationResponse,
) -> AppResult<RunManifest> {
    let integrator = response.integrator.as_str();
    let inputs = RunInputs {
        params,
        scenario: &scenario.scenario,
        x0: &scenario.initial_conditions.x0,
        y0: &scenario.initial_conditions.y0,
        run_type: &response.run_type,
        integrator,
    };
    let run_id = compute_run_id(&inputs, SOLVER_VERSION);
    let manifest = RunManifest {
        run_id,
        timestamp: timestamp_now(),
        control_mode: scenario.scenario.mode.name().to_string(),
        integrator: integrator.to_string(),
        run_type: response.run_type.clone(),
        solver_version: SOLVER_VERSION.to_string(),
        samples: response.trajectory.len(),
        newton_unconverged: response.trajectory.newton_unconverged,
    };
    store.save_run(&manifest, &response.rows())?;
    tracing::info!(run_id = %manifest.run_id, dir = %store.root_dir().display(), "run saved");
    Ok(manifest)
}
