//! Independent-case batch runner.

use std::path::Path;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use vsc_project::{AdaptiveDef, CaseDef, Document, load_cases};
use vsc_results::ColumnarResults;
use vsc_sim::{AdaptiveOptions, IntegratorKind};

use crate::error::{AppError, AppResult};
use crate::run_service::{RunMode, SimulationRequest, run_from_maps};

/// One simulation of a batch, with its configuration in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchCase {
    pub id: String,
    pub params: Document,
    pub scenario: Document,
    /// Integrator name; Euler when absent
    pub integrator: Option<String>,
    /// Adaptive stepping when present, fixed steps of `dt` otherwise
    pub adaptive: Option<AdaptiveDef>,
    pub t_end: f64,
    /// Fixed step, or initial step of an adaptive run
    pub dt: f64,
}

impl BatchCase {
    /// Resolve a case definition, reading `params` / `scenario` files
    /// relative to `base_dir`.
    pub fn from_def(def: &CaseDef, base_dir: &Path) -> AppResult<Self> {
        Ok(Self {
            id: def.id.clone(),
            params: def.params.resolve(base_dir)?,
            scenario: def.scenario.resolve(base_dir)?,
            integrator: def.integrator.clone(),
            adaptive: def.adaptive.clone(),
            t_end: def.t_end,
            dt: def.dt,
        })
    }

    fn request(&self) -> AppResult<SimulationRequest> {
        let integrator = match &self.integrator {
            Some(name) => name.parse::<IntegratorKind>()?,
            None => IntegratorKind::default(),
        };
        let mode = match &self.adaptive {
            None => RunMode::Fixed { dt: self.dt },
            Some(def) => {
                let mut opts = AdaptiveOptions::new(
                    self.dt,
                    def.dt_min.unwrap_or(self.dt * 1e-3),
                    def.dt_max.unwrap_or(self.dt),
                );
                if let Some(tol) = def.tol {
                    opts = opts.with_tol(tol);
                }
                if let Some(max_steps) = def.max_steps {
                    opts = opts.with_max_steps(max_steps);
                }
                RunMode::Adaptive(opts)
            }
        };
        Ok(SimulationRequest {
            mode,
            ..SimulationRequest::fixed(self.t_end, self.dt).with_integrator(integrator)
        })
    }
}

/// Outcome of one case. Exactly one of `data` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub id: String,
    pub ok: bool,
    pub data: Option<ColumnarResults>,
    pub error: Option<String>,
}

impl BatchResult {
    fn success(id: &str, data: ColumnarResults) -> Self {
        Self {
            id: id.to_string(),
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(id: &str, err: &AppError) -> Self {
        tracing::warn!(case = id, error = %err, "batch case failed");
        Self {
            id: id.to_string(),
            ok: false,
            data: None,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub parallel: bool,
    /// Worker threads when parallel; 0 uses one per logical CPU
    pub workers: usize,
}

/// Run one case, capturing any failure in the result.
pub fn run_case(case: &BatchCase) -> BatchResult {
    let outcome = case
        .request()
        .and_then(|request| run_from_maps(&case.params, &case.scenario, &request));
    match outcome {
        Ok(response) => BatchResult::success(&case.id, response.columnar()),
        Err(err) => BatchResult::failure(&case.id, &err),
    }
}

/// Run every case. Results come back in input order.
pub fn run_batch(cases: &[BatchCase], options: &BatchOptions) -> AppResult<Vec<BatchResult>> {
    fan_out(cases, options, run_case)
}

/// Load a batch file and run its cases. A case whose files cannot be read
/// fails on its own.
pub fn run_batch_file(path: &Path, options: &BatchOptions) -> AppResult<Vec<BatchResult>> {
    let defs = load_cases(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fan_out(&defs, options, |def| match BatchCase::from_def(def, base_dir) {
        Ok(case) => run_case(&case),
        Err(err) => BatchResult::failure(&def.id, &err),
    })
}

fn fan_out<T, F>(items: &[T], options: &BatchOptions, run: F) -> AppResult<Vec<BatchResult>>
where
    T: Sync,
    F: Fn(&T) -> BatchResult + Sync + Send,
{
    tracing::info!(
        cases = items.len(),
        parallel = options.parallel,
        workers = options.workers,
        "batch started"
    );

    let results: Vec<BatchResult> = if options.parallel {
        let pool = ThreadPoolBuilder::new()
            .num_threads(options.workers)
            .build()
            .map_err(|e| AppError::Batch {
                message: format!("building thread pool: {e}"),
            })?;
        pool.install(|| items.par_iter().map(&run).collect())
    } else {
        items.iter().map(&run).collect()
    };

    let failed = results.iter().filter(|r| !r.ok).count();
    tracing::info!(cases = results.len(), failed, "batch finished");
    Ok(results)
}
