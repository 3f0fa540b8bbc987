//! Application service layer shared by the command-line frontend.
//!
//! Chains configuration loading, simulation and result persistence, and runs
//! independent cases in batches.

pub mod batch;
pub mod error;
pub mod run_service;

pub use batch::{
    BatchCase, BatchOptions, BatchResult, run_batch, run_batch_file, run_case,
};
pub use error::{AppError, AppResult};
pub use run_service::{
    RunMode, SOLVER_VERSION, SimulationRequest, SimulationResponse, load_inputs, run_from_maps,
    run_simulation, save_run,
};
