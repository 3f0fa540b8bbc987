//! vsc-results: result shapes, export and on-disk run storage.

pub mod convert;
pub mod export;
pub mod hash;
pub mod store;
pub mod types;

pub use convert::{columnar_from_trajectory, rows_from_trajectory, snapshots_from_columnar};
pub use export::{ExportConfig, ExportFormat, export_rows, write_csv, write_json};
pub use hash::{RunInputs, compute_run_id};
pub use store::RunStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Output file already exists: {path} (use overwrite to replace it)")]
    OutputExists { path: String },

    #[error("Unknown export format: {name} (expected \"csv\" or \"json\")")]
    UnknownFormat { name: String },

    #[error("Missing series in columnar results: {name}")]
    MissingSeries { name: String },

    #[error("Series {name} has {actual} samples, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}
