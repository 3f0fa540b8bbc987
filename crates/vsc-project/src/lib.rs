//! vsc-project: loading and validation of parameter, scenario and batch files.
//!
//! Every loader accepts either an in-memory JSON object or a file path
//! (`.json`, `.yaml`, `.yml`). Required keys are checked up front and all
//! missing ones are reported together.

pub mod batch;
pub mod initial;
pub mod params;
pub mod scenario;
pub mod value;

pub use batch::{AdaptiveDef, CaseDef, ConfigSource, cases_from_value, load_cases};
pub use initial::{InitialConditions, initial_conditions_from_map};
pub use params::{load_params, params_from_map};
pub use scenario::{ScenarioConfig, load_scenario, scenario_from_map};
pub use value::{Document, read_document, read_value};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Missing required {context} keys: {}", .keys.join(", "))]
    MissingKeys {
        context: &'static str,
        keys: Vec<String>,
    },

    #[error("Unsupported control_mode in scenario: {mode:?} (expected \"PQ\" or \"VdcQ\")")]
    UnsupportedControlMode { mode: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unsupported file format: {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] vsc_core::VscError),
}

impl ProjectError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ProjectError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
