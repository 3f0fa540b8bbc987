//! Error types for the vsc-app service layer.

/// Application error type wrapping the backend crates' errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Project(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Batch error: {message}")]
    Batch { message: String },
}

/// Result type for vsc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<vsc_project::ProjectError> for AppError {
    fn from(err: vsc_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<vsc_solver::SolverError> for AppError {
    fn from(err: vsc_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<vsc_sim::SimError> for AppError {
    fn from(err: vsc_sim::SimError) -> Self {
        match err {
            vsc_sim::SimError::UnknownIntegrator { .. } => AppError::InvalidInput(err.to_string()),
            other => AppError::Simulation(other.to_string()),
        }
    }
}

impl From<vsc_results::ResultsError> for AppError {
    fn from(err: vsc_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
