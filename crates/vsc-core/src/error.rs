use thiserror::Error;

pub type VscResult<T> = Result<T, VscError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VscError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown variable key: {key}")]
    UnknownKey { key: String },

    #[error("Invalid residual norm: {name} (expected \"max\" or \"l2\")")]
    InvalidNorm { name: String },
}
