//! Electrical and control parameters.

use crate::VscError;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Required parameter keys, in their external spelling.
pub const REQUIRED_PARAM_KEYS: [&str; 7] = ["L", "R", "Cdc", "omega", "V_max", "Kp_id", "Kp_iq"];

/// Norm used to test the algebraic residual for convergence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ResidualNorm {
    /// Largest absolute component.
    #[default]
    Max,
    /// Euclidean norm.
    L2,
}

impl ResidualNorm {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResidualNorm::Max => "max",
            ResidualNorm::L2 => "l2",
        }
    }

    pub fn eval(&self, values: &[f64]) -> f64 {
        match self {
            ResidualNorm::Max => crate::max_norm(values),
            ResidualNorm::L2 => crate::l2_norm(values),
        }
    }
}

impl FromStr for ResidualNorm {
    type Err = VscError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max" | "inf" => Ok(ResidualNorm::Max),
            "l2" => Ok(ResidualNorm::L2),
            _ => Err(VscError::InvalidNorm {
                name: s.to_string(),
            }),
        }
    }
}

/// Newton-Raphson tuning carried inside the parameter set
/// (`nr_tol`, `nr_max_iter`, `nr_norm`, `nr_verbose`).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtonOverrides {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub tol: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub max_iter: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub norm: Option<ResidualNorm>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub verbose: bool,
}

/// Converter and network parameters.
///
/// Values are used as given (per-unit or SI, the model is unit-agnostic).
/// The engine only ever reads a `Params`; callers own it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Params {
    /// AC filter inductance.
    #[cfg_attr(feature = "serde", serde(rename = "L"))]
    pub l: f64,
    /// AC filter resistance.
    #[cfg_attr(feature = "serde", serde(rename = "R"))]
    pub r: f64,
    /// DC link capacitance.
    #[cfg_attr(feature = "serde", serde(rename = "Cdc"))]
    pub cdc: f64,
    /// Synchronous angular frequency.
    pub omega: f64,
    /// Converter voltage magnitude limit.
    #[cfg_attr(feature = "serde", serde(rename = "V_max"))]
    pub v_max: f64,
    /// Proportional gain of the d-axis current loop.
    #[cfg_attr(feature = "serde", serde(rename = "Kp_id"))]
    pub kp_id: f64,
    /// Proportional gain of the q-axis current loop.
    #[cfg_attr(feature = "serde", serde(rename = "Kp_iq"))]
    pub kp_iq: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub newton: NewtonOverrides,
    /// Pass-through keys not interpreted by the engine.
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra: BTreeMap<String, f64>,
}

impl Params {
    pub fn new(l: f64, r: f64, cdc: f64, omega: f64, v_max: f64, kp_id: f64, kp_iq: f64) -> Self {
        Self {
            l,
            r,
            cdc,
            omega,
            v_max,
            kp_id,
            kp_iq,
            newton: NewtonOverrides::default(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_newton(mut self, newton: NewtonOverrides) -> Self {
        self.newton = newton;
        self
    }

    /// Look up a parameter by its external key, required keys first.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "L" => Some(self.l),
            "R" => Some(self.r),
            "Cdc" => Some(self.cdc),
            "omega" => Some(self.omega),
            "V_max" => Some(self.v_max),
            "Kp_id" => Some(self.kp_id),
            "Kp_iq" => Some(self.kp_iq),
            other => self.extra.get(other).copied(),
        }
    }
}
