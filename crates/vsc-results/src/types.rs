//! Result data types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type RunId = String;

/// One flat output row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub t: f64,
    pub id: f64,
    pub iq: f64,
    #[serde(rename = "Vdc")]
    pub vdc: f64,
    #[serde(rename = "Idc")]
    pub idc: f64,
    #[serde(rename = "P_ac")]
    pub p_ac: f64,
    #[serde(rename = "Q_ac")]
    pub q_ac: f64,
}

/// Column-per-variable layout: `{"time": [...], "x": {"id": [...]}, "y": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnarResults {
    pub time: Vec<f64>,
    pub x: BTreeMap<String, Vec<f64>>,
    pub y: BTreeMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunType {
    Fixed {
        dt: f64,
        t_end: f64,
    },
    Adaptive {
        dt: f64,
        dt_min: f64,
        dt_max: f64,
        tol: f64,
        t_end: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub timestamp: String,
    pub control_mode: String,
    pub integrator: String,
    pub run_type: RunType,
    pub solver_version: String,
    /// Recorded snapshots, initial state included
    pub samples: usize,
    #[serde(default)]
    pub newton_unconverged: usize,
}

/// Current UTC time in RFC 3339, the manifest timestamp format.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}
