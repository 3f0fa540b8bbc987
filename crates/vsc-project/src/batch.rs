//! Batch case files.
//!
//! A batch file is a list of cases, either at the top level or under a
//! `cases` key:
//!
//! ```yaml
//! cases:
//!   - id: pq-step
//!     params: params.yaml        # path, relative to the batch file
//!     scenario: { control_mode: PQ, P_ref: 1.0, Q_ref: 0.0, v_pcc_d: 1.0, v_pcc_q: 0.0 }
//!     integrator: rk4
//!     t_end: 0.1
//!     dt: 1.0e-4
//! ```

use crate::value::{Document, read_document, read_value};
use crate::{ProjectError, ProjectResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A configuration object given inline or as a path to a file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigSource {
    Path(PathBuf),
    Inline(Document),
}

impl ConfigSource {
    /// Resolve to a document; relative paths are taken from `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> ProjectResult<Document> {
        match self {
            ConfigSource::Inline(doc) => Ok(doc.clone()),
            ConfigSource::Path(path) if path.is_absolute() => read_document(path),
            ConfigSource::Path(path) => read_document(&base_dir.join(path)),
        }
    }
}

/// Adaptive stepping settings of a case. Absent fields take the run defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveDef {
    pub dt_min: Option<f64>,
    pub dt_max: Option<f64>,
    pub tol: Option<f64>,
    pub max_steps: Option<usize>,
}

/// One independent simulation of a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseDef {
    pub id: String,
    pub params: ConfigSource,
    pub scenario: ConfigSource,
    #[serde(default)]
    pub integrator: Option<String>,
    /// Present for an adaptive run, absent for a fixed-step run.
    #[serde(default)]
    pub adaptive: Option<AdaptiveDef>,
    pub t_end: f64,
    pub dt: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CaseFile {
    List(Vec<CaseDef>),
    Wrapped { cases: Vec<CaseDef> },
}

/// Parse a list of cases from a JSON value.
pub fn cases_from_value(value: Value) -> ProjectResult<Vec<CaseDef>> {
    let file: CaseFile = serde_json::from_value(value)?;
    let cases = match file {
        CaseFile::List(cases) | CaseFile::Wrapped { cases } => cases,
    };
    let mut seen = std::collections::BTreeSet::new();
    for case in &cases {
        if !seen.insert(case.id.as_str()) {
            return Err(ProjectError::invalid(
                "cases",
                format!("duplicate case id {:?}", case.id),
            ));
        }
    }
    Ok(cases)
}

/// Read a batch file (`.json`, `.yaml`, `.yml`).
pub fn load_cases(path: &Path) -> ProjectResult<Vec<CaseDef>> {
    cases_from_value(read_value(path)?)
}
