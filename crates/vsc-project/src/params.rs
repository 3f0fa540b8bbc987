//! Parameter set loading.

use crate::value::{Document, as_bool, as_number, missing_keys, read_document};
use crate::{ProjectError, ProjectResult};
use std::path::Path;
use vsc_core::{NewtonOverrides, Params, REQUIRED_PARAM_KEYS, ResidualNorm, ensure_finite};

const NR_KEYS: [&str; 4] = ["nr_tol", "nr_max_iter", "nr_norm", "nr_verbose"];

/// Build a [`Params`] from a configuration object.
///
/// Requires `L, R, Cdc, omega, V_max, Kp_id, Kp_iq`. The `nr_*` keys become
/// Newton overrides; every other key is kept as a pass-through scalar.
pub fn params_from_map(config: &Document) -> ProjectResult<Params> {
    let missing = missing_keys(config, &REQUIRED_PARAM_KEYS);
    if !missing.is_empty() {
        return Err(ProjectError::MissingKeys {
            context: "parameter",
            keys: missing,
        });
    }

    let req = |key: &'static str| -> ProjectResult<f64> {
        let value = config
            .get(key)
            .ok_or_else(|| ProjectError::invalid(key, "missing"))?;
        Ok(ensure_finite(as_number(key, value)?, key)?)
    };

    let mut params = Params::new(
        req("L")?,
        req("R")?,
        req("Cdc")?,
        req("omega")?,
        req("V_max")?,
        req("Kp_id")?,
        req("Kp_iq")?,
    );
    params.newton = newton_overrides(config)?;

    for (key, value) in config {
        if REQUIRED_PARAM_KEYS.contains(&key.as_str()) || NR_KEYS.contains(&key.as_str()) {
            continue;
        }
        params.extra.insert(key.clone(), as_number(key, value)?);
    }

    Ok(params)
}

fn newton_overrides(config: &Document) -> ProjectResult<NewtonOverrides> {
    let mut nr = NewtonOverrides::default();

    if let Some(v) = config.get("nr_tol") {
        let tol = as_number("nr_tol", v)?;
        if !tol.is_finite() || tol < 0.0 {
            return Err(ProjectError::invalid("nr_tol", "must be finite and non-negative"));
        }
        nr.tol = Some(tol);
    }
    if let Some(v) = config.get("nr_max_iter") {
        let n = as_number("nr_max_iter", v)?;
        if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
            return Err(ProjectError::invalid("nr_max_iter", "must be a non-negative integer"));
        }
        nr.max_iter = Some(n as usize);
    }
    if let Some(v) = config.get("nr_norm") {
        let name = v
            .as_str()
            .ok_or_else(|| ProjectError::invalid("nr_norm", "expected \"max\" or \"l2\""))?;
        let norm = name
            .parse::<ResidualNorm>()
            .map_err(|e| ProjectError::invalid("nr_norm", e.to_string()))?;
        nr.norm = Some(norm);
    }
    if let Some(v) = config.get("nr_verbose") {
        nr.verbose = as_bool("nr_verbose", v)?;
    }

    Ok(nr)
}

/// Read and validate a parameter file.
pub fn load_params(path: &Path) -> ProjectResult<Params> {
    params_from_map(&read_document(path)?)
}
