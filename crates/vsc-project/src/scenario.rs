//! Scenario loading.

use crate::initial::{InitialConditions, initial_conditions_from_map};
use crate::value::{Document, as_number, missing_keys, read_document};
use crate::{ProjectError, ProjectResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use vsc_core::{ControlMode, Scenario, ensure_finite};

const COMMON_KEYS: [&str; 3] = ["control_mode", "v_pcc_d", "v_pcc_q"];
const PQ_KEYS: [&str; 2] = ["P_ref", "Q_ref"];
const VDCQ_KEYS: [&str; 2] = ["id_ref", "iq_ref"];
const INITIAL_CONDITIONS_KEY: &str = "initial_conditions";

/// A validated scenario with its initial conditions and untouched extras.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioConfig {
    pub scenario: Scenario,
    pub initial_conditions: InitialConditions,
    pub extra: BTreeMap<String, Value>,
}

/// Build a scenario from a configuration object.
///
/// `control_mode` must be `"PQ"` (needs `P_ref`, `Q_ref`) or `"VdcQ"` (needs
/// `id_ref`, `iq_ref`); both need `v_pcc_d` and `v_pcc_q`. Initial conditions
/// are read from an optional `initial_conditions` object.
pub fn scenario_from_map(config: &Document) -> ProjectResult<ScenarioConfig> {
    let mut missing = missing_keys(config, &COMMON_KEYS);

    let mode_name = match config.get("control_mode") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            return Err(ProjectError::UnsupportedControlMode {
                mode: other.to_string(),
            });
        }
        None => None,
    };
    let mode_keys: &[&str] = match mode_name {
        Some("PQ") => &PQ_KEYS,
        Some("VdcQ") => &VDCQ_KEYS,
        Some(other) => {
            return Err(ProjectError::UnsupportedControlMode {
                mode: other.to_string(),
            });
        }
        None => &[],
    };
    missing.extend(missing_keys(config, mode_keys));
    if !missing.is_empty() {
        return Err(ProjectError::MissingKeys {
            context: "scenario",
            keys: missing,
        });
    }

    let num = |key: &'static str| -> ProjectResult<f64> {
        let value = config
            .get(key)
            .ok_or_else(|| ProjectError::invalid(key, "missing"))?;
        Ok(ensure_finite(as_number(key, value)?, key)?)
    };

    let mode = match mode_name {
        Some("PQ") => ControlMode::Pq {
            p_ref: num("P_ref")?,
            q_ref: num("Q_ref")?,
        },
        _ => ControlMode::VdcQ {
            id_ref: num("id_ref")?,
            iq_ref: num("iq_ref")?,
        },
    };
    let scenario = Scenario {
        mode,
        v_pcc_d: num("v_pcc_d")?,
        v_pcc_q: num("v_pcc_q")?,
    };

    let initial_conditions = match config.get(INITIAL_CONDITIONS_KEY) {
        None | Some(Value::Null) => InitialConditions::default(),
        Some(Value::Object(ic)) => initial_conditions_from_map(ic)?,
        Some(_) => {
            return Err(ProjectError::invalid(
                INITIAL_CONDITIONS_KEY,
                "expected an object",
            ));
        }
    };

    let extra = config
        .iter()
        .filter(|(k, _)| {
            let k = k.as_str();
            !COMMON_KEYS.contains(&k) && !mode_keys.contains(&k) && k != INITIAL_CONDITIONS_KEY
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(ScenarioConfig {
        scenario,
        initial_conditions,
        extra,
    })
}

/// Read and validate a scenario file.
pub fn load_scenario(path: &Path) -> ProjectResult<ScenarioConfig> {
    scenario_from_map(&read_document(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vsc_core::StateVector;

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn pq_scenario() {
        let cfg = doc(json!({
            "control_mode": "PQ", "P_ref": 1.0, "Q_ref": -0.2,
            "v_pcc_d": 1.0, "v_pcc_q": 0.0, "name": "step"
        }));
        let sc = scenario_from_map(&cfg).unwrap();
        assert_eq!(sc.scenario, Scenario::pq(1.0, -0.2, 1.0, 0.0));
        assert_eq!(sc.extra.get("name"), Some(&json!("step")));
        assert_eq!(sc.initial_conditions, InitialConditions::default());
    }

    #[test]
    fn vdcq_scenario_with_initial_conditions() {
        let cfg = doc(json!({
            "control_mode": "VdcQ", "id_ref": 0.5, "iq_ref": 0.0,
            "v_pcc_d": 1.0, "v_pcc_q": 0.0,
            "initial_conditions": {"x0": {"Vdc": 1.0}}
        }));
        let sc = scenario_from_map(&cfg).unwrap();
        assert_eq!(sc.scenario, Scenario::vdc_q(0.5, 0.0, 1.0, 0.0));
        assert_eq!(sc.initial_conditions.x0, StateVector::new(0.0, 0.0, 1.0));
        assert!(sc.extra.is_empty());
    }

    #[test]
    fn reports_common_and_mode_keys_together() {
        let cfg = doc(json!({"control_mode": "PQ", "v_pcc_d": 1.0, "Q_ref": 0.0}));
        match scenario_from_map(&cfg).unwrap_err() {
            ProjectError::MissingKeys { context, keys } => {
                assert_eq!(context, "scenario");
                assert_eq!(keys, vec!["v_pcc_q", "P_ref"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let cfg = doc(json!({
            "control_mode": "Droop", "v_pcc_d": 1.0, "v_pcc_q": 0.0
        }));
        assert!(matches!(
            scenario_from_map(&cfg),
            Err(ProjectError::UnsupportedControlMode { mode }) if mode == "Droop"
        ));
    }
}
