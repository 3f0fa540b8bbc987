//! Initial conditions for `x` and `y`.

use crate::value::{Document, as_number};
use crate::{ProjectError, ProjectResult};
use serde_json::Value;
use vsc_core::{ALGEBRAIC_KEYS, AlgebraicVector, STATE_KEYS, StateVector};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InitialConditions {
    pub x0: StateVector,
    pub y0: AlgebraicVector,
}

/// Read initial conditions.
///
/// Values may sit directly in `config` (`"id": 0.1`) or in `x0` / `y0`
/// groups; a grouped value wins over a direct one. Absent values are 0.
pub fn initial_conditions_from_map(config: &Document) -> ProjectResult<InitialConditions> {
    let x0_group = group(config, "x0")?;
    let y0_group = group(config, "y0")?;

    let mut ic = InitialConditions::default();
    for key in STATE_KEYS {
        if let Some(v) = lookup(x0_group, config, key) {
            ic.x0.set(key, as_number(key, v)?)?;
        }
    }
    for key in ALGEBRAIC_KEYS {
        if let Some(v) = lookup(y0_group, config, key) {
            ic.y0.set(key, as_number(key, v)?)?;
        }
    }
    Ok(ic)
}

fn group<'a>(config: &'a Document, name: &str) -> ProjectResult<Option<&'a Document>> {
    match config.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(ProjectError::invalid(name, "expected an object")),
    }
}

fn lookup<'a>(group: Option<&'a Document>, config: &'a Document, key: &str) -> Option<&'a Value> {
    group.and_then(|g| g.get(key)).or_else(|| config.get(key))
}
