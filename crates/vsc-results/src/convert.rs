//! Conversions between the snapshot record and the flat/columnar layouts.

use crate::types::{ColumnarResults, ResultRow};
use crate::{ResultsError, ResultsResult};
use std::collections::BTreeMap;
use vsc_core::{ALGEBRAIC_KEYS, AlgebraicVector, STATE_KEYS, StateVector};
use vsc_sim::{Snapshot, Trajectory};

pub fn rows_from_trajectory(trajectory: &Trajectory) -> Vec<ResultRow> {
    trajectory
        .snapshots
        .iter()
        .map(|s| ResultRow {
            t: s.t,
            id: s.x.id,
            iq: s.x.iq,
            vdc: s.x.vdc,
            idc: s.y.idc,
            p_ac: s.y.p_ac,
            q_ac: s.y.q_ac,
        })
        .collect()
}

pub fn columnar_from_trajectory(trajectory: &Trajectory) -> ColumnarResults {
    let n = trajectory.len();
    let mut x: BTreeMap<String, Vec<f64>> = STATE_KEYS
        .iter()
        .map(|k| (k.to_string(), Vec::with_capacity(n)))
        .collect();
    let mut y: BTreeMap<String, Vec<f64>> = ALGEBRAIC_KEYS
        .iter()
        .map(|k| (k.to_string(), Vec::with_capacity(n)))
        .collect();

    for s in &trajectory.snapshots {
        for (key, value) in s.x.entries() {
            x.entry(key.to_string()).or_default().push(value);
        }
        for (key, value) in s.y.entries() {
            y.entry(key.to_string()).or_default().push(value);
        }
    }

    ColumnarResults {
        time: trajectory.times(),
        x,
        y,
    }
}

/// Rebuild snapshots from columns. Every series must be present and as long
/// as `time`.
pub fn snapshots_from_columnar(columns: &ColumnarResults) -> ResultsResult<Vec<Snapshot>> {
    let n = columns.time.len();
    let x_series = series(&columns.x, &STATE_KEYS, n)?;
    let y_series = series(&columns.y, &ALGEBRAIC_KEYS, n)?;

    Ok((0..n)
        .map(|i| Snapshot {
            t: columns.time[i],
            x: StateVector::from_array([x_series[0][i], x_series[1][i], x_series[2][i]]),
            y: AlgebraicVector::from_array([y_series[0][i], y_series[1][i], y_series[2][i]]),
        })
        .collect())
}

fn series<'a>(
    group: &'a BTreeMap<String, Vec<f64>>,
    keys: &[&str; 3],
    expected: usize,
) -> ResultsResult<[&'a [f64]; 3]> {
    let get = |key: &str| -> ResultsResult<&'a [f64]> {
        let values = group.get(key).ok_or_else(|| ResultsError::MissingSeries {
            name: key.to_string(),
        })?;
        if values.len() != expected {
            return Err(ResultsError::LengthMismatch {
                name: key.to_string(),
                expected,
                actual: values.len(),
            });
        }
        Ok(values.as_slice())
    };
    Ok([get(keys[0])?, get(keys[1])?, get(keys[2])?])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trajectory() -> Trajectory {
        Trajectory {
            snapshots: vec![
                Snapshot {
                    t: 0.0,
                    x: StateVector::new(0.0, 0.0, 1.0),
                    y: AlgebraicVector::default(),
                },
                Snapshot {
                    t: 1e-3,
                    x: StateVector::new(0.1, -0.05, 0.99),
                    y: AlgebraicVector::new(0.2, 0.15, 0.075),
                },
            ],
            dt_history: vec![1e-3],
            newton_unconverged: 0,
            attempts: 1,
        }
    }

    #[test]
    fn rows_follow_snapshot_order() {
        let rows = rows_from_trajectory(&trajectory());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].t, 1e-3);
        assert_eq!(rows[1].iq, -0.05);
        assert_eq!(rows[1].q_ac, 0.075);
    }

    #[test]
    fn columns_use_variable_names() {
        let cols = columnar_from_trajectory(&trajectory());
        assert_eq!(cols.time, vec![0.0, 1e-3]);
        assert_eq!(cols.x["Vdc"], vec![1.0, 0.99]);
        assert_eq!(cols.y["P_ac"], vec![0.0, 0.15]);
        assert_eq!(snapshots_from_columnar(&cols).unwrap(), trajectory().snapshots);
    }

    #[test]
    fn short_series_is_rejected() {
        let mut cols = columnar_from_trajectory(&trajectory());
        cols.y.get_mut("Idc").unwrap().pop();
        assert!(matches!(
            snapshots_from_columnar(&cols),
            Err(ResultsError::LengthMismatch { expected: 2, actual: 1, .. })
        ));
        cols.x.remove("iq");
        assert!(matches!(
            snapshots_from_columnar(&cols),
            Err(ResultsError::MissingSeries { name }) if name == "iq"
        ));
    }
}
