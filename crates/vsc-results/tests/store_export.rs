use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use vsc_results::*;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn rows() -> Vec<ResultRow> {
    vec![
        ResultRow {
            t: 0.0,
            id: 0.0,
            iq: 0.0,
            vdc: 1.0,
            idc: 0.0,
            p_ac: 0.0,
            q_ac: 0.0,
        },
        ResultRow {
            t: 1e-3,
            id: 0.25,
            iq: -0.125,
            vdc: 0.995,
            idc: 0.375,
            p_ac: 0.375,
            q_ac: 0.1875,
        },
    ]
}

fn manifest(run_id: &str, timestamp: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        timestamp: timestamp.to_string(),
        control_mode: "PQ".to_string(),
        integrator: "rk4".to_string(),
        run_type: RunType::Fixed {
            dt: 1e-3,
            t_end: 1e-3,
        },
        solver_version: "0.1.0".to_string(),
        samples: 2,
        newton_unconverged: 0,
    }
}

#[test]
fn save_list_load_roundtrip() {
    let dir = unique_temp_dir("vsc_results_store");
    let store = RunStore::new(dir.clone()).expect("failed to create run store");

    store
        .save_run(&manifest("run-b", "2026-02-26T00:00:01Z"), &rows())
        .expect("failed to save run");
    store
        .save_run(&manifest("run-a", "2026-02-26T00:00:00Z"), &rows()[..1])
        .expect("failed to save run");

    let runs = store.list_runs().expect("failed to list runs");
    let ids: Vec<_> = runs.iter().map(|m| m.run_id.as_str()).collect();
    assert_eq!(ids, vec!["run-a", "run-b"]);

    assert!(store.has_run("run-b"));
    assert_eq!(store.load_manifest("run-b").unwrap(), manifest("run-b", "2026-02-26T00:00:01Z"));
    assert_eq!(store.load_timeseries("run-b").unwrap(), rows());

    store.delete_run("run-b").unwrap();
    assert!(!store.has_run("run-b"));
    assert!(matches!(
        store.load_manifest("run-b"),
        Err(ResultsError::RunNotFound { .. })
    ));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn csv_export_has_named_header() {
    let dir = unique_temp_dir("vsc_results_csv");
    let path = dir.join("out.csv");

    write_csv(&path, &rows(), &ExportConfig::default()).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("t,id,iq,Vdc,Idc,P_ac,Q_ac"));
    assert_eq!(lines.count(), 2);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn existing_output_needs_overwrite() {
    let dir = unique_temp_dir("vsc_results_overwrite");
    let path = dir.join("out.json");

    export_rows(&path, &rows(), ExportFormat::Json, &ExportConfig::default()).unwrap();
    let err = export_rows(&path, &rows()[..1], ExportFormat::Json, &ExportConfig::default())
        .unwrap_err();
    assert!(matches!(err, ResultsError::OutputExists { .. }));

    export_rows(
        &path,
        &rows()[..1],
        ExportFormat::Json,
        &ExportConfig { overwrite: true },
    )
    .unwrap();
    let back: Vec<ResultRow> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, rows()[..1].to_vec());

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn timestamp_is_rfc3339() {
    let ts = timestamp_now();
    assert!(ts.contains('T'));
    assert!(ts.ends_with("+00:00"));
}
