use std::path::PathBuf;
use vsc_core::{ControlMode, ResidualNorm, StateVector};
use vsc_project::{
    ConfigSource, ProjectError, load_cases, load_params, load_scenario, scenario_from_map,
};

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("vsc_project_tests");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn params_load_from_yaml_and_json_alike() {
    let yaml = temp_path("params.yaml");
    std::fs::write(
        &yaml,
        "L: 0.1\nR: 0.01\nCdc: 1.0\nomega: 314.159\nV_max: 1.2\nKp_id: 2.0\nKp_iq: 2.0\n\
         nr_tol: 1.0e-10\nnr_norm: l2\nbase_mva: 100\n",
    )
    .unwrap();
    let json = temp_path("params.json");
    std::fs::write(
        &json,
        r#"{"L": 0.1, "R": 0.01, "Cdc": 1.0, "omega": 314.159, "V_max": 1.2,
            "Kp_id": 2.0, "Kp_iq": 2.0, "nr_tol": 1e-10, "nr_norm": "l2", "base_mva": 100}"#,
    )
    .unwrap();

    let a = load_params(&yaml).unwrap();
    let b = load_params(&json).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.newton.tol, Some(1e-10));
    assert_eq!(a.newton.norm, Some(ResidualNorm::L2));
    assert_eq!(a.get("base_mva"), Some(100.0));
}

#[test]
fn missing_parameter_keys_are_listed_together() {
    let path = temp_path("params_partial.json");
    std::fs::write(&path, r#"{"L": 0.1, "Cdc": 1.0, "omega": 1.0, "V_max": 1.0}"#).unwrap();
    let err = load_params(&path).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required parameter keys: R, Kp_id, Kp_iq"
    );
}

#[test]
fn scenario_with_grouped_initial_conditions() {
    let path = temp_path("scenario.yml");
    std::fs::write(
        &path,
        "control_mode: PQ\nP_ref: 0.8\nQ_ref: 0.1\nv_pcc_d: 1.0\nv_pcc_q: 0.0\n\
         initial_conditions:\n  id: 0.5\n  x0:\n    id: 0.2\n    Vdc: 1.0\n  y0:\n    P_ac: 0.3\n",
    )
    .unwrap();
    let sc = load_scenario(&path).unwrap();
    assert_eq!(
        sc.scenario.mode,
        ControlMode::Pq {
            p_ref: 0.8,
            q_ref: 0.1
        }
    );
    assert_eq!(sc.initial_conditions.x0, StateVector::new(0.2, 0.0, 1.0));
    assert_eq!(sc.initial_conditions.y0.p_ac, 0.3);
}

#[test]
fn scenario_without_control_mode_lists_it_as_missing() {
    let cfg = serde_json::json!({"v_pcc_d": 1.0});
    let err = scenario_from_map(cfg.as_object().unwrap()).unwrap_err();
    match err {
        ProjectError::MissingKeys { keys, .. } => assert_eq!(keys, vec!["control_mode", "v_pcc_q"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn batch_file_resolves_relative_paths() {
    let params = temp_path("batch_params.json");
    std::fs::write(
        &params,
        r#"{"L": 0.1, "R": 0.01, "Cdc": 1.0, "omega": 1.0, "V_max": 1.2, "Kp_id": 1.0, "Kp_iq": 1.0}"#,
    )
    .unwrap();
    let cases = temp_path("batch.yaml");
    std::fs::write(
        &cases,
        "cases:\n  - id: a\n    params: batch_params.json\n    scenario:\n      control_mode: VdcQ\n\
         \x20     id_ref: 0.1\n      iq_ref: 0.0\n      v_pcc_d: 1.0\n      v_pcc_q: 0.0\n\
         \x20   integrator: rk2\n    adaptive:\n      dt_min: 1.0e-6\n    t_end: 0.01\n    dt: 1.0e-4\n",
    )
    .unwrap();

    let loaded = load_cases(&cases).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].integrator.as_deref(), Some("rk2"));
    assert_eq!(loaded[0].adaptive.as_ref().unwrap().dt_min, Some(1e-6));

    let base = cases.parent().unwrap();
    let doc = loaded[0].params.resolve(base).unwrap();
    assert_eq!(doc.get("L").and_then(|v| v.as_f64()), Some(0.1));
    assert!(matches!(loaded[0].scenario, ConfigSource::Inline(_)));
}
