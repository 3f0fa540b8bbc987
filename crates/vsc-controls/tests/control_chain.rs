//! Outer loop, inner loop and saturation chained the way a step uses them.

use proptest::prelude::*;
use vsc_controls::{
    CurrentReferenceSource, ScenarioReferences, apply_voltage_saturation,
    compute_converter_voltage_references, currents_from_pq,
};
use vsc_core::{AlgebraicVector, Params, Scenario, StateVector};
use vsc_model::{active_power, reactive_power};

proptest! {
    #[test]
    fn pq_inversion_reproduces_power(
        p in -5.0f64..5.0,
        q in -5.0f64..5.0,
        vd in 0.1f64..2.0,
        vq in -1.0f64..1.0,
    ) {
        let refs = currents_from_pq(p, q, vd, vq);
        let p_back = active_power(refs.id_ref, refs.iq_ref, vd, vq);
        let q_back = reactive_power(refs.id_ref, refs.iq_ref, vd, vq);
        prop_assert!((p_back - p).abs() < 1e-9);
        prop_assert!((q_back - q).abs() < 1e-9);
    }
}

#[test]
fn chain_saturates_large_error() {
    let params = Params::new(0.1, 0.01, 1.0, 1.0, 1.1, 50.0, 50.0);
    let scenario = Scenario::pq(1.5, 0.0, 1.0, 0.0);
    let x = StateVector::new(0.0, 0.0, 1.0);

    let refs =
        ScenarioReferences.current_references(0.0, &x, &AlgebraicVector::default(), &scenario, &params);
    assert!((refs.id_ref - 1.0).abs() < 1e-12);

    let (v, _) = compute_converter_voltage_references(refs.id_ref, refs.iq_ref, &x, &params, None);
    assert!((v.v_conv_d_ref - 50.0).abs() < 1e-9);

    let (vd, vq) = apply_voltage_saturation(v.v_conv_d_ref, v.v_conv_q_ref, params.v_max);
    assert!((vd - 1.1).abs() < 1e-12);
    assert!(vq.abs() < 1e-12);
}
