//! Converter voltage magnitude limit.

/// Clamp the converter voltage vector to the `v_max` circle.
///
/// Vectors inside or on the circle, and the zero vector, are returned
/// unchanged. Longer vectors are scaled by `v_max / |v|`, preserving the
/// angle. Not differentiated by the algebraic solve.
pub fn apply_voltage_saturation(v_d: f64, v_q: f64, v_max: f64) -> (f64, f64) {
    let v_sq = v_d * v_d + v_q * v_q;
    if v_sq <= v_max * v_max || v_sq == 0.0 {
        return (v_d, v_q);
    }
    let scale = v_max / v_sq.sqrt();
    (v_d * scale, v_q * scale)
}
