use crate::VscError;

/// Floating point type of every model quantity.
pub type Real = f64;

/// Reject NaN and infinities, naming the offending quantity.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, VscError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(VscError::NonFinite { what, value: v })
    }
}

/// Infinity norm (largest absolute entry). Empty input has norm 0.
///
/// A NaN entry makes the norm NaN, so it can never pass a tolerance test.
pub fn max_norm(values: &[Real]) -> Real {
    values.iter().fold(0.0, |acc: Real, v| {
        if acc.is_nan() || v.is_nan() {
            Real::NAN
        } else {
            acc.max(v.abs())
        }
    })
}

/// Euclidean norm.
pub fn l2_norm(values: &[Real]) -> Real {
    values.iter().map(|v| v * v).sum::<Real>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn norms_of_simple_vectors() {
        assert_eq!(max_norm(&[]), 0.0);
        assert_eq!(max_norm(&[1.0, -3.0, 2.0]), 3.0);
        assert!((l2_norm(&[3.0, -4.0]) - 5.0).abs() < 1e-15);
    }

    #[test]
    fn nan_poisons_max_norm() {
        assert!(max_norm(&[1.0, Real::NAN, 2.0]).is_nan());
        assert!(l2_norm(&[Real::NAN]).is_nan());
    }
}
