//! State arithmetic used by the integrators.

use crate::error::{SimError, SimResult};
use std::collections::BTreeMap;
use vsc_core::StateVector;

/// A dynamic state the explicit integrators can advance.
///
/// A derivative has the same type as the state it belongs to.
pub trait IntegrableState: Clone {
    /// `self + h * deriv`, key by key.
    fn add_scaled(&self, deriv: &Self, h: f64) -> SimResult<Self>;

    /// Largest absolute componentwise difference.
    fn max_abs_diff(&self, other: &Self) -> SimResult<f64>;

    /// Largest absolute component.
    fn max_abs(&self) -> f64;
}

impl IntegrableState for f64 {
    fn add_scaled(&self, deriv: &Self, h: f64) -> SimResult<Self> {
        Ok(self + h * deriv)
    }

    fn max_abs_diff(&self, other: &Self) -> SimResult<f64> {
        Ok((self - other).abs())
    }

    fn max_abs(&self) -> f64 {
        self.abs()
    }
}

impl IntegrableState for StateVector {
    fn add_scaled(&self, deriv: &Self, h: f64) -> SimResult<Self> {
        Ok(StateVector::new(
            self.id + h * deriv.id,
            self.iq + h * deriv.iq,
            self.vdc + h * deriv.vdc,
        ))
    }

    fn max_abs_diff(&self, other: &Self) -> SimResult<f64> {
        let a = self.to_array();
        let b = other.to_array();
        Ok(vsc_core::max_norm(&[a[0] - b[0], a[1] - b[1], a[2] - b[2]]))
    }

    fn max_abs(&self) -> f64 {
        vsc_core::max_norm(&self.to_array())
    }
}

/// Open-ended named state, for models other than the converter's fixed `x`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamedState(BTreeMap<String, f64>);

impl NamedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for NamedState {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<StateVector> for NamedState {
    fn from(x: StateVector) -> Self {
        x.entries().into_iter().collect()
    }
}

impl IntegrableState for NamedState {
    /// Keys of `self` drive the result; extra derivative keys are ignored.
    fn add_scaled(&self, deriv: &Self, h: f64) -> SimResult<Self> {
        let mut out = BTreeMap::new();
        for (key, value) in &self.0 {
            let d = deriv
                .0
                .get(key)
                .ok_or_else(|| SimError::MissingDerivative { key: key.clone() })?;
            out.insert(key.clone(), value + h * d);
        }
        Ok(Self(out))
    }

    fn max_abs_diff(&self, other: &Self) -> SimResult<f64> {
        let mut err = 0.0_f64;
        for (key, value) in &self.0 {
            let o = other
                .0
                .get(key)
                .ok_or_else(|| SimError::StateMismatch { key: key.clone() })?;
            err = err.max((value - o).abs());
        }
        Ok(err)
    }

    fn max_abs(&self) -> f64 {
        self.0.values().fold(0.0_f64, |m, v| m.max(v.abs()))
    }
}
