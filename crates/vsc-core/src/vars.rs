//! Canonical variable sets of the RMS model.
//!
//! - dynamic state `x = {id, iq, Vdc}`
//! - algebraic state `y = {Idc, P_ac, Q_ac}`
//!
//! Both are fixed three-field records: every key is always present and the
//! key order below is the row/column order of every Jacobian.

use crate::{VscError, VscResult};

/// Key order of the dynamic state.
pub const STATE_KEYS: [&str; 3] = ["id", "iq", "Vdc"];

/// Key order of the algebraic state.
pub const ALGEBRAIC_KEYS: [&str; 3] = ["Idc", "P_ac", "Q_ac"];

/// Dynamic state: dq AC currents and DC link voltage.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateVector {
    pub id: f64,
    pub iq: f64,
    #[cfg_attr(feature = "serde", serde(rename = "Vdc"))]
    pub vdc: f64,
}

impl StateVector {
    pub fn new(id: f64, iq: f64, vdc: f64) -> Self {
        Self { id, iq, vdc }
    }

    /// Values in `STATE_KEYS` order.
    pub fn to_array(&self) -> [f64; 3] {
        [self.id, self.iq, self.vdc]
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn get(&self, key: &str) -> VscResult<f64> {
        match key {
            "id" => Ok(self.id),
            "iq" => Ok(self.iq),
            "Vdc" => Ok(self.vdc),
            _ => Err(VscError::UnknownKey {
                key: key.to_string(),
            }),
        }
    }

    pub fn set(&mut self, key: &str, value: f64) -> VscResult<()> {
        match key {
            "id" => self.id = value,
            "iq" => self.iq = value,
            "Vdc" => self.vdc = value,
            _ => {
                return Err(VscError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs in `STATE_KEYS` order.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            (STATE_KEYS[0], self.id),
            (STATE_KEYS[1], self.iq),
            (STATE_KEYS[2], self.vdc),
        ]
    }
}

/// Algebraic state: DC current and AC active/reactive power.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgebraicVector {
    #[cfg_attr(feature = "serde", serde(rename = "Idc"))]
    pub idc: f64,
    #[cfg_attr(feature = "serde", serde(rename = "P_ac"))]
    pub p_ac: f64,
    #[cfg_attr(feature = "serde", serde(rename = "Q_ac"))]
    pub q_ac: f64,
}

impl AlgebraicVector {
    pub fn new(idc: f64, p_ac: f64, q_ac: f64) -> Self {
        Self { idc, p_ac, q_ac }
    }

    /// Values in `ALGEBRAIC_KEYS` order.
    pub fn to_array(&self) -> [f64; 3] {
        [self.idc, self.p_ac, self.q_ac]
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn get(&self, key: &str) -> VscResult<f64> {
        match key {
            "Idc" => Ok(self.idc),
            "P_ac" => Ok(self.p_ac),
            "Q_ac" => Ok(self.q_ac),
            _ => Err(VscError::UnknownKey {
                key: key.to_string(),
            }),
        }
    }

    pub fn set(&mut self, key: &str, value: f64) -> VscResult<()> {
        match key {
            "Idc" => self.idc = value,
            "P_ac" => self.p_ac = value,
            "Q_ac" => self.q_ac = value,
            _ => {
                return Err(VscError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs in `ALGEBRAIC_KEYS` order.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            (ALGEBRAIC_KEYS[0], self.idc),
            (ALGEBRAIC_KEYS[1], self.p_ac),
            (ALGEBRAIC_KEYS[2], self.q_ac),
        ]
    }
}
