//! Simulation scenario: control mode, PCC voltages and references.

/// Outer control mode with its mode-specific references.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "control_mode"))]
pub enum ControlMode {
    /// Active/reactive power tracking.
    #[cfg_attr(feature = "serde", serde(rename = "PQ"))]
    Pq {
        #[cfg_attr(feature = "serde", serde(rename = "P_ref"))]
        p_ref: f64,
        #[cfg_attr(feature = "serde", serde(rename = "Q_ref"))]
        q_ref: f64,
    },
    /// DC voltage / reactive power; current references come from the scenario.
    #[cfg_attr(feature = "serde", serde(rename = "VdcQ"))]
    VdcQ {
        id_ref: f64,
        iq_ref: f64,
    },
}

impl ControlMode {
    pub fn name(&self) -> &'static str {
        match self {
            ControlMode::Pq { .. } => "PQ",
            ControlMode::VdcQ { .. } => "VdcQ",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub mode: ControlMode,
    pub v_pcc_d: f64,
    pub v_pcc_q: f64,
}

impl Scenario {
    pub fn pq(p_ref: f64, q_ref: f64, v_pcc_d: f64, v_pcc_q: f64) -> Self {
        Self {
            mode: ControlMode::Pq { p_ref, q_ref },
            v_pcc_d,
            v_pcc_q,
        }
    }

    pub fn vdc_q(id_ref: f64, iq_ref: f64, v_pcc_d: f64, v_pcc_q: f64) -> Self {
        Self {
            mode: ControlMode::VdcQ { id_ref, iq_ref },
            v_pcc_d,
            v_pcc_q,
        }
    }
}
