//! Converter control chain for the VSC simulator.
//!
//! Each simulation step runs three stateless stages before the algebraic solve:
//!
//! 1. **External control**: scenario references to dq current references
//!    (`PQ` inverts the power equations, `VdcQ` passes scenario currents through)
//! 2. **Inner control**: proportional current loop producing converter voltage
//!    references; an opaque [`ControllerState`] is threaded in and out but not
//!    evolved
//! 3. **Saturation**: the converter voltage vector is scaled back onto the
//!    `V_max` circle when it exceeds it
//!
//! None of these stages enter the Jacobians.

pub mod external;
pub mod inner;
pub mod saturation;

pub use external::{
    CurrentReferenceSource, CurrentReferences, ScenarioReferences, compute_current_references,
    currents_from_pq,
};
pub use inner::{ControllerState, VoltageReferences, compute_converter_voltage_references};
pub use saturation::apply_voltage_saturation;
