//! Step-size controller driven by a local error estimate.

use crate::error::{SimError, SimResult};

/// Adaptive `dt` bookkeeping.
///
/// Treats the local error as scaling like `dt^order` and rescales `dt` by
///
/// ```text
/// factor = safety * (tol / error)^(1 / order)
/// ```
///
/// with the factor clamped to `[shrink_factor_min, growth_factor_max]` and
/// the resulting `dt` clamped to `[dt_min, dt_max]`.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptiveTimestepper {
    dt: f64,
    pub dt_min: f64,
    pub dt_max: f64,
    pub safety: f64,
    pub growth_factor_max: f64,
    pub shrink_factor_min: f64,
    /// Assumed order of the local error, tuned for second-order schemes.
    pub order: f64,
}

impl AdaptiveTimestepper {
    pub fn new(dt: f64, dt_min: f64, dt_max: f64) -> SimResult<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "initial dt must be positive and finite",
            });
        }
        if dt_min.is_nan() || dt_min <= 0.0 || !dt_max.is_finite() || dt_min > dt_max {
            return Err(SimError::InvalidArg {
                what: "dt bounds must satisfy 0 < dt_min <= dt_max",
            });
        }
        let mut stepper = Self {
            dt,
            dt_min,
            dt_max,
            safety: 0.9,
            growth_factor_max: 2.0,
            shrink_factor_min: 0.5,
            order: 2.0,
        };
        stepper.clamp_dt();
        Ok(stepper)
    }

    pub fn current_dt(&self) -> f64 {
        self.dt
    }

    /// Replace the current `dt`, clamped to the bounds.
    pub fn set_dt(&mut self, dt: f64) -> f64 {
        self.dt = dt;
        self.clamp_dt()
    }

    pub fn clamp_dt(&mut self) -> f64 {
        self.dt = self.dt.clamp(self.dt_min, self.dt_max);
        self.dt
    }

    /// Rescale `dt` from an error estimate and return the new value.
    ///
    /// A zero error grows `dt` by the maximum factor.
    pub fn update(&mut self, error: f64, tol: f64) -> SimResult<f64> {
        if tol.is_nan() || tol <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "tol must be positive",
            });
        }
        if error.is_nan() || error < 0.0 {
            return Err(SimError::InvalidArg {
                what: "error estimate must be non-negative",
            });
        }

        let factor = if error == 0.0 {
            self.growth_factor_max
        } else {
            let ratio = (tol / error).clamp(1e-12, 1e12);
            self.safety * ratio.powf(1.0 / self.order)
        };
        let factor = factor.clamp(self.shrink_factor_min, self.growth_factor_max);

        self.dt *= factor;
        Ok(self.clamp_dt())
    }
}
