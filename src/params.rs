//! Runtime parameters read by the integrator once per frame.
//!
//! [`SimulationParams`] is a small `Copy` value. The simulation loop owns it
//! and hands the integrator a snapshot at the start of each frame, so setters
//! called between frames never produce a half-applied update.

use log::warn;
use serde::{Deserialize, Serialize};

/// Lower bound of the alpha/beta controls.
pub const PARAM_MIN: f64 = 0.0;
/// Upper bound of the alpha/beta controls.
pub const PARAM_MAX: f64 = 1.5;
/// Resolution of the alpha/beta controls.
pub const PARAM_STEP: f64 = 0.001;

/// Field parameters and the stable-mode toggle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub alpha: f64,
    pub beta: f64,
    pub stable: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
            stable: false,
        }
    }
}

impl SimulationParams {
    /// Set alpha, clamped to the control range and snapped to its step.
    ///
    /// Non-finite values are ignored.
    pub fn set_alpha(&mut self, alpha: f64) {
        if let Some(v) = sanitize("alpha", alpha) {
            self.alpha = v;
        }
    }

    /// Set beta, clamped to the control range and snapped to its step.
    ///
    /// Non-finite values are ignored.
    pub fn set_beta(&mut self, beta: f64) {
        if let Some(v) = sanitize("beta", beta) {
            self.beta = v;
        }
    }

    pub fn set_stable(&mut self, stable: bool) {
        self.stable = stable;
    }

    pub fn toggle_stable(&mut self) {
        self.stable = !self.stable;
    }
}

fn sanitize(name: &str, value: f64) -> Option<f64> {
    if !value.is_finite() {
        warn!("ignoring non-finite {name} = {value}");
        return None;
    }
    let clamped = value.clamp(PARAM_MIN, PARAM_MAX);
    if clamped != value {
        warn!("{name} = {value} outside [{PARAM_MIN}, {PARAM_MAX}], clamped to {clamped}");
    }
    let steps_per_unit = 1.0 / PARAM_STEP;
    Some((clamped * steps_per_unit).round() / steps_per_unit)
}
