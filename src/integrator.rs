//! Fixed-step RK4 integration with sub-stepping and a clamp-and-cap policy.
//!
//! The Leipnik–Newton system is chaotic and unbounded for many parameter
//! choices. Every sub-step is followed by [`ClampPolicy::apply`]:
//!
//! 1. each coordinate is clamped to `[-clip, clip]`
//! 2. if the norm still exceeds `cap`, the vector is rescaled to norm `cap`
//!
//! Stable mode uses six sub-steps and tighter bounds to damp excursions.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::field::deriv_vec;
use crate::params::SimulationParams;

/// Sub-steps per visual step in stable mode.
pub const STABLE_SUBSTEPS: u32 = 6;

/// Component clamp and norm cap applied after every sub-step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClampPolicy {
    /// Per-coordinate bound.
    pub clip: f64,
    /// Euclidean norm bound.
    pub cap: f64,
}

impl ClampPolicy {
    /// Bounds used when stable mode is off.
    pub const fn unstable() -> Self {
        Self {
            clip: 10_000.0,
            cap: 5_000.0,
        }
    }

    /// Tighter bounds used in stable mode.
    pub const fn stable() -> Self {
        Self {
            clip: 5_000.0,
            cap: 2_000.0,
        }
    }

    /// Clamp `p` into bounds.
    ///
    /// Returns the bounded vector and whether anything had to change. NaN
    /// coordinates are treated as `0.0` so the result is always finite.
    pub fn apply(&self, p: DVec3) -> (DVec3, bool) {
        let mut touched = false;
        let mut bound = |v: f64| {
            let v = if v.is_nan() {
                touched = true;
                0.0
            } else {
                v
            };
            let c = v.clamp(-self.clip, self.clip);
            if c != v {
                touched = true;
            }
            c
        };
        let clamped = DVec3::new(bound(p.x), bound(p.y), bound(p.z));

        let norm = clamped.length();
        if norm > self.cap {
            (clamped * (self.cap / norm), true)
        } else {
            (clamped, touched)
        }
    }
}

/// Integrator constants for both modes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Simulated time covered by `steps` visual steps.
    pub t_end: f64,
    /// Visual steps per `t_end`. One visual step happens per frame.
    pub steps: u32,
    /// Bounds when stable mode is off.
    pub unstable: ClampPolicy,
    /// Bounds when stable mode is on.
    pub stable: ClampPolicy,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            t_end: 50.0,
            steps: 800,
            unstable: ClampPolicy::unstable(),
            stable: ClampPolicy::stable(),
        }
    }
}

impl IntegrationConfig {
    /// Time step of one visual step (`t_end / steps`).
    pub fn dt(&self) -> f64 {
        self.t_end / self.steps as f64
    }
}

/// Result of one visual step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// New state.
    pub state: DVec3,
    /// Whether the clamp policy altered the state during any sub-step.
    pub saturated: bool,
}

/// RK4 stepper for the Leipnik–Newton field.
#[derive(Clone, Copy, Debug)]
pub struct Integrator {
    config: IntegrationConfig,
}

impl Integrator {
    pub fn new(config: IntegrationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Time step of one visual step.
    pub fn dt(&self) -> f64 {
        self.config.dt()
    }

    /// Clamp policy selected by the `stable` flag.
    pub fn policy(&self, stable: bool) -> ClampPolicy {
        if stable {
            self.config.stable
        } else {
            self.config.unstable
        }
    }

    /// Advance `state` by one visual step of length `dt`.
    pub fn step(&self, state: DVec3, params: &SimulationParams, dt: f64) -> Step {
        let sub = if params.stable { STABLE_SUBSTEPS } else { 1 };
        let policy = self.policy(params.stable);
        let h = dt / sub as f64;

        let mut state = state;
        let mut saturated = false;
        for _ in 0..sub {
            let next = rk4_step(state, h, params.alpha, params.beta);
            let (bounded, touched) = policy.apply(next);
            state = bounded;
            saturated |= touched;
        }
        Step { state, saturated }
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(IntegrationConfig::default())
    }
}

/// One classic RK4 step of length `h`, without bounding.
pub fn rk4_step(p: DVec3, h: f64, alpha: f64, beta: f64) -> DVec3 {
    let k1 = deriv_vec(p, alpha, beta);
    let k2 = deriv_vec(p + 0.5 * h * k1, alpha, beta);
    let k3 = deriv_vec(p + 0.5 * h * k2, alpha, beta);
    let k4 = deriv_vec(p + h * k3, alpha, beta);
    p + (h / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
}
