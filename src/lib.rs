//! # leipnik - Leipnik–Newton attractor trails
//!
//! A real-time particle-trail simulation of the Leipnik–Newton system:
//!
//! ```text
//! dx/dt = -alpha*x + y + 10*y*z
//! dy/dt = -x - 0.4*y + 5*x*z
//! dz/dt =  beta*z - 5*x*y
//! ```
//!
//! A bounded population of particles is advanced each frame with RK4. Every
//! particle drags a fixed-length trail of its recent positions, which is
//! what gets drawn. The crate owns the simulation and hands each frame to a
//! renderer through [`FrameSink`]; it draws nothing itself.
//!
//! ## Quick Start
//!
//! ```
//! use leipnik::prelude::*;
//! use std::time::Duration;
//!
//! let mut sim = Simulation::new()
//!     .with_seed(42)
//!     .with_max_particles(100)
//!     .build()
//!     .unwrap();
//!
//! sim.start(Duration::ZERO);
//! sim.apply(Command::SetAlpha(0.4), Duration::ZERO);
//!
//! let frame = sim.frame(Duration::from_millis(16)).unwrap();
//! let batch = frame.line_batch();
//! assert_eq!(batch.lines.len(), 35);
//! ```
//!
//! ## Core Concepts
//!
//! ### Stepping
//!
//! Each frame advances every particle by one visual step of
//! `dt = t_end / steps`. After every RK4 sub-step the state is clamped
//! component-wise and its norm capped ([`ClampPolicy`]); the stable mode uses
//! six sub-steps and tighter bounds. The clamp keeps trajectories finite no
//! matter which parameters are chosen.
//!
//! ### Population
//!
//! Particles live in insertion order. Spawning is capped at the maximum and
//! never evicts by itself; the loop's auto-spawn recycles the oldest
//! particles when it runs into the cap. Reset moves every particle to a new
//! random head but keeps ids and colors.
//!
//! ### Scheduling
//!
//! Auto-spawn, auto-reset and resize debouncing are cooperative: they are
//! polled from [`SimulationLoop::frame`] with the caller's timestamp. Nothing
//! spawns a thread.
//!
//! ## Configuration
//!
//! [`SimConfig`] holds every constant and round-trips through JSON.
//!
//! ## Logging
//!
//! Lifecycle events are logged at `info`, population changes at `debug` and
//! per-frame stats at `trace` through the `log` facade. The `leipnik`
//! binary installs `env_logger`; library users pick their own logger.

pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod frame;
pub mod input;
pub mod integrator;
pub mod params;
pub mod population;
mod simulation;
mod spawn;
pub mod theme;
pub mod time;
pub mod trail;

pub use bytemuck;
pub use glam::{DVec3, Vec3, Vec4};

pub use camera::{Camera, CameraConfig};
pub use config::{ScheduleConfig, SimConfig, MAX_SPAWN_LEVEL};
pub use error::ConfigError;
pub use frame::{Frame, FrameSink, LineBatch, TrailVertex, TrailView, Viewport};
pub use input::{Command, Input};
pub use integrator::{ClampPolicy, IntegrationConfig, Integrator, Step};
pub use params::SimulationParams;
pub use population::{Particle, Population, PopulationConfig};
pub use simulation::{LoopState, Simulation, SimulationLoop};
pub use spawn::SpawnContext;
pub use theme::{OverlayStyle, Theme};
pub use trail::Trail;

/// Convenient re-exports for common usage.
///
/// ```
/// use leipnik::prelude::*;
/// ```
///
/// This imports the builder and loop, commands, frames and their sink, the
/// parameter and config types, and the glam vector types.
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::config::SimConfig;
    pub use crate::frame::{Frame, FrameSink, LineBatch, TrailVertex, Viewport};
    pub use crate::input::{Command, Input};
    pub use crate::params::SimulationParams;
    pub use crate::simulation::{LoopState, Simulation, SimulationLoop};
    pub use crate::spawn::SpawnContext;
    pub use crate::theme::Theme;
    pub use crate::time::Time;
    pub use crate::{DVec3, Vec3, Vec4};
}
