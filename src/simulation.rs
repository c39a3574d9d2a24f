//! Simulation builder and frame driver.
//!
//! [`Simulation`] collects configuration with method chaining; `build()`
//! validates it and returns a [`SimulationLoop`]. The host then calls
//! [`SimulationLoop::frame`] once per display refresh with a monotonically
//! increasing timestamp, and [`SimulationLoop::apply`] for every user
//! command between frames.
//!
//! # Scheduling
//!
//! Three schedules run on the caller's thread and are polled from `frame`:
//!
//! - the frame loop itself, armed by `start` and cancelled by `stop`
//! - auto-spawn, every `spawn_interval` (toggleable)
//! - auto-reset, every `reset_interval` (toggleable)
//!
//! Viewport resizes are debounced before they take effect. Stopping cancels
//! all pending work, and `teardown` additionally releases the particle
//! buffers; after teardown no call mutates anything.
//!
//! ```
//! use leipnik::Simulation;
//! use std::time::Duration;
//!
//! let mut sim = Simulation::new().with_seed(1).build().unwrap();
//! sim.start(Duration::ZERO);
//! let frame = sim.frame(Duration::from_millis(16)).unwrap();
//! assert_eq!(frame.len(), 35);
//! ```

use std::f64::consts::TAU;
use std::time::Duration;

use log::{debug, info, trace, warn};

use crate::camera::Camera;
use crate::config::{SimConfig, MAX_SPAWN_LEVEL};
use crate::error::ConfigError;
use crate::frame::{Frame, FrameSink, Viewport};
use crate::input::Command;
use crate::integrator::Integrator;
use crate::params::SimulationParams;
use crate::population::Population;
use crate::spawn::SpawnContext;
use crate::theme::Theme;
use crate::time::{Debounce, Interval};

/// A simulation builder.
///
/// Use method chaining to configure, then call `.build()`.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
    config: SimConfig,
}

impl Simulation {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the RNG for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the population cap.
    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.config.population.max_particles = max;
        self
    }

    /// Set the number of particles created at start.
    pub fn with_initial_count(mut self, count: usize) -> Self {
        self.config.population.initial_count = count;
        self
    }

    /// Set the number of samples per trail.
    pub fn with_tail_length(mut self, len: usize) -> Self {
        self.config.population.tail_length = len;
        self
    }

    /// Set the per-tick spawn count range (inclusive).
    pub fn with_spawn_range(mut self, min: usize, max: usize) -> Self {
        self.config.population.spawn_min = min;
        self.config.population.spawn_max = max;
        self
    }

    /// Set the starting field parameters.
    pub fn with_params(mut self, params: SimulationParams) -> Self {
        self.config.params = params;
        self
    }

    /// Enable or disable auto-spawn at start.
    pub fn with_auto_spawn(mut self, enabled: bool) -> Self {
        self.config.schedule.auto_spawn = enabled;
        self
    }

    /// Enable or disable auto-reset at start.
    pub fn with_auto_reset(mut self, enabled: bool) -> Self {
        self.config.schedule.auto_reset = enabled;
        self
    }

    /// Validate the configuration and create the loop.
    pub fn build(self) -> Result<SimulationLoop, ConfigError> {
        self.config.validate()?;
        Ok(SimulationLoop::new(self.config))
    }
}

/// Lifecycle of a [`SimulationLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Built, never started.
    Idle,
    Running,
    /// Stopped; can be started again.
    Stopped,
    /// Buffers released; permanently inert.
    TornDown,
}

/// The per-frame driver.
#[derive(Debug)]
pub struct SimulationLoop {
    config: SimConfig,
    params: SimulationParams,
    integrator: Integrator,
    population: Population,
    spawn_ctx: SpawnContext,
    camera: Camera,
    theme: Theme,
    viewport: Viewport,
    resize: Debounce<Viewport>,
    auto_spawn: Interval,
    auto_reset: Interval,
    auto_spawn_enabled: bool,
    auto_reset_enabled: bool,
    spawn_level: u32,
    state: LoopState,
    seeded: bool,
    rotation_y: f64,
    saturated: usize,
    frame_index: u64,
}

impl SimulationLoop {
    fn new(config: SimConfig) -> Self {
        let spawn_ctx = match config.seed {
            Some(seed) => SpawnContext::seeded(seed),
            None => SpawnContext::from_clock(),
        };
        let mut sim = Self {
            params: SimulationParams::default(),
            integrator: Integrator::new(config.integration),
            population: Population::from_config(&config.population),
            spawn_ctx,
            camera: Camera::from_config(&config.camera),
            theme: Theme::default(),
            viewport: Viewport::default(),
            resize: Debounce::new(config.schedule.resize_debounce()),
            auto_spawn: Interval::new(config.schedule.spawn_interval()),
            auto_reset: Interval::new(config.schedule.reset_interval()),
            auto_spawn_enabled: config.schedule.auto_spawn,
            auto_reset_enabled: config.schedule.auto_reset,
            spawn_level: config.schedule.spawn_level,
            state: LoopState::Idle,
            seeded: false,
            rotation_y: 0.0,
            saturated: 0,
            frame_index: 0,
            config,
        };
        sim.set_params(sim.config.params);
        sim
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    #[inline]
    fn is_torn_down(&self) -> bool {
        self.state == LoopState::TornDown
    }

    // ========== Lifecycle ==========

    /// Arm the frame loop and the periodic tasks. The first start seeds the
    /// population. Starting a running loop does nothing; a torn-down loop
    /// cannot be restarted.
    pub fn start(&mut self, now: Duration) {
        match self.state {
            LoopState::Running => return,
            LoopState::TornDown => {
                warn!("start ignored: simulation was torn down");
                return;
            }
            LoopState::Idle | LoopState::Stopped => {}
        }
        if !self.seeded {
            let initial = self.config.population.initial_count;
            self.population.seed(initial, &mut self.spawn_ctx);
            self.seeded = true;
        }
        if self.auto_spawn_enabled {
            self.auto_spawn.start(now);
        }
        if self.auto_reset_enabled {
            self.auto_reset.start(now);
        }
        self.state = LoopState::Running;
        info!(
            "simulation started with {} particles (max {}, tail {})",
            self.population.len(),
            self.population.max_particles(),
            self.population.tail_length()
        );
    }

    /// Cancel the frame loop, both periodic tasks and any pending resize.
    /// Safe to call repeatedly or before `start`.
    pub fn stop(&mut self) {
        self.auto_spawn.stop();
        self.auto_reset.stop();
        self.resize.cancel();
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
            info!("simulation stopped after {} frames", self.frame_index);
        }
    }

    /// Stop everything and release the particle buffers.
    pub fn teardown(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.stop();
        self.population.clear();
        self.state = LoopState::TornDown;
        info!("simulation torn down");
    }

    // ========== Frame ==========

    /// Advance one frame at time `now`.
    ///
    /// Runs due periodic tasks, applies a settled resize, steps every
    /// particle once with a snapshot of the current parameters and returns
    /// the frame for rendering. Returns `None` unless running.
    pub fn frame(&mut self, now: Duration) -> Option<Frame<'_>> {
        if !self.is_running() {
            return None;
        }

        if let Some(viewport) = self.resize.poll(now) {
            self.viewport = viewport;
            debug!("viewport resized to {}x{}", viewport.width, viewport.height);
        }
        if self.auto_reset.poll(now) {
            self.reset();
        }
        if self.auto_spawn.poll(now) {
            self.spawn_batch();
        }

        self.step();
        self.current_frame()
    }

    /// Advance one frame and hand it to `sink`. Returns whether a frame was
    /// drawn.
    pub fn run_frame<S: FrameSink + ?Sized>(&mut self, now: Duration, sink: &mut S) -> bool {
        match self.frame(now) {
            Some(frame) => {
                sink.draw(&frame);
                true
            }
            None => false,
        }
    }

    /// The last produced state as a frame, without stepping. `None` after
    /// teardown.
    pub fn current_frame(&self) -> Option<Frame<'_>> {
        if self.is_torn_down() {
            return None;
        }
        Some(Frame {
            population: &self.population,
            camera: &self.camera,
            viewport: self.viewport,
            overlay: self.theme.overlay(),
            params: self.params,
            rotation_y: self.rotation_y,
            saturated: self.saturated,
            index: self.frame_index,
        })
    }

    /// Step every particle once, in insertion order.
    fn step(&mut self) {
        let params = self.params;
        let dt = self.integrator.dt();
        let integrator = &self.integrator;

        let mut saturated = 0;
        for particle in self.population.iter_mut() {
            let step = integrator.step(particle.head(), &params, dt);
            particle.advance_to(step.state);
            saturated += step.saturated as usize;
        }
        self.saturated = saturated;

        self.rotation_y = (self.rotation_y + self.config.camera.auto_rotate_speed * dt).rem_euclid(TAU);
        self.frame_index += 1;
        trace!(
            "frame {}: {} particles, {} saturated",
            self.frame_index,
            self.population.len(),
            saturated
        );
    }

    // ========== Commands ==========

    /// Apply a user command received at time `now`. Ignored after teardown.
    pub fn apply(&mut self, command: Command, now: Duration) {
        if self.is_torn_down() {
            return;
        }
        match command {
            Command::Reset => self.reset(),
            Command::SpawnNow => {
                self.spawn_batch();
            }
            Command::ZoomIn => self.zoom(1.0 / self.config.camera.zoom_step),
            Command::ZoomOut => self.zoom(self.config.camera.zoom_step),
            Command::Fit => {
                self.fit();
            }
            Command::ToggleAutoSpawn => self.set_auto_spawn(!self.auto_spawn_enabled, now),
            Command::RaiseSpawnLevel => self.set_spawn_level(self.spawn_level + 1),
            Command::LowerSpawnLevel => self.set_spawn_level(self.spawn_level.saturating_sub(1)),
            Command::SetAlpha(alpha) => self.params.set_alpha(alpha),
            Command::SetBeta(beta) => self.params.set_beta(beta),
            Command::NudgeAlpha(delta) => self.params.set_alpha(self.params.alpha + delta),
            Command::NudgeBeta(delta) => self.params.set_beta(self.params.beta + delta),
            Command::SetStable(stable) => self.params.set_stable(stable),
            Command::ToggleStable => self.params.toggle_stable(),
            Command::SetDarkTheme(dark) => self.set_theme(Theme::from_dark(dark)),
            Command::Resize { width, height } => self.request_resize(width, height, now),
            Command::Orbit { d_yaw, d_pitch } => self.camera.orbit(d_yaw, d_pitch),
        }
    }

    // ========== Parameters ==========

    /// Snapshot of the current parameters.
    #[inline]
    pub fn params(&self) -> SimulationParams {
        self.params
    }

    /// Replace all parameters at once; alpha and beta are range-checked.
    pub fn set_params(&mut self, params: SimulationParams) {
        self.params.set_alpha(params.alpha);
        self.params.set_beta(params.beta);
        self.params.set_stable(params.stable);
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.params.set_alpha(alpha);
    }

    pub fn set_beta(&mut self, beta: f64) {
        self.params.set_beta(beta);
    }

    pub fn set_stable(&mut self, stable: bool) {
        self.params.set_stable(stable);
    }

    // ========== Population ==========

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Add up to `count` particles; never evicts. Returns how many were added.
    pub fn spawn(&mut self, count: usize) -> usize {
        if self.is_torn_down() {
            return 0;
        }
        self.population.spawn(count, &mut self.spawn_ctx)
    }

    /// Remove the `count` oldest particles. Returns how many were removed.
    pub fn evict_oldest(&mut self, count: usize) -> usize {
        self.population.evict_oldest(count)
    }

    /// Reseed every particle in place.
    pub fn reset(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.population.reset(&mut self.spawn_ctx);
    }

    /// Spawn a random batch scaled by the spawn level, evicting the oldest
    /// particles first when recycling at capacity. Returns how many were
    /// added.
    pub fn spawn_batch(&mut self) -> usize {
        if self.is_torn_down() {
            return 0;
        }
        let population = &self.config.population;
        let level = self.spawn_level as usize;
        let count = self
            .spawn_ctx
            .random_count(
                population.spawn_min.saturating_mul(level),
                population.spawn_max.saturating_mul(level),
            )
            .min(self.population.max_particles());

        if population.recycle_at_capacity {
            let shortfall = count.saturating_sub(self.population.headroom());
            self.population.evict_oldest(shortfall);
        }
        self.population.spawn(count, &mut self.spawn_ctx)
    }

    #[inline]
    pub fn spawn_level(&self) -> u32 {
        self.spawn_level
    }

    /// Set the spawn level, clamped to `1..=MAX_SPAWN_LEVEL`.
    pub fn set_spawn_level(&mut self, level: u32) {
        self.spawn_level = level.clamp(1, MAX_SPAWN_LEVEL);
        debug!("spawn level {}", self.spawn_level);
    }

    #[inline]
    pub fn auto_spawn_enabled(&self) -> bool {
        self.auto_spawn_enabled
    }

    /// Turn auto-spawn on or off. When turned on while running, the first
    /// tick is one interval after `now`.
    pub fn set_auto_spawn(&mut self, enabled: bool, now: Duration) {
        self.auto_spawn_enabled = enabled;
        if enabled && self.is_running() {
            self.auto_spawn.start(now);
        } else {
            self.auto_spawn.stop();
        }
        debug!("auto-spawn {}", if enabled { "on" } else { "off" });
    }

    #[inline]
    pub fn auto_reset_enabled(&self) -> bool {
        self.auto_reset_enabled
    }

    /// Turn auto-reset on or off.
    pub fn set_auto_reset(&mut self, enabled: bool, now: Duration) {
        self.auto_reset_enabled = enabled;
        if enabled && self.is_running() {
            self.auto_reset.start(now);
        } else {
            self.auto_reset.stop();
        }
        debug!("auto-reset {}", if enabled { "on" } else { "off" });
    }

    // ========== View ==========

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Scale the camera distance.
    pub fn zoom(&mut self, scale_factor: f64) {
        self.camera.zoom(scale_factor);
    }

    /// Frame every head and trail with the configured padding. Returns the
    /// new camera distance.
    pub fn fit(&mut self) -> f64 {
        self.fit_with_padding(self.config.camera.fit_padding)
    }

    /// Frame every head and trail with an explicit padding.
    pub fn fit_with_padding(&mut self, padding: f64) -> f64 {
        self.camera.fit(self.population.bounds(), padding)
    }

    #[inline]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            debug!("theme {:?}", theme);
        }
        self.theme = theme;
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Queue a viewport size; it takes effect once resizes have been quiet
    /// for the debounce period.
    pub fn request_resize(&mut self, width: u32, height: u32, now: Duration) {
        if self.is_torn_down() {
            return;
        }
        self.resize.push(Viewport::clamped(width, height), now);
    }
}
