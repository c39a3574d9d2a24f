//! The live set of particles.
//!
//! Particles are kept in insertion order. That order drives three things:
//! eviction (oldest first), update order within a frame, and color (hue
//! comes from a monotonically increasing insertion index that is never
//! reused).
//!
//! # Capacity
//!
//! The population never exceeds its maximum. [`Population::spawn`] is
//! advisory: it adds as many particles as there is headroom for, possibly
//! none, and never evicts. Recycling at capacity is a decision of the
//! simulation loop, which calls [`Population::evict_oldest`] first.

use std::collections::VecDeque;

use glam::{DVec3, Vec3};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::color_for_index;
use crate::spawn::SpawnContext;
use crate::trail::Trail;

/// Population sizing and spawn settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Particles created when the simulation starts.
    pub initial_count: usize,
    /// Hard cap on live particles.
    pub max_particles: usize,
    /// Samples kept per trail.
    pub tail_length: usize,
    /// Smallest count added per spawn tick (before the spawn level).
    pub spawn_min: usize,
    /// Largest count added per spawn tick (before the spawn level).
    pub spawn_max: usize,
    /// Evict the oldest particles to make room when a spawn tick hits the cap.
    pub recycle_at_capacity: bool,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_count: 35,
            max_particles: 200,
            tail_length: 50,
            spawn_min: 1,
            spawn_max: 3,
            recycle_at_capacity: true,
        }
    }
}

/// One trajectory: its current state and recent history.
#[derive(Clone, Debug)]
pub struct Particle {
    id: u64,
    head: DVec3,
    trail: Trail,
    color: Vec3,
}

impl Particle {
    fn new(id: u64, head: DVec3, tail_length: usize) -> Self {
        Self {
            id,
            head,
            trail: Trail::new(tail_length, head),
            color: color_for_index(id),
        }
    }

    /// Insertion index. Unique for the population's lifetime.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current state.
    #[inline]
    pub fn head(&self) -> DVec3 {
        self.head
    }

    #[inline]
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// RGB color derived from the insertion index.
    #[inline]
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Move the head and record it in the trail.
    pub(crate) fn advance_to(&mut self, head: DVec3) {
        self.head = head;
        self.trail.push_and_shift(head);
    }

    /// Jump to `head` and refill the trail with it.
    pub(crate) fn reseed(&mut self, head: DVec3) {
        self.head = head;
        self.trail.reseed(head);
    }
}

/// Ordered, bounded collection of particles.
#[derive(Clone, Debug)]
pub struct Population {
    particles: VecDeque<Particle>,
    max_particles: usize,
    tail_length: usize,
    next_id: u64,
}

impl Population {
    /// Empty population with the given cap and trail length.
    pub fn new(max_particles: usize, tail_length: usize) -> Self {
        Self {
            particles: VecDeque::with_capacity(max_particles),
            max_particles,
            tail_length,
            next_id: 0,
        }
    }

    pub fn from_config(config: &PopulationConfig) -> Self {
        Self::new(config.max_particles, config.tail_length)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    #[inline]
    pub fn tail_length(&self) -> usize {
        self.tail_length
    }

    /// Room left before the cap.
    #[inline]
    pub fn headroom(&self) -> usize {
        self.max_particles.saturating_sub(self.particles.len())
    }

    /// Particles in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    /// Bootstrap the population. Only acts on an empty population; returns
    /// the number of particles created.
    pub fn seed(&mut self, initial_count: usize, ctx: &mut SpawnContext) -> usize {
        if !self.particles.is_empty() {
            debug!("seed ignored: population already holds {} particles", self.len());
            return 0;
        }
        self.spawn(initial_count, ctx)
    }

    /// Add up to `count` particles with random heads in `[-1, 1]^3`.
    ///
    /// Returns how many were actually added; zero at the cap.
    pub fn spawn(&mut self, count: usize, ctx: &mut SpawnContext) -> usize {
        let added = count.min(self.headroom());
        for _ in 0..added {
            let id = self.next_id;
            self.next_id += 1;
            self.particles
                .push_back(Particle::new(id, ctx.random_head(), self.tail_length));
        }
        if added > 0 {
            debug!("spawned {} particles ({} requested), population {}", added, count, self.len());
        }
        added
    }

    /// Remove the `count` oldest particles. Returns how many were removed.
    pub fn evict_oldest(&mut self, count: usize) -> usize {
        let removed = count.min(self.particles.len());
        self.particles.drain(..removed);
        if removed > 0 {
            debug!("evicted {} oldest particles, population {}", removed, self.len());
        }
        removed
    }

    /// Give every particle a new random head and refill its trail.
    ///
    /// Size, order, ids and colors are unchanged.
    pub fn reset(&mut self, ctx: &mut SpawnContext) {
        for p in self.particles.iter_mut() {
            p.reseed(ctx.random_head());
        }
        debug!("reseeded {} particles", self.len());
    }

    /// Drop every particle and release the buffers.
    pub fn clear(&mut self) {
        self.particles = VecDeque::new();
    }

    /// Axis-aligned bounds over every head and trail sample, or `None` when
    /// empty.
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        if self.particles.is_empty() {
            return None;
        }
        let init = (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY));
        let (lo, hi) = self.particles.iter().fold(init, |(lo, hi), p| {
            let (tlo, thi) = p.trail.bounds();
            (lo.min(tlo).min(p.head), hi.max(thi).max(p.head))
        });
        Some((lo, hi))
    }
}
