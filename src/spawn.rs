//! Random source for spawning and reseeding particles.

use glam::DVec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Half-size of the cube new heads are drawn from (`[-1, 1]` per axis).
pub const SPAWN_HALF_SIZE: f64 = 1.0;

/// Random helpers used whenever the population needs fresh heads.
///
/// ```
/// use leipnik::SpawnContext;
///
/// let mut ctx = SpawnContext::seeded(42);
/// let p = ctx.random_head();
/// assert!(p.abs().max_element() <= 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Context with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Context seeded from the system clock, different each run.
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed)
    }

    /// Random point inside a cube of given half-size, centered at origin.
    pub fn random_in_cube(&mut self, half_size: f64) -> DVec3 {
        DVec3::new(
            self.rng.gen_range(-half_size..=half_size),
            self.rng.gen_range(-half_size..=half_size),
            self.rng.gen_range(-half_size..=half_size),
        )
    }

    /// Random starting head in `[-1, 1]^3`.
    #[inline]
    pub fn random_head(&mut self) -> DVec3 {
        self.random_in_cube(SPAWN_HALF_SIZE)
    }

    /// Random count in `[min, max]` inclusive. Returns `min` when the range
    /// is inverted.
    pub fn random_count(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

impl Default for SpawnContext {
    fn default() -> Self {
        Self::from_clock()
    }
}
