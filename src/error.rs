//! Error types.
//!
//! Only configuration can fail. Once a simulation is built, every operation
//! either succeeds by construction (the integrator clamps, spawning saturates
//! at the cap) or is a no-op.

use std::fmt;

/// Errors from building, loading or validating a [`SimConfig`](crate::SimConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Trails must hold at least one sample.
    ZeroTailLength,
    /// The population cap must be at least one.
    ZeroMaxParticles,
    /// More initial particles than the cap allows.
    InitialCountAboveMax { initial: usize, max: usize },
    /// `spawn_min` greater than `spawn_max`.
    InvertedSpawnRange { min: usize, max: usize },
    /// `spawn_max` greater than `max_particles`.
    SpawnAboveMax { spawn_max: usize, max: usize },
    /// A duration or time quantity that must be positive is not.
    NonPositive(&'static str),
    /// A quantity that must be finite is not.
    NonFinite(&'static str),
    /// `min_distance` above `max_distance`.
    InvertedDistanceLimits { min: f64, max: f64 },
    /// Field of view outside `(0, 180)` degrees.
    FieldOfView(f64),
    /// Zoom step must be greater than one.
    ZoomStep(f64),
    /// Spawn level outside `1..=MAX_SPAWN_LEVEL`.
    SpawnLevel(u32),
    /// Failed to read or write a config file.
    Io(std::io::Error),
    /// Failed to parse or serialize JSON.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTailLength => write!(f, "tail_length must be at least 1"),
            ConfigError::ZeroMaxParticles => write!(f, "max_particles must be at least 1"),
            ConfigError::InitialCountAboveMax { initial, max } => write!(
                f,
                "initial_count ({}) exceeds max_particles ({})",
                initial, max
            ),
            ConfigError::InvertedSpawnRange { min, max } => {
                write!(f, "spawn_min ({}) is greater than spawn_max ({})", min, max)
            }
            ConfigError::SpawnAboveMax { spawn_max, max } => {
                write!(f, "spawn_max ({}) exceeds max_particles ({})", spawn_max, max)
            }
            ConfigError::NonPositive(name) => write!(f, "{} must be positive", name),
            ConfigError::NonFinite(name) => write!(f, "{} must be finite", name),
            ConfigError::InvertedDistanceLimits { min, max } => write!(
                f,
                "camera min_distance ({}) must be positive and not above max_distance ({})",
                min, max
            ),
            ConfigError::FieldOfView(deg) => {
                write!(f, "field of view {} degrees is outside (0, 180)", deg)
            }
            ConfigError::ZoomStep(step) => write!(f, "zoom_step {} must be greater than 1", step),
            ConfigError::SpawnLevel(level) => write!(
                f,
                "spawn_level {} is outside 1..={}",
                level,
                crate::config::MAX_SPAWN_LEVEL
            ),
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Json(e) => write!(f, "Invalid config JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
