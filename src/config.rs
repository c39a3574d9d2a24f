//! Simulation configuration.
//!
//! [`SimConfig`] collects every tunable constant. The defaults are the
//! canonical set; anything else can be loaded from JSON, with missing
//! sections and fields falling back to the defaults:
//!
//! ```
//! use leipnik::SimConfig;
//!
//! let config = SimConfig::from_json_str(r#"{ "population": { "max_particles": 500 } }"#).unwrap();
//! assert_eq!(config.population.max_particles, 500);
//! assert_eq!(config.population.tail_length, 50);
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;
use crate::error::ConfigError;
use crate::integrator::{ClampPolicy, IntegrationConfig};
use crate::params::SimulationParams;
use crate::population::PopulationConfig;

/// Highest spawn level.
pub const MAX_SPAWN_LEVEL: u32 = 5;

/// Periodic task settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between auto-spawn ticks.
    pub spawn_interval_secs: f64,
    /// Seconds between automatic resets.
    pub reset_interval_secs: f64,
    /// Quiet period before a viewport resize is applied, in milliseconds.
    pub resize_debounce_ms: u64,
    /// Whether auto-spawn is on at start.
    pub auto_spawn: bool,
    /// Whether auto-reset is on at start.
    pub auto_reset: bool,
    /// Starting spawn level, `1..=MAX_SPAWN_LEVEL`.
    pub spawn_level: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            spawn_interval_secs: 3.5,
            reset_interval_secs: 20.0,
            resize_debounce_ms: 100,
            auto_spawn: true,
            auto_reset: true,
            spawn_level: 1,
        }
    }
}

impl ScheduleConfig {
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_secs_f64(self.spawn_interval_secs)
    }

    pub fn reset_interval(&self) -> Duration {
        Duration::from_secs_f64(self.reset_interval_secs)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub integration: IntegrationConfig,
    pub population: PopulationConfig,
    pub schedule: ScheduleConfig,
    pub camera: CameraConfig,
    /// Parameters at start.
    pub params: SimulationParams,
    /// RNG seed. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Parse from a JSON string and validate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check every constraint the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let integration = &self.integration;
        positive("t_end", integration.t_end)?;
        if integration.steps == 0 {
            return Err(ConfigError::NonPositive("steps"));
        }
        policy("unstable", &integration.unstable)?;
        policy("stable", &integration.stable)?;

        let population = &self.population;
        if population.tail_length == 0 {
            return Err(ConfigError::ZeroTailLength);
        }
        if population.max_particles == 0 {
            return Err(ConfigError::ZeroMaxParticles);
        }
        if population.initial_count > population.max_particles {
            return Err(ConfigError::InitialCountAboveMax {
                initial: population.initial_count,
                max: population.max_particles,
            });
        }
        if population.spawn_min > population.spawn_max {
            return Err(ConfigError::InvertedSpawnRange {
                min: population.spawn_min,
                max: population.spawn_max,
            });
        }
        if population.spawn_max > population.max_particles {
            return Err(ConfigError::SpawnAboveMax {
                spawn_max: population.spawn_max,
                max: population.max_particles,
            });
        }

        let schedule = &self.schedule;
        positive("spawn_interval_secs", schedule.spawn_interval_secs)?;
        positive("reset_interval_secs", schedule.reset_interval_secs)?;
        if schedule.spawn_level == 0 || schedule.spawn_level > MAX_SPAWN_LEVEL {
            return Err(ConfigError::SpawnLevel(schedule.spawn_level));
        }

        let camera = &self.camera;
        if !(camera.position.is_finite() && camera.target.is_finite()) {
            return Err(ConfigError::NonFinite("camera position/target"));
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(camera.fov_degrees));
        }
        if !(camera.min_distance > 0.0 && camera.min_distance <= camera.max_distance)
            || !camera.max_distance.is_finite()
        {
            return Err(ConfigError::InvertedDistanceLimits {
                min: camera.min_distance,
                max: camera.max_distance,
            });
        }
        positive("near", camera.near)?;
        if !(camera.far > camera.near) || !camera.far.is_finite() {
            return Err(ConfigError::NonPositive("far - near"));
        }
        if !(camera.zoom_step > 1.0 && camera.zoom_step.is_finite()) {
            return Err(ConfigError::ZoomStep(camera.zoom_step));
        }
        positive("fit_padding", camera.fit_padding)?;
        if !camera.auto_rotate_speed.is_finite() {
            return Err(ConfigError::NonFinite("auto_rotate_speed"));
        }

        if !(self.params.alpha.is_finite() && self.params.beta.is_finite()) {
            return Err(ConfigError::NonFinite("params"));
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        Err(ConfigError::NonFinite(name))
    } else if value <= 0.0 {
        Err(ConfigError::NonPositive(name))
    } else {
        Ok(())
    }
}

fn policy(name: &'static str, policy: &ClampPolicy) -> Result<(), ConfigError> {
    positive(name, policy.clip)?;
    positive(name, policy.cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.integration.dt(), 0.0625);
        assert_eq!(config.population.max_particles, 200);
        assert_eq!(config.schedule.spawn_interval(), Duration::from_millis(3500));
        assert_eq!(config.schedule.reset_interval(), Duration::from_secs(20));
        assert_eq!(config.schedule.resize_debounce(), Duration::from_millis(100));
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = SimConfig::default();
        config.seed = Some(7);
        config.population.tail_length = 80;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SimConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json_str(r#"{ "schedule": { "auto_spawn": false } }"#).unwrap();
        assert!(!config.schedule.auto_spawn);
        assert_eq!(config.schedule.spawn_interval_secs, 3.5);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = SimConfig::default();
        config.population.tail_length = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTailLength)));

        let mut config = SimConfig::default();
        config.population.initial_count = 500;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InitialCountAboveMax { initial: 500, max: 200 })
        ));

        let mut config = SimConfig::default();
        config.population.spawn_min = 4;
        assert!(matches!(config.validate(), Err(ConfigError::InvertedSpawnRange { .. })));

        let mut config = SimConfig::default();
        config.camera.min_distance = 2000.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedDistanceLimits { .. })
        ));

        let mut config = SimConfig::default();
        config.camera.zoom_step = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::ZoomStep(_))));

        let mut config = SimConfig::default();
        config.integration.stable.cap = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::NonFinite("stable"))));
    }

    #[test]
    fn test_rejects_spawn_range_above_cap() {
        let result = SimConfig::from_json_str(
            r#"{ "population": { "spawn_max": 10000000000000000000 } }"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::SpawnAboveMax { max: 200, .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SimConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SimConfig::load("/nonexistent/leipnik.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
