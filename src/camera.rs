//! Camera for viewing the attractor.
//!
//! The camera looks from `position` at `target`. Its distance to the target
//! is kept within `[min_distance, max_distance]` after every operation.

use glam::{DMat4, DVec3};
use log::debug;
use serde::{Deserialize, Serialize};

/// Pitch limit for [`Camera::orbit`], just short of the poles.
const MAX_PITCH: f64 = 1.5;

/// Camera placement and framing settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: DVec3,
    pub target: DVec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub near: f64,
    pub far: f64,
    /// Distance multiplier for one zoom-out press (zoom-in divides by it).
    pub zoom_step: f64,
    /// Padding factor used by the fit command.
    pub fit_padding: f64,
    /// Scene rotation about +Y, in radians per unit of simulated time.
    pub auto_rotate_speed: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 30.0),
            target: DVec3::ZERO,
            fov_degrees: 45.0,
            min_distance: 2.0,
            max_distance: 1500.0,
            near: 0.1,
            far: 2000.0,
            zoom_step: 1.2,
            fit_padding: 1.3,
            auto_rotate_speed: 0.2,
        }
    }
}

/// Perspective camera with distance limits.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    position: DVec3,
    target: DVec3,
    fov_radians: f64,
    min_distance: f64,
    max_distance: f64,
    near: f64,
    far: f64,
}

impl Camera {
    /// Create a camera, pulling `position` into the distance limits.
    ///
    /// Swapped limits are put back in order; a NaN limit falls back to the
    /// [`CameraConfig`] default.
    pub fn new(
        position: DVec3,
        target: DVec3,
        fov_radians: f64,
        min_distance: f64,
        max_distance: f64,
    ) -> Self {
        let defaults = CameraConfig::default();
        let min_distance = if min_distance.is_nan() { defaults.min_distance } else { min_distance };
        let max_distance = if max_distance.is_nan() { defaults.max_distance } else { max_distance };
        let (min_distance, max_distance) = if min_distance > max_distance {
            (max_distance, min_distance)
        } else {
            (min_distance, max_distance)
        };
        let mut camera = Self {
            position,
            target,
            fov_radians,
            min_distance,
            max_distance,
            near: 0.1,
            far: 2000.0,
        };
        camera.set_distance(camera.distance());
        camera
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(
            config.position,
            config.target,
            config.fov_degrees.to_radians(),
            config.min_distance,
            config.max_distance,
        );
        camera.near = config.near;
        camera.far = config.far;
        camera
    }

    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    #[inline]
    pub fn target(&self) -> DVec3 {
        self.target
    }

    /// Vertical field of view in radians.
    #[inline]
    pub fn fov_radians(&self) -> f64 {
        self.fov_radians
    }

    #[inline]
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    #[inline]
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Distance from the camera to its target.
    #[inline]
    pub fn distance(&self) -> f64 {
        (self.position - self.target).length()
    }

    /// Unit vector from target to camera. Falls back to +Z when the two
    /// coincide.
    pub fn direction(&self) -> DVec3 {
        (self.position - self.target)
            .try_normalize()
            .unwrap_or(DVec3::Z)
    }

    /// Place the camera `distance` from the target along its current
    /// direction, clamped to the limits.
    fn set_distance(&mut self, distance: f64) {
        let d = distance.clamp(self.min_distance, self.max_distance);
        self.position = self.target + self.direction() * d;
    }

    /// Multiply the distance by `scale_factor`, keeping the direction.
    ///
    /// Non-finite or non-positive factors are ignored.
    pub fn zoom(&mut self, scale_factor: f64) {
        if !(scale_factor.is_finite() && scale_factor > 0.0) {
            return;
        }
        self.set_distance(self.distance() * scale_factor);
        debug!("zoom x{:.3} -> distance {:.3}", scale_factor, self.distance());
    }

    /// Frame an axis-aligned box: recenter on its centroid and back off until
    /// a cone with half the vertical field of view contains
    /// `largest_dimension * padding`.
    ///
    /// `None` (nothing to frame) keeps the current target. Extents below 1
    /// are treated as 1. Returns the resulting distance.
    pub fn fit(&mut self, bounds: Option<(DVec3, DVec3)>, padding: f64) -> f64 {
        let direction = self.direction();
        let largest = match bounds {
            Some((lo, hi)) => {
                self.target = (lo + hi) * 0.5;
                (hi - lo).max_element()
            }
            None => 0.0,
        };
        let largest = if largest.is_finite() { largest.max(1.0) } else { 1.0 };

        let distance = largest * padding / (self.fov_radians * 0.5).tan();
        let d = distance.clamp(self.min_distance, self.max_distance);
        self.position = self.target + direction * d;
        debug!(
            "fit: largest dimension {:.3}, target {:?}, distance {:.3}",
            largest, self.target, d
        );
        d
    }

    /// Rotate the camera around the target, preserving distance.
    pub fn orbit(&mut self, d_yaw: f64, d_pitch: f64) {
        let offset = self.position - self.target;
        let distance = offset.length();
        let dir = self.direction();

        let yaw = dir.x.atan2(dir.z) + d_yaw;
        let pitch = (dir.y.clamp(-1.0, 1.0).asin() + d_pitch).clamp(-MAX_PITCH, MAX_PITCH);

        let x = distance * pitch.cos() * yaw.sin();
        let y = distance * pitch.sin();
        let z = distance * pitch.cos() * yaw.cos();
        self.position = self.target + DVec3::new(x, y, z);
        self.set_distance(distance);
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.target, DVec3::Y)
    }

    /// Perspective projection for the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f64) -> DMat4 {
        DMat4::perspective_rh(self.fov_radians, aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
