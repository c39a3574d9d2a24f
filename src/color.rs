//! Per-particle colors.
//!
//! Each particle gets a hue from its insertion index, so colors are stable
//! for the particle's lifetime and never depend on which other particles
//! were spawned or evicted in between.

use glam::Vec3;

/// Fixed HSL saturation of trail colors.
pub const TRAIL_SATURATION: f32 = 0.85;
/// Fixed HSL lightness of trail colors.
pub const TRAIL_LIGHTNESS: f32 = 0.55;

/// Hue in `[0, 1)` for the particle with the given insertion index.
#[inline]
pub fn hue_for_index(index: u64) -> f32 {
    (index % 360) as f32 / 360.0
}

/// RGB trail color for the particle with the given insertion index.
pub fn color_for_index(index: u64) -> Vec3 {
    hsl_to_rgb(hue_for_index(index), TRAIL_SATURATION, TRAIL_LIGHTNESS)
}

/// Convert HSL (all components in `[0, 1]`) to linear RGB in `[0, 1]`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    if s <= 0.0 {
        return Vec3::splat(l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Vec3::new(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
