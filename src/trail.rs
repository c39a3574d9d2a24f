//! Fixed-length position history for one particle.
//!
//! A [`Trail`] always holds exactly `len()` samples, newest first. New
//! samples shift the history one slot toward the old end and the oldest
//! sample falls off. The shift is a flat `copy_within`, O(N) per push, which
//! keeps the samples contiguous so a renderer can draw the slice directly as
//! a polyline.

use glam::DVec3;

/// Newest-first ring of recent head positions.
#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
    points: Box<[DVec3]>,
}

impl Trail {
    /// Create a trail of `len` samples, all set to `origin`.
    ///
    /// A zero length is bumped to one so [`newest`](Self::newest) is always
    /// defined; configuration validation rejects zero before it gets here.
    pub fn new(len: usize, origin: DVec3) -> Self {
        Self {
            points: vec![origin; len.max(1)].into_boxed_slice(),
        }
    }

    /// Number of samples. Constant for the trail's lifetime.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shift every sample one slot older, dropping the oldest, and write
    /// `point` into the newest slot.
    pub fn push_and_shift(&mut self, point: DVec3) {
        let n = self.points.len();
        self.points.copy_within(0..n - 1, 1);
        self.points[0] = point;
    }

    /// Fill every slot with `point`.
    pub fn reseed(&mut self, point: DVec3) {
        self.points.fill(point);
    }

    /// Most recent sample.
    #[inline]
    pub fn newest(&self) -> DVec3 {
        self.points[0]
    }

    /// Oldest retained sample.
    #[inline]
    pub fn oldest(&self) -> DVec3 {
        self.points[self.points.len() - 1]
    }

    /// Samples, newest first.
    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Component-wise minimum and maximum over all samples.
    pub fn bounds(&self) -> (DVec3, DVec3) {
        self.points.iter().fold(
            (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_all_slots() {
        let origin = DVec3::new(0.25, -0.5, 1.0);
        let trail = Trail::new(8, origin);
        assert_eq!(trail.len(), 8);
        assert!(trail.points().iter().all(|p| *p == origin));
    }

    #[test]
    fn test_zero_length_is_bumped() {
        let trail = Trail::new(0, DVec3::ONE);
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.newest(), DVec3::ONE);
    }

    #[test]
    fn test_push_and_shift_order() {
        let mut trail = Trail::new(3, DVec3::ZERO);
        for i in 1..=4 {
            trail.push_and_shift(DVec3::splat(i as f64));
        }
        assert_eq!(
            trail.points(),
            &[DVec3::splat(4.0), DVec3::splat(3.0), DVec3::splat(2.0)]
        );
        assert_eq!(trail.oldest(), DVec3::splat(2.0));
    }

    #[test]
    fn test_length_and_newest_invariant() {
        let mut trail = Trail::new(50, DVec3::ZERO);
        for i in 0..500 {
            let p = DVec3::new(i as f64, -(i as f64), 0.5 * i as f64);
            trail.push_and_shift(p);
            assert_eq!(trail.len(), 50);
            assert_eq!(trail.newest(), p);
        }
    }

    #[test]
    fn test_single_slot_trail() {
        let mut trail = Trail::new(1, DVec3::ZERO);
        trail.push_and_shift(DVec3::X);
        assert_eq!(trail.points(), &[DVec3::X]);
    }

    #[test]
    fn test_reseed_overwrites_history() {
        let mut trail = Trail::new(4, DVec3::ZERO);
        trail.push_and_shift(DVec3::X);
        trail.push_and_shift(DVec3::Y);
        trail.reseed(DVec3::Z);
        assert!(trail.points().iter().all(|p| *p == DVec3::Z));
    }

    #[test]
    fn test_bounds() {
        let mut trail = Trail::new(3, DVec3::ZERO);
        trail.push_and_shift(DVec3::new(2.0, -1.0, 0.0));
        trail.push_and_shift(DVec3::new(-3.0, 4.0, 1.0));
        let (lo, hi) = trail.bounds();
        assert_eq!(lo, DVec3::new(-3.0, -1.0, 0.0));
        assert_eq!(hi, DVec3::new(2.0, 4.0, 1.0));
    }
}
