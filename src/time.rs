//! Frame clock and cooperative timers.
//!
//! Everything here is driven by explicit timestamps passed in by the caller.
//! Nothing spawns threads or sleeps: the simulation is single-threaded and
//! advances only when the host delivers a frame, so periodic work
//! ([`Interval`]) and delayed work ([`Debounce`]) are polled from the frame
//! callback.
//!
//! # Example
//!
//! ```
//! use leipnik::time::Interval;
//! use std::time::Duration;
//!
//! let mut spawn = Interval::new(Duration::from_millis(3500));
//! spawn.start(Duration::ZERO);
//! assert!(!spawn.poll(Duration::from_secs(3)));
//! assert!(spawn.poll(Duration::from_secs(4)));
//! ```

use std::time::{Duration, Instant};

/// Frame clock for a host loop.
///
/// Produces the monotonically increasing timestamp handed to
/// [`SimulationLoop::frame`](crate::SimulationLoop::frame). A fixed clock
/// ignores wall time, which keeps headless runs deterministic.
#[derive(Debug)]
pub struct Time {
    origin: Instant,
    last_tick: Instant,
    elapsed: Duration,
    delta: Duration,
    ticks: u64,
    step: Option<Duration>,
}

impl Time {
    /// Wall-clock time starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            last_tick: now,
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            ticks: 0,
            step: None,
        }
    }

    /// Clock that advances by exactly `step` per update.
    pub fn fixed(step: Duration) -> Self {
        Self {
            step: Some(step),
            ..Self::new()
        }
    }

    /// Advance one frame and return the new timestamp.
    pub fn update(&mut self) -> Duration {
        let now = Instant::now();
        if let Some(step) = self.step {
            self.delta = step;
            self.elapsed += step;
        } else {
            self.delta = now - self.last_tick;
            self.elapsed = now - self.origin;
        }
        self.last_tick = now;
        self.ticks += 1;
        self.elapsed
    }

    /// Timestamp of the last update.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Number of updates so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.ticks
    }

    /// Frames per second implied by the last delta.
    pub fn fps(&self) -> f32 {
        let secs = self.delta.as_secs_f32();
        if secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// A cancellable periodic task.
///
/// An interval that falls behind fires once and re-arms a full period after
/// the poll that fired it, so a stalled host never sees a burst of catch-up
/// ticks.
#[derive(Clone, Debug)]
pub struct Interval {
    period: Duration,
    next_due: Option<Duration>,
}

impl Interval {
    /// Stopped interval with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the interval; the first tick is due one period after `now`.
    /// Starting a running interval leaves its schedule alone.
    pub fn start(&mut self, now: Duration) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.period);
        }
    }

    /// Cancel pending ticks. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// When the next tick is due, if running.
    #[inline]
    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// Returns `true` if a tick is due at `now`, and re-arms.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

/// Holds the latest value until it has been quiet for `delay`.
#[derive(Clone, Debug)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, Duration)>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record `value` at `now`, replacing any pending value and restarting
    /// the quiet period.
    pub fn push(&mut self, value: T, now: Duration) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let ready = matches!(&self.pending, Some((_, due)) if now >= *due);
        if ready {
            self.pending.take().map(|(v, _)| v)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
