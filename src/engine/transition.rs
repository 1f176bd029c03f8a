//! Transition interpolator.
//!
//! Tweens the live eye geometry from a captured start toward a resolved
//! target over a fixed duration.  At most one transition is in flight at
//! a time; requests arriving mid-transition are dropped by the engine,
//! never queued.

use super::geometry::EyePair;

/// One tweened geometry transition.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    active: bool,
    start: EyePair,
    target: EyePair,
    started_ms: u32,
    duration_ms: u32,
}

impl Transition {
    /// An idle (completed) transition resting at `geometry`.
    pub fn settled(geometry: EyePair) -> Self {
        Self {
            active: false,
            start: geometry,
            target: geometry,
            started_ms: 0,
            duration_ms: 1,
        }
    }

    /// Begin a new tween.  The caller must have checked `is_active()`;
    /// starting over a live transition would violate the single-flight
    /// invariant, so this debug-asserts against it.
    pub fn begin(&mut self, from: EyePair, to: EyePair, now_ms: u32, duration_ms: u32) {
        debug_assert!(!self.active, "transition already in flight");
        self.active = true;
        self.start = from;
        self.target = to;
        self.started_ms = now_ms;
        self.duration_ms = duration_ms.max(1);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Elapsed fraction in [0,1] at `now_ms`.
    pub fn fraction(&self, now_ms: u32) -> f32 {
        if !self.active {
            return 1.0;
        }
        let elapsed = now_ms.wrapping_sub(self.started_ms) as f32;
        (elapsed / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Advance to `now_ms` and return the live geometry.  Marks the
    /// transition complete (and returns the exact target) once the
    /// fraction reaches 1.0.
    pub fn advance(&mut self, now_ms: u32) -> EyePair {
        if !self.active {
            return self.target;
        }
        let fraction = self.fraction(now_ms);
        if fraction >= 1.0 {
            self.active = false;
            return self.target;
        }
        self.start.lerp(&self.target, fraction)
    }
}
