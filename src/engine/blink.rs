//! Blink sub-machine.
//!
//! A four-phase cyclic machine, independent of emotional transitions:
//!
//! ```text
//! Open ──[interval elapsed, 70% coin]──▶ HalfClosing ──▶ Closed
//!   ▲                                                      │
//!   └────────────── HalfOpening ◀──────────────────────────┘
//! ```
//!
//! While Open, the next attempt time is drawn uniformly from the
//! configured interval; a missed coin flip merely redraws the interval,
//! which yields a geometric-like retry distribution rather than a fixed
//! blink period.  Once blinking, each phase holds for exactly a quarter
//! of the total blink duration.

use rand::Rng;

use crate::config::PetConfig;

/// Phase of the blink cycle.  Never skips a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPhase {
    Open,
    HalfClosing,
    Closed,
    HalfOpening,
}

impl BlinkPhase {
    /// Multiplier applied to the rendered eye height.
    pub fn openness(self) -> f32 {
        match self {
            Self::Open => 1.0,
            Self::HalfClosing | Self::HalfOpening => 0.5,
            Self::Closed => 0.1,
        }
    }
}

/// Timer-driven blink machine.  Polled once per frame.
#[derive(Debug)]
pub struct Blinker {
    phase: BlinkPhase,
    /// Monotonic ms at which the current phase (or open interval) began.
    phase_started_ms: u32,
    /// Idle time before the next blink attempt; redrawn per attempt.
    interval_ms: u32,
}

impl Blinker {
    /// New blinker in the Open phase.
    ///
    /// The start timestamp is back-dated by 1000-2000 ms so the pet
    /// blinks soon after boot instead of staring for a full interval.
    pub fn new(now_ms: u32, rng: &mut impl Rng, config: &PetConfig) -> Self {
        let kick = rng.gen_range(1000..2000);
        Self {
            phase: BlinkPhase::Open,
            phase_started_ms: now_ms.wrapping_sub(kick),
            interval_ms: Self::draw_interval(rng, config),
        }
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Current openness factor for the rendered eye height.
    pub fn openness(&self) -> f32 {
        self.phase.openness()
    }

    pub fn is_blinking(&self) -> bool {
        self.phase != BlinkPhase::Open
    }

    /// Advance the machine by one frame.
    pub fn tick(&mut self, now_ms: u32, rng: &mut impl Rng, config: &PetConfig) {
        match self.phase {
            BlinkPhase::Open => {
                if now_ms.wrapping_sub(self.phase_started_ms) > self.interval_ms {
                    if rng.gen_range(0..100) < u32::from(config.blink_probability_percent) {
                        self.phase = BlinkPhase::HalfClosing;
                    } else {
                        // No blink this cycle; rearm with a fresh interval.
                        self.interval_ms = Self::draw_interval(rng, config);
                    }
                    self.phase_started_ms = now_ms;
                }
            }
            _ => {
                let phase_ms = config.blink_duration_ms / 4;
                if now_ms.wrapping_sub(self.phase_started_ms) > phase_ms {
                    self.phase = match self.phase {
                        BlinkPhase::HalfClosing => BlinkPhase::Closed,
                        BlinkPhase::Closed => BlinkPhase::HalfOpening,
                        BlinkPhase::HalfOpening | BlinkPhase::Open => {
                            self.interval_ms = Self::draw_interval(rng, config);
                            BlinkPhase::Open
                        }
                    };
                    self.phase_started_ms = now_ms;
                }
            }
        }
    }

    fn draw_interval(rng: &mut impl Rng, config: &PetConfig) -> u32 {
        rng.gen_range(config.min_blink_interval_ms..config.max_blink_interval_ms)
    }
}
