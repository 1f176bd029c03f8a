//! Hunger meter with timed decay and NVS persistence.

use log::warn;

use crate::app::ports::HungerStore;
use crate::config::PetConfig;

/// Persistent 0-100 hunger meter.
///
/// Decay is driven by the engine tick; each elapsed interval removes a
/// fixed step and saturates at zero.  Every change is written through to
/// the store so the level survives reboots; a failed save only logs,
/// the in-memory level stays authoritative for the session.
#[derive(Debug)]
pub struct HungerMeter {
    level: u8,
    last_decay_ms: u32,
}

impl HungerMeter {
    pub const FULL: u8 = 100;

    pub fn new(initial_level: u8, now_ms: u32) -> Self {
        Self {
            level: initial_level.min(Self::FULL),
            last_decay_ms: now_ms,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_starving(&self) -> bool {
        self.level == 0
    }

    /// Apply at most one decay step.  Returns `true` when the level
    /// changed.  The interval anchor always advances on expiry, even at
    /// zero, so refills do not inherit a stale deadline.
    pub fn tick_decay(
        &mut self,
        now_ms: u32,
        config: &PetConfig,
        store: &mut impl HungerStore,
    ) -> bool {
        if now_ms.wrapping_sub(self.last_decay_ms) < config.hunger_decay_interval_ms {
            return false;
        }
        self.last_decay_ms = now_ms;

        if self.level == 0 {
            return false;
        }
        self.level = self.level.saturating_sub(config.hunger_decay_step_percent);
        if let Err(e) = store.save_hunger(self.level) {
            warn!("failed to persist hunger level: {e}");
        }
        true
    }

    /// Refill to full (feeding).  Returns the new level.
    pub fn refill(&mut self, store: &mut impl HungerStore) -> u8 {
        self.level = Self::FULL;
        if let Err(e) = store.save_hunger(self.level) {
            warn!("failed to persist hunger level: {e}");
        }
        self.level
    }
}
