//! System configuration parameters
//!
//! All tunable parameters for the Blinky animation engine. The defaults are
//! the authored values that define the pet's personality; they can be
//! overridden via NVS.

use serde::{Deserialize, Serialize};

/// Which autonomy features this build variant carries.
///
/// The full wearable enables both; the reduced "display-only" variant
/// (no web control panel) runs with both disabled and behaves as a pure
/// autonomous animation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Hunger decays over time and forces the distress state at 0%.
    pub hunger_override_enabled: bool,
    /// External commands may pin the displayed state (manual mode).
    pub manual_control_enabled: bool,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            hunger_override_enabled: true,
            manual_control_enabled: true,
        }
    }
}

/// Core animation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetConfig {
    // --- Transitions ---
    /// Duration of a tweened transition between eye states (ms).
    pub transition_duration_ms: u32,

    // --- Blinking ---
    /// Total duration of one full blink cycle (ms); each of the four
    /// phases holds for a quarter of this.
    pub blink_duration_ms: u32,
    /// Minimum idle time between blink attempts (ms).
    pub min_blink_interval_ms: u32,
    /// Maximum idle time between blink attempts (ms, exclusive).
    pub max_blink_interval_ms: u32,
    /// Chance (0-100) that an elapsed blink interval actually blinks.
    pub blink_probability_percent: u8,

    // --- Autonomous state selection ---
    /// Chance (0-100) of returning to Neutral when a dwell expires.
    pub neutral_return_probability_percent: u8,
    /// Chance (0-100) of drawing from the emotion category (vs directional).
    pub emotion_category_probability_percent: u8,
    /// Dwell time bounds while resting in Neutral (ms).
    pub min_neutral_dwell_ms: u32,
    pub max_neutral_dwell_ms: u32,
    /// Dwell time bounds for any non-Neutral state (ms).
    pub min_emotion_dwell_ms: u32,
    pub max_emotion_dwell_ms: u32,

    // --- Hunger ---
    /// Interval between hunger decay steps (ms).
    pub hunger_decay_interval_ms: u32,
    /// Hunger removed per decay step (percentage points).
    pub hunger_decay_step_percent: u8,
    /// How long the post-feed Happy state is displayed (ms).
    pub happy_duration_ms: u32,

    // --- Timing ---
    /// Frame pacing delay at the bottom of the control loop (ms).
    pub frame_interval_ms: u32,
    /// Interval between WiFi reconnect checks while disconnected (ms).
    pub network_check_interval_ms: u32,

    // --- Variant ---
    pub variant: VariantConfig,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            // Transitions
            transition_duration_ms: 150,

            // Blinking
            blink_duration_ms: 220,
            min_blink_interval_ms: 2000,
            max_blink_interval_ms: 5000,
            blink_probability_percent: 70,

            // Selection — strongly biased toward the neutral resting state
            neutral_return_probability_percent: 70,
            emotion_category_probability_percent: 30,
            min_neutral_dwell_ms: 4000,
            max_neutral_dwell_ms: 8000,
            min_emotion_dwell_ms: 1200,
            max_emotion_dwell_ms: 3000,

            // Hunger
            hunger_decay_interval_ms: 5000,
            hunger_decay_step_percent: 5,
            happy_duration_ms: 3000,

            // Timing
            frame_interval_ms: 16, // ~60 fps
            network_check_interval_ms: 2000,

            variant: VariantConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = PetConfig::default();
        assert!(c.transition_duration_ms > 0);
        assert!(c.blink_duration_ms > 0);
        assert!(c.min_blink_interval_ms < c.max_blink_interval_ms);
        assert!(c.min_neutral_dwell_ms < c.max_neutral_dwell_ms);
        assert!(c.min_emotion_dwell_ms < c.max_emotion_dwell_ms);
        assert!(c.blink_probability_percent <= 100);
        assert!(c.neutral_return_probability_percent <= 100);
        assert!(c.emotion_category_probability_percent <= 100);
        assert!(c.hunger_decay_step_percent > 0);
        assert!(c.hunger_decay_interval_ms > 0);
    }

    #[test]
    fn transition_shorter_than_min_dwell() {
        // A transition must complete well within the shortest dwell so a
        // dwell expiry never lands mid-transition in the common case.
        let c = PetConfig::default();
        assert!(c.transition_duration_ms < c.min_emotion_dwell_ms);
    }

    #[test]
    fn serde_roundtrip() {
        let c = PetConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: PetConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.transition_duration_ms, c2.transition_duration_ms);
        assert_eq!(c.blink_probability_percent, c2.blink_probability_percent);
        assert_eq!(c.max_neutral_dwell_ms, c2.max_neutral_dwell_ms);
        assert_eq!(
            c.variant.hunger_override_enabled,
            c2.variant.hunger_override_enabled
        );
    }

    #[test]
    fn postcard_roundtrip() {
        let c = PetConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: PetConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.happy_duration_ms, c2.happy_duration_ms);
        assert_eq!(c.hunger_decay_step_percent, c2.hunger_decay_step_percent);
    }
}
