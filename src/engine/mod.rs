//! Animation engine core.
//!
//! Platform-free and fully deterministic given an RNG seed and a stream
//! of timestamps, which is what makes the whole behavior testable on the
//! host.  The engine owns four cooperating pieces:
//!
//! - the [`selector`] driving autonomous mood changes,
//! - the [`transition`] tween moving the geometry between states,
//! - the [`blink`] sub-machine scaling eye height independently,
//! - the [`hunger`] meter with its distress override.
//!
//! One [`tick`](AnimationEngine::tick) per frame applies them in a fixed
//! priority order; [`frame`](AnimationEngine::frame) then snapshots what
//! the renderer needs.

pub mod blink;
pub mod geometry;
pub mod hunger;
pub mod selector;
pub mod state;
pub mod transition;

use rand::Rng;

use crate::app::ports::HungerStore;
use crate::config::PetConfig;
use crate::error::CommandError;

use self::blink::Blinker;
use self::geometry::{resolve, EyeGeometry, EyePair};
use self::hunger::HungerMeter;
use self::selector::StateSelector;
use self::state::EyeState;
use self::transition::Transition;

/// Renderer-facing snapshot of one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub left: EyeGeometry,
    pub right: EyeGeometry,
    /// Blink height multiplier, applied by the renderer.
    pub openness: f32,
    /// Draw the celebration stars this frame.
    pub stars: bool,
    /// Timestamp of the snapshot; drives the star twinkle.
    pub now_ms: u32,
}

/// The pet's complete animation state machine.
pub struct AnimationEngine {
    config: PetConfig,
    /// Committed state; only changes when a transition completes.
    current_state: EyeState,
    /// Where the in-flight (or last) transition is heading.
    target_state: EyeState,
    /// Live geometry, updated every tick.
    geometry: EyePair,
    transition: Transition,
    blinker: Blinker,
    selector: StateSelector,
    hunger: HungerMeter,
    manual_mode: bool,
    /// Armed when Happy is entered; holds the arming timestamp.
    happy_timer_ms: Option<u32>,
    /// Manual flag to restore when the happy timer expires.
    was_manual_before_happy: bool,
}

impl AnimationEngine {
    pub fn new(config: PetConfig, initial_hunger: u8, now_ms: u32, rng: &mut impl Rng) -> Self {
        let geometry = resolve(EyeState::Neutral);
        Self {
            blinker: Blinker::new(now_ms, rng, &config),
            selector: StateSelector::new(now_ms, rng, &config),
            hunger: HungerMeter::new(initial_hunger, now_ms),
            config,
            current_state: EyeState::Neutral,
            target_state: EyeState::Neutral,
            geometry,
            transition: Transition::settled(geometry),
            manual_mode: false,
            happy_timer_ms: None,
            was_manual_before_happy: false,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn state(&self) -> EyeState {
        self.current_state
    }

    pub fn hunger_level(&self) -> u8 {
        self.hunger.level()
    }

    pub fn manual_mode(&self) -> bool {
        self.manual_mode
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_active()
    }

    pub fn config(&self) -> &PetConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Request a transition to `state`.
    ///
    /// Returns `false` (and changes nothing) when a transition is already
    /// in flight or the state is already displayed; requests are dropped,
    /// never queued.  An accepted entry into Happy arms the celebration
    /// timer and pins manual mode for its duration.
    pub fn request_state(&mut self, state: EyeState, now_ms: u32) -> bool {
        if !self.try_begin_transition(state, now_ms) {
            return false;
        }
        if state == EyeState::Happy && self.happy_timer_ms.is_none() {
            self.was_manual_before_happy = self.manual_mode;
            self.manual_mode = true;
            self.happy_timer_ms = Some(now_ms);
        }
        true
    }

    /// External `SetState` command.
    ///
    /// Does not touch manual pinning: a commanded state in auto mode is
    /// transient, and autonomy resumes at the next dwell expiry.  Pinning
    /// is a separate, explicit `ToggleManualMode` command.
    pub fn set_state(&mut self, state: EyeState, now_ms: u32) -> Result<bool, CommandError> {
        if !self.config.variant.manual_control_enabled {
            return Err(CommandError::ManualControlDisabled);
        }
        Ok(self.request_state(state, now_ms))
    }

    /// Feed the pet: refill hunger, celebrate with a time-boxed Happy.
    ///
    /// The timer is (re)armed even when the Happy transition request is
    /// dropped mid-transition, so the manual pin always releases.
    /// Returns the hunger level after the refill.
    pub fn feed(&mut self, now_ms: u32, store: &mut impl HungerStore) -> u8 {
        let level = if self.config.variant.hunger_override_enabled {
            self.hunger.refill(store)
        } else {
            self.hunger.level()
        };

        let was_manual = self.manual_mode;
        self.try_begin_transition(EyeState::Happy, now_ms);
        self.was_manual_before_happy = was_manual;
        self.manual_mode = true;
        self.happy_timer_ms = Some(now_ms);
        level
    }

    /// Flip manual pinning.  Releasing it eases the pet back to Neutral.
    pub fn toggle_manual_mode(&mut self, now_ms: u32) -> Result<bool, CommandError> {
        if !self.config.variant.manual_control_enabled {
            return Err(CommandError::ManualControlDisabled);
        }
        self.manual_mode = !self.manual_mode;
        if !self.manual_mode {
            self.request_state(EyeState::Neutral, now_ms);
        }
        Ok(self.manual_mode)
    }

    // -----------------------------------------------------------------------
    // Per-frame tick
    // -----------------------------------------------------------------------

    /// Advance every sub-machine by one frame.
    ///
    /// Order matters: hunger decay feeds the distress override, the happy
    /// timer releases before autonomy runs, and the tween advances last
    /// so this frame's decisions are already reflected in the geometry.
    pub fn tick(&mut self, now_ms: u32, rng: &mut impl Rng, store: &mut impl HungerStore) {
        if self.config.variant.hunger_override_enabled {
            self.hunger.tick_decay(now_ms, &self.config, store);
        }

        self.tick_happy_timer(now_ms);
        self.tick_hunger_override(now_ms);

        // Autonomy is silenced by manual pinning, an in-flight tween and
        // the forced distress state.
        if !self.manual_mode
            && !self.transition.is_active()
            && self.current_state != EyeState::Sad
        {
            if let Some(next) = self.selector.poll(self.current_state, now_ms, rng, &self.config) {
                self.request_state(next, now_ms);
            }
        }

        self.blinker.tick(now_ms, rng, &self.config);

        let was_active = self.transition.is_active();
        self.geometry = self.transition.advance(now_ms);
        if was_active && !self.transition.is_active() {
            self.current_state = self.target_state;
        }
    }

    /// Snapshot the current frame for the renderer.
    pub fn frame(&self, now_ms: u32) -> Frame {
        Frame {
            left: self.geometry.left,
            right: self.geometry.right,
            openness: self.blinker.openness(),
            stars: self.current_state == EyeState::Happy,
            now_ms,
        }
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn try_begin_transition(&mut self, state: EyeState, now_ms: u32) -> bool {
        if self.transition.is_active() || state == self.current_state {
            return false;
        }
        self.target_state = state;
        self.transition.begin(
            self.geometry,
            resolve(state),
            now_ms,
            self.config.transition_duration_ms,
        );
        true
    }

    fn tick_happy_timer(&mut self, now_ms: u32) {
        let Some(armed_ms) = self.happy_timer_ms else {
            return;
        };
        if now_ms.wrapping_sub(armed_ms) < self.config.happy_duration_ms {
            return;
        }
        self.happy_timer_ms = None;
        self.manual_mode = self.was_manual_before_happy;
        if !self.manual_mode {
            self.request_state(EyeState::Neutral, now_ms);
        }
    }

    fn tick_hunger_override(&mut self, now_ms: u32) {
        if !self.config.variant.hunger_override_enabled {
            return;
        }
        // The celebration outranks distress until its timer releases.
        if self.happy_timer_ms.is_some() || self.current_state == EyeState::Happy {
            return;
        }

        if self.hunger.is_starving() {
            // Distress overrides even manual pinning.
            if self.current_state != EyeState::Sad && self.target_state != EyeState::Sad {
                self.request_state(EyeState::Sad, now_ms);
            }
        } else if self.current_state == EyeState::Sad && !self.manual_mode {
            // Recovered (fed while the Happy request was dropped, or the
            // level was restored some other way).
            self.request_state(EyeState::Neutral, now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::StorageError;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct NullStore;

    impl HungerStore for NullStore {
        fn load_hunger(&self) -> u8 {
            100
        }
        fn save_hunger(&mut self, _level: u8) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn engine(hunger: u8) -> (AnimationEngine, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(1);
        let e = AnimationEngine::new(PetConfig::default(), hunger, 0, &mut rng);
        (e, rng)
    }

    /// Run frame ticks until `deadline_ms`.
    fn run_until(
        e: &mut AnimationEngine,
        rng: &mut SmallRng,
        from_ms: u32,
        deadline_ms: u32,
    ) -> u32 {
        let mut now = from_ms;
        while now < deadline_ms {
            now += 16;
            e.tick(now, rng, &mut NullStore);
        }
        now
    }

    #[test]
    fn starts_neutral_and_settled() {
        let (e, _) = engine(100);
        assert_eq!(e.state(), EyeState::Neutral);
        assert!(!e.is_transitioning());
        assert!(!e.manual_mode());
    }

    #[test]
    fn request_drops_same_state_and_in_flight() {
        let (mut e, _) = engine(100);
        assert!(!e.request_state(EyeState::Neutral, 0));
        assert!(e.request_state(EyeState::Angry, 0));
        // A second request while tweening is dropped, not queued.
        assert!(!e.request_state(EyeState::Surprised, 10));
        assert_eq!(e.target_state, EyeState::Angry);
    }

    #[test]
    fn transition_commits_after_duration() {
        let (mut e, mut rng) = engine(100);
        assert!(e.request_state(EyeState::Angry, 0));
        let mut now = 0;
        while e.is_transitioning() {
            now += 16;
            e.tick(now, &mut rng, &mut NullStore);
            assert!(now < 1000, "transition never committed");
        }
        assert_eq!(e.state(), EyeState::Angry);
        assert_eq!(e.frame(now).left.width, resolve(EyeState::Angry).left.width);
    }

    #[test]
    fn hunger_decays_over_four_intervals() {
        let (mut e, mut rng) = engine(100);
        run_until(&mut e, &mut rng, 0, 20_096);
        assert_eq!(e.hunger_level(), 80);
    }

    #[test]
    fn external_state_request_leaves_autonomy_unpinned() {
        let (mut e, mut rng) = engine(100);
        assert!(e.set_state(EyeState::Angry, 0).unwrap());
        assert!(!e.manual_mode(), "a plain state command must not pin");

        let mut now = run_until(&mut e, &mut rng, 0, 320);
        assert_eq!(e.state(), EyeState::Angry);

        // The commanded state is transient: a later dwell expiry moves
        // the pet off it without any manual release.
        let mut moved = false;
        for _ in 0..2000 {
            now += 16;
            e.tick(now, &mut rng, &mut NullStore);
            moved |= e.state() != EyeState::Angry;
        }
        assert!(moved, "autonomy never resumed after a state command");
        assert!(!e.manual_mode());
    }

    #[test]
    fn starving_forces_sad_even_under_manual() {
        let (mut e, mut rng) = engine(0);
        e.toggle_manual_mode(0).unwrap();
        e.set_state(EyeState::Angry, 0).unwrap();
        // Commit the Angry transition first.
        let now = run_until(&mut e, &mut rng, 0, 320);
        assert!(e.manual_mode());

        let now = run_until(&mut e, &mut rng, now, now + 320);
        assert_eq!(e.state(), EyeState::Sad);
        let _ = now;
    }

    #[test]
    fn feeding_celebrates_then_releases() {
        let (mut e, mut rng) = engine(0);
        let mut store = NullStore;
        // Let the distress override take hold.
        let now = run_until(&mut e, &mut rng, 0, 500);
        assert_eq!(e.state(), EyeState::Sad);

        let level = e.feed(now, &mut store);
        assert_eq!(level, 100);
        assert!(e.manual_mode(), "celebration pins manual mode");

        let now2 = run_until(&mut e, &mut rng, now, now + 320);
        assert_eq!(e.state(), EyeState::Happy);

        // After the 3000 ms celebration the pin releases and the pet
        // returns toward Neutral.
        let now3 = run_until(&mut e, &mut rng, now2, now + 3500);
        assert!(!e.manual_mode());
        assert_eq!(e.state(), EyeState::Neutral);
        let _ = now3;
    }

    #[test]
    fn feed_while_manual_restores_the_pin() {
        let (mut e, mut rng) = engine(50);
        let mut store = NullStore;
        e.toggle_manual_mode(0).unwrap();
        e.set_state(EyeState::Suspicious, 0).unwrap();
        let now = run_until(&mut e, &mut rng, 0, 320);
        assert!(e.manual_mode());

        e.feed(now, &mut store);
        let now2 = run_until(&mut e, &mut rng, now, now + 3500);
        // Manual was on before the feed, so it stays on afterwards and
        // the pet does not wander off on its own.  No return transition
        // is issued under a restored pin, so Happy stays displayed.
        assert!(e.manual_mode());
        assert_eq!(e.state(), EyeState::Happy);
        let _ = now2;
    }

    #[test]
    fn feed_during_transition_still_arms_the_timer() {
        let (mut e, mut rng) = engine(50);
        let mut store = NullStore;
        assert!(e.request_state(EyeState::Angry, 0));
        assert!(e.is_transitioning());

        // The Happy request is dropped (tween in flight) but hunger
        // refills and the timer still arms.
        let level = e.feed(10, &mut store);
        assert_eq!(level, 100);
        assert!(e.manual_mode());

        let now = run_until(&mut e, &mut rng, 10, 3700);
        assert!(!e.manual_mode(), "timer must release the stale pin");
        let _ = now;
    }

    #[test]
    fn manual_release_returns_to_neutral() {
        let (mut e, mut rng) = engine(100);
        e.toggle_manual_mode(0).unwrap();
        e.set_state(EyeState::Up, 0).unwrap();
        let now = run_until(&mut e, &mut rng, 0, 320);
        assert_eq!(e.state(), EyeState::Up);

        assert_eq!(e.toggle_manual_mode(now), Ok(false));
        let now2 = run_until(&mut e, &mut rng, now, now + 320);
        assert_eq!(e.state(), EyeState::Neutral);
        let _ = now2;
    }

    #[test]
    fn manual_commands_rejected_when_variant_disables_them() {
        let mut config = PetConfig::default();
        config.variant.manual_control_enabled = false;
        let mut rng = SmallRng::seed_from_u64(1);
        let mut e = AnimationEngine::new(config, 100, 0, &mut rng);

        assert_eq!(
            e.set_state(EyeState::Angry, 0),
            Err(CommandError::ManualControlDisabled)
        );
        assert_eq!(
            e.toggle_manual_mode(0),
            Err(CommandError::ManualControlDisabled)
        );
        assert!(!e.manual_mode());
    }

    #[test]
    fn hunger_disabled_variant_never_forces_sad() {
        let mut config = PetConfig::default();
        config.variant.hunger_override_enabled = false;
        let mut rng = SmallRng::seed_from_u64(1);
        let mut e = AnimationEngine::new(config, 0, 0, &mut rng);
        e.toggle_manual_mode(0).unwrap();
        e.set_state(EyeState::Up, 0).unwrap();

        let now = run_until(&mut e, &mut rng, 0, 10_000);
        assert_eq!(e.state(), EyeState::Up);
        assert_eq!(e.hunger_level(), 0, "meter frozen when override disabled");
        let _ = now;
    }

    #[test]
    fn autonomous_selection_changes_state_eventually() {
        let (mut e, mut rng) = engine(100);
        let mut saw_non_neutral = false;
        let mut now = 0u32;
        for _ in 0..4000 {
            now += 16;
            e.tick(now, &mut rng, &mut NullStore);
            saw_non_neutral |= e.state() != EyeState::Neutral;
        }
        assert!(saw_non_neutral, "selector never moved within ~64 s");
    }

    #[test]
    fn frame_reports_stars_only_while_happy() {
        let (mut e, mut rng) = engine(100);
        let mut store = NullStore;
        assert!(!e.frame(0).stars);
        e.feed(0, &mut store);
        let now = run_until(&mut e, &mut rng, 0, 320);
        assert_eq!(e.state(), EyeState::Happy);
        assert!(e.frame(now).stars);
    }
}
