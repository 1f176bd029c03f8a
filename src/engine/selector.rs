//! Autonomous state selector.
//!
//! A neutral-biased, self-avoiding random walk over the ten non-Happy
//! states.  The engine polls it once per frame; it proposes a new state
//! only when the current dwell deadline has expired.  The engine decides
//! whether the selector runs at all (manual pin, in-flight transition and
//! the forced-sad state all suppress it).

use rand::Rng;

use super::state::{EyeState, StateHistory};
use crate::config::PetConfig;

/// Upper bound on reject-and-redraw attempts.  With nine candidates and
/// at most four exclusions this is unreachable; it only guards a
/// misconfigured candidate pool from spinning the frame loop.
const MAX_DRAW_ATTEMPTS: usize = 16;

#[derive(Debug)]
pub struct StateSelector {
    history: StateHistory,
    /// When the current dwell began (monotonic ms).
    dwell_started_ms: u32,
    /// Length of the current dwell, drawn once on commit.
    dwell_ms: u32,
}

impl StateSelector {
    /// New selector resting in Neutral.
    pub fn new(now_ms: u32, rng: &mut impl Rng, config: &PetConfig) -> Self {
        Self {
            history: StateHistory::new(),
            dwell_started_ms: now_ms,
            dwell_ms: Self::draw_dwell(EyeState::Neutral, rng, config),
        }
    }

    /// Poll for a proposal.  Returns `Some(next)` when the dwell expired
    /// and a replacement was chosen; the proposal is always distinct from
    /// `current`, so the engine's transition request cannot no-op.
    pub fn poll(
        &mut self,
        current: EyeState,
        now_ms: u32,
        rng: &mut impl Rng,
        config: &PetConfig,
    ) -> Option<EyeState> {
        if now_ms.wrapping_sub(self.dwell_started_ms) <= self.dwell_ms {
            return None;
        }

        // Strong pull back to rest.
        if current != EyeState::Neutral
            && rng.gen_range(0..100) < u32::from(config.neutral_return_probability_percent)
        {
            self.rearm(EyeState::Neutral, now_ms, rng, config);
            return Some(EyeState::Neutral);
        }

        match self.draw_replacement(current, rng, config) {
            Some(next) => {
                self.history.record(next);
                self.rearm(next, now_ms, rng, config);
                Some(next)
            }
            None => {
                // Candidate pool exhausted; stay put for another dwell.
                self.rearm(current, now_ms, rng, config);
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn draw_replacement(
        &self,
        current: EyeState,
        rng: &mut impl Rng,
        config: &PetConfig,
    ) -> Option<EyeState> {
        for _ in 0..MAX_DRAW_ATTEMPTS {
            let candidate = if rng.gen_range(0..100)
                < u32::from(config.emotion_category_probability_percent)
            {
                EyeState::EMOTIONS[rng.gen_range(0..EyeState::EMOTIONS.len())]
            } else {
                EyeState::DIRECTIONAL[rng.gen_range(0..EyeState::DIRECTIONAL.len())]
            };

            // Happy never enters the pools, but the rule is part of the
            // contract, so keep the explicit check.
            if candidate != current
                && candidate != EyeState::Happy
                && !self.history.contains(candidate)
            {
                return Some(candidate);
            }
        }
        None
    }

    fn rearm(&mut self, next: EyeState, now_ms: u32, rng: &mut impl Rng, config: &PetConfig) {
        self.dwell_started_ms = now_ms;
        self.dwell_ms = Self::draw_dwell(next, rng, config);
    }

    fn draw_dwell(state: EyeState, rng: &mut impl Rng, config: &PetConfig) -> u32 {
        if state == EyeState::Neutral {
            rng.gen_range(config.min_neutral_dwell_ms..config.max_neutral_dwell_ms)
        } else {
            rng.gen_range(config.min_emotion_dwell_ms..config.max_emotion_dwell_ms)
        }
    }
}
