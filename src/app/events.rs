//! Engine activity notifications.

use crate::engine::state::EyeState;

/// Something observable happened in the engine.
///
/// Emitted by the service layer after each tick and command; carries only
/// `Copy` data so sinks never borrow into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetEvent {
    /// Engine came up displaying this state.
    Started(EyeState),
    /// A transition committed; the displayed state changed.
    StateChanged { from: EyeState, to: EyeState },
    /// Manual pinning was toggled.
    ManualMode(bool),
    /// The pet was fed; hunger after the refill.
    Fed { hunger: u8 },
    /// Hunger decayed to a new level.
    HungerChanged(u8),
    /// The reading light was toggled.
    ReadingLight(bool),
}
