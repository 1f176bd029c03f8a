//! Control-panel commands.
//!
//! Commands originate on the HTTP server thread, cross to the control
//! loop through the lock-free queue in `crate::events`, and are applied
//! by the service between frames.

use crate::engine::state::EyeState;
use crate::error::CommandError;

/// A request from the web control panel (or a test driver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetCommand {
    /// Display this state.  Transient in auto mode; does not pin.
    SetState(EyeState),
    /// Flip manual pinning; turning it off releases back to autonomy.
    ToggleManualMode,
    /// Refill hunger and celebrate.
    Feed,
    /// Flip the full-white reading light.
    ToggleReadingLight,
}

impl PetCommand {
    /// Build a `SetState` from the wire index used by `/emotion?state=N`.
    pub fn from_state_index(idx: u8) -> Result<Self, CommandError> {
        EyeState::from_index(idx)
            .map(Self::SetState)
            .ok_or(CommandError::InvalidStateIndex(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_index_decodes_full_range() {
        assert_eq!(
            PetCommand::from_state_index(0),
            Ok(PetCommand::SetState(EyeState::Neutral))
        );
        assert_eq!(
            PetCommand::from_state_index(10),
            Ok(PetCommand::SetState(EyeState::Happy))
        );
    }

    #[test]
    fn state_index_rejects_out_of_range() {
        assert_eq!(
            PetCommand::from_state_index(11),
            Err(CommandError::InvalidStateIndex(11))
        );
    }
}
