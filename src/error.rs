//! Unified error types for the Blinky firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` and
//! allocation-free.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An external command was malformed or not permitted.
    Command(CommandError),
    /// The display bus or panel failed.
    Display(crate::app::ports::DisplayError),
    /// Persistent storage failed.
    Storage(crate::app::ports::StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Rejections for commands arriving from the HTTP control panel.
///
/// These are surfaced synchronously to the caller (HTTP 400); no engine
/// state is mutated when one is returned.  A state request dropped because
/// a transition is in flight is *not* an error — it is silently ignored
/// and the caller is expected to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// State index outside `0..EyeState::COUNT`.
    InvalidStateIndex(u8),
    /// A required query parameter was absent.
    MissingParameter(&'static str),
    /// External state control is disabled in this build variant.
    ManualControlDisabled,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStateIndex(idx) => write!(f, "invalid state index {idx}"),
            Self::MissingParameter(name) => write!(f, "missing parameter '{name}'"),
            Self::ManualControlDisabled => write!(f, "manual control disabled"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

impl From<crate::app::ports::DisplayError> for Error {
    fn from(e: crate::app::ports::DisplayError) -> Self {
        Self::Display(e)
    }
}

impl From<crate::app::ports::StorageError> for Error {
    fn from(e: crate::app::ports::StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
