//! Hardware abstraction ports.
//!
//! Every platform-specific capability the application core touches sits
//! behind one of these traits.  Adapters in `crate::adapters` provide the
//! ESP-IDF implementations plus host-side simulations, which is what lets
//! the full engine run under `cargo test` on a workstation.

use core::fmt;

use crate::config::PetConfig;

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Errors from the display panel or its bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// The panel did not acknowledge its init sequence.
    InitFailed,
    /// A frame or command write on the bus failed.
    BusWriteFailed,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => write!(f, "display init failed"),
            Self::BusWriteFailed => write!(f, "display bus write failed"),
        }
    }
}

/// Monochrome drawing surface for the pet's face.
///
/// Drawing calls mutate an in-memory frame; nothing reaches the panel
/// until [`present`](DisplayPort::present).  Coordinates are screen
/// pixels with the origin at the top-left.
pub trait DisplayPort {
    /// Clear the working frame to black.
    fn clear(&mut self);

    /// Fill the entire working frame white.
    fn fill_screen(&mut self);

    /// Draw a filled ellipse centered at (`cx`, `cy`), rotated by
    /// `angle` radians.
    fn fill_ellipse(&mut self, cx: i32, cy: i32, width: i32, height: i32, angle: f32);

    /// Draw a filled diamond (rotated square) centered at (`cx`, `cy`)
    /// with the given half-diagonal `size`.
    fn fill_diamond(&mut self, cx: i32, cy: i32, size: i32);

    /// Push the working frame to the panel.
    fn present(&mut self) -> Result<(), DisplayError>;
}

// ---------------------------------------------------------------------------
// Persistent storage
// ---------------------------------------------------------------------------

/// Errors from the persistence layer (NVS on target).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The requested key does not exist yet.
    NotFound,
    /// The partition is out of space.
    Full,
    /// Any other flash / driver failure.
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "storage i/o error"),
        }
    }
}

/// Persistence for the hunger meter.
///
/// Loads fall back to a full meter rather than failing; the pet should
/// never boot into distress because of a missing key.
pub trait HungerStore {
    /// Load the persisted hunger level (0-100).  Missing or corrupt
    /// values yield 100.
    fn load_hunger(&self) -> u8;

    /// Persist the hunger level.
    fn save_hunger(&mut self, level: u8) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// Configuration storage
// ---------------------------------------------------------------------------

/// Errors from configuration load / save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No stored configuration; caller should fall back to defaults.
    NotFound,
    /// Stored bytes did not deserialize.
    Corrupted,
    /// Deserialized fine but failed a sanity check.
    ValidationFailed(&'static str),
    /// Underlying storage failure.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no stored config"),
            Self::Corrupted => write!(f, "stored config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "config validation failed: {msg}"),
            Self::IoError => write!(f, "config storage i/o error"),
        }
    }
}

/// Persistence for [`PetConfig`] overrides.
pub trait ConfigStore {
    fn load_config(&self) -> Result<PetConfig, ConfigError>;
    fn save_config(&mut self, config: &PetConfig) -> Result<(), ConfigError>;
}

// ---------------------------------------------------------------------------
// Event sink
// ---------------------------------------------------------------------------

/// Outbound notifications about engine activity.
///
/// The firmware wires this to the structured logger; tests wire it to a
/// recording sink and assert on the emitted sequence.
pub trait EventSink {
    fn emit(&mut self, event: &crate::app::events::PetEvent);
}
