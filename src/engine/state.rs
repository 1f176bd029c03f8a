//! Eye state identity and recent-use history.

/// Enumeration of every emotional / look state the pet can display.
///
/// The discriminants are the wire indexes accepted by the `/emotion`
/// control route, so the order must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EyeState {
    /// Normal, centered eyes — the resting state.
    Neutral = 0,
    /// Angled eyes, looking aggressive.
    Angry = 1,
    /// Wide, round eyes.
    Surprised = 2,
    /// Half-closed eyes; also the hunger distress state.
    Sad = 3,
    /// Narrow, squinting eyes with one brow raised.
    Suspicious = 4,
    /// Looking left.
    Left = 5,
    /// Looking right.
    Right = 6,
    /// Looking up.
    Up = 7,
    /// Looking down.
    Down = 8,
    /// Droopy, drowsy eyes.
    Sleepy = 9,
    /// Crescent "smiling" eyes with decorative stars; always time-boxed.
    Happy = 10,
}

impl EyeState {
    /// Total number of states — the exclusive upper bound for wire indexes.
    pub const COUNT: usize = 11;

    /// Candidate pool for the "emotion" selector category.
    /// Neutral is reachable only through the explicit return-to-neutral
    /// roll, and Happy only through the feed path.
    pub const EMOTIONS: [Self; 4] = [Self::Angry, Self::Surprised, Self::Sad, Self::Suspicious];

    /// Candidate pool for the "directional" selector category.
    pub const DIRECTIONAL: [Self; 5] = [Self::Left, Self::Right, Self::Up, Self::Down, Self::Sleepy];

    /// Convert a wire index back to an `EyeState`.
    /// Returns `None` for out-of-range values (rejected commands).
    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Neutral),
            1 => Some(Self::Angry),
            2 => Some(Self::Surprised),
            3 => Some(Self::Sad),
            4 => Some(Self::Suspicious),
            5 => Some(Self::Left),
            6 => Some(Self::Right),
            7 => Some(Self::Up),
            8 => Some(Self::Down),
            9 => Some(Self::Sleepy),
            10 => Some(Self::Happy),
            _ => None,
        }
    }
}

/// Ring buffer of the last three committed selector states.
///
/// Used only to bias selection away from repeats; seeded with Neutral so
/// early draws avoid an immediate return to rest.
#[derive(Debug, Clone, Copy)]
pub struct StateHistory {
    slots: [EyeState; Self::CAPACITY],
    next: usize,
}

impl StateHistory {
    pub const CAPACITY: usize = 3;

    pub fn new() -> Self {
        Self {
            slots: [EyeState::Neutral; Self::CAPACITY],
            next: 0,
        }
    }

    /// Whether `state` is one of the last three recorded states.
    pub fn contains(&self, state: EyeState) -> bool {
        self.slots.iter().any(|&s| s == state)
    }

    /// Record a committed state, overwriting the oldest slot.
    pub fn record(&mut self, state: EyeState) {
        self.slots[self.next] = state;
        self.next = (self.next + 1) % Self::CAPACITY;
    }
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}
