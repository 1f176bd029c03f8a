//! Geometry resolver — the authored deformation table.
//!
//! Maps each [`EyeState`] to a target shape for both eyes.  The per-state
//! multipliers, offsets and rotations are the design contract that gives
//! the pet its visual personality; they are exact constants, not tunables.

use super::state::EyeState;

/// Baseline eye width in pixels.
pub const EYE_BASE_WIDTH: f32 = 30.0;
/// Baseline eye height in pixels.
pub const EYE_BASE_HEIGHT: f32 = 44.0;

/// Shape of a single eye relative to its socket anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeGeometry {
    /// Ellipse width (px).
    pub width: f32,
    /// Ellipse height (px), before blink scaling.
    pub height: f32,
    /// Horizontal offset from the socket center (px).
    pub offset_x: f32,
    /// Vertical offset from the socket center (px).
    pub offset_y: f32,
    /// Rotation (radians), positive = clockwise.
    pub angle: f32,
}

impl EyeGeometry {
    /// The unscaled baseline ellipse, centered on the socket.
    pub const fn baseline() -> Self {
        Self {
            width: EYE_BASE_WIDTH,
            height: EYE_BASE_HEIGHT,
            offset_x: 0.0,
            offset_y: 0.0,
            angle: 0.0,
        }
    }

    /// Linear interpolation toward `target`; each field independently.
    pub fn lerp(&self, target: &Self, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            width: mix(self.width, target.width),
            height: mix(self.height, target.height),
            offset_x: mix(self.offset_x, target.offset_x),
            offset_y: mix(self.offset_y, target.offset_y),
            angle: mix(self.angle, target.angle),
        }
    }
}

/// The pair of live eye shapes (left, right).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyePair {
    pub left: EyeGeometry,
    pub right: EyeGeometry,
}

impl EyePair {
    pub const fn baseline() -> Self {
        Self {
            left: EyeGeometry::baseline(),
            right: EyeGeometry::baseline(),
        }
    }

    pub fn lerp(&self, target: &Self, t: f32) -> Self {
        Self {
            left: self.left.lerp(&target.left, t),
            right: self.right.lerp(&target.right, t),
        }
    }
}

/// A decorative diamond "star" drawn while Happy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Star {
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

/// The two stars armed on entry into Happy: a small one top-right and a
/// slightly larger one bottom-left.
pub const HAPPY_STARS: [Star; 2] = [
    Star { x: 105, y: 15, size: 3 },
    Star { x: 20, y: 50, size: 6 },
];

/// Resolve the target geometry for a state.  Pure, total, deterministic.
pub fn resolve(state: EyeState) -> EyePair {
    let mut left = EyeGeometry::baseline();
    let mut right = EyeGeometry::baseline();

    match state {
        EyeState::Angry => {
            // Narrowed, angled inward toward the nose.
            left.width = EYE_BASE_WIDTH * 0.7;
            left.height = EYE_BASE_HEIGHT * 0.7;
            right.width = EYE_BASE_WIDTH * 0.7;
            right.height = EYE_BASE_HEIGHT * 0.7;
            left.offset_x = -5.0;
            right.offset_x = 5.0;
            left.offset_y = -2.0;
            right.offset_y = -2.0;
            left.angle = -0.5;
            right.angle = 0.5;
        }

        EyeState::Surprised => {
            // Wide circles (height derived from the width baseline).
            left.width = EYE_BASE_WIDTH * 1.4;
            left.height = EYE_BASE_WIDTH * 1.4;
            right.width = EYE_BASE_WIDTH * 1.4;
            right.height = EYE_BASE_WIDTH * 1.4;
            left.offset_y = -5.0;
            right.offset_y = -5.0;
        }

        EyeState::Sleepy => {
            // Droopy: outer corners tilted down, eyes sagging.
            left.width = EYE_BASE_WIDTH * 0.9;
            left.height = EYE_BASE_HEIGHT * 0.7;
            right.width = EYE_BASE_WIDTH * 0.9;
            right.height = EYE_BASE_HEIGHT * 0.7;
            left.offset_y = 8.0;
            right.offset_y = 8.0;
            left.angle = 0.3;
            right.angle = -0.3;
        }

        EyeState::Suspicious => {
            // One brow raised, the other eye nearly normal.
            left.width = EYE_BASE_WIDTH * 0.75;
            left.height = EYE_BASE_HEIGHT * 0.6;
            right.width = EYE_BASE_WIDTH * 0.9;
            right.height = EYE_BASE_HEIGHT * 0.9;
            left.offset_y = -5.0;
            right.offset_y = 3.0;
            left.angle = 0.2;
        }

        EyeState::Left => {
            // Gaze left: near eye shrinks, far eye enlarges and shifts over.
            left.width = EYE_BASE_WIDTH * 0.5;
            left.height = EYE_BASE_HEIGHT * 0.7;
            left.offset_x = -10.0;
            right.width = EYE_BASE_WIDTH * 0.8;
            right.height = EYE_BASE_HEIGHT * 1.1;
            right.offset_x = -12.0;
        }

        EyeState::Right => {
            // Mirror of Left.
            left.width = EYE_BASE_WIDTH * 0.8;
            left.height = EYE_BASE_HEIGHT * 1.1;
            left.offset_x = 12.0;
            right.width = EYE_BASE_WIDTH * 0.5;
            right.height = EYE_BASE_HEIGHT * 0.7;
            right.offset_x = 10.0;
        }

        EyeState::Up => {
            left.width = EYE_BASE_WIDTH * 0.9;
            left.height = EYE_BASE_HEIGHT * 0.65;
            right.width = EYE_BASE_WIDTH * 0.9;
            right.height = EYE_BASE_HEIGHT * 0.65;
            left.offset_y = -12.0;
            right.offset_y = -12.0;
        }

        EyeState::Down => {
            left.width = EYE_BASE_WIDTH * 0.9;
            left.height = EYE_BASE_HEIGHT * 0.65;
            right.width = EYE_BASE_WIDTH * 0.9;
            right.height = EYE_BASE_HEIGHT * 0.65;
            left.offset_y = 12.0;
            right.offset_y = 12.0;
        }

        EyeState::Sad => {
            // Half-closed, sunk low.
            left.width = EYE_BASE_WIDTH * 1.0;
            left.height = EYE_BASE_HEIGHT * 0.45;
            right.width = EYE_BASE_WIDTH * 1.0;
            right.height = EYE_BASE_HEIGHT * 0.45;
            left.offset_y = 8.0;
            right.offset_y = 8.0;
        }

        EyeState::Happy => {
            // Flattened crescents lifted high to fake a smile, slightly
            // squinted inward with a hint of outward rotation.
            left.width = EYE_BASE_WIDTH * 1.3;
            left.height = EYE_BASE_HEIGHT * 0.3;
            right.width = EYE_BASE_WIDTH * 1.3;
            right.height = EYE_BASE_HEIGHT * 0.3;
            left.offset_y = -6.0;
            right.offset_y = -6.0;
            left.offset_x = -3.0;
            right.offset_x = 3.0;
            left.angle = -0.05;
            right.angle = 0.05;
        }

        EyeState::Neutral => {}
    }

    EyePair { left, right }
}
