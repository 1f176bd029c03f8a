//! Frame renderer.
//!
//! Turns an engine [`Frame`] into draw calls against a [`DisplayPort`].
//! All layout constants live here; the engine deals purely in offsets
//! from the socket anchors.

use crate::app::ports::{DisplayError, DisplayPort};
use crate::engine::geometry::HAPPY_STARS;
use crate::engine::Frame;

/// Panel width in pixels.
pub const SCREEN_WIDTH: i32 = 128;
/// Panel height in pixels.
pub const SCREEN_HEIGHT: i32 = 64;
/// Gap between the inner edges of the two baseline eyes.
pub const EYE_SPACING: i32 = 16;

/// Socket anchor for the left eye.
const LEFT_SOCKET_X: i32 = 41;
/// Socket anchor for the right eye.
const RIGHT_SOCKET_X: i32 = 87;
/// Vertical center of both sockets.
const SOCKET_Y: i32 = 32;

/// Stateless apart from the reading-light latch.
#[derive(Debug, Default)]
pub struct Renderer {
    reading_light: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the reading light.  Returns the new setting.
    pub fn toggle_reading_light(&mut self) -> bool {
        self.reading_light = !self.reading_light;
        self.reading_light
    }

    pub fn reading_light(&self) -> bool {
        self.reading_light
    }

    /// Draw one frame and present it.
    ///
    /// While the reading light is on the whole panel is driven white and
    /// the face is not drawn; the engine keeps animating underneath so
    /// toggling back resumes seamlessly.
    pub fn render(
        &self,
        frame: &Frame,
        display: &mut impl DisplayPort,
    ) -> Result<(), DisplayError> {
        display.clear();

        if self.reading_light {
            display.fill_screen();
            return display.present();
        }

        self.draw_eye(display, LEFT_SOCKET_X, &frame.left, frame.openness);
        self.draw_eye(display, RIGHT_SOCKET_X, &frame.right, frame.openness);

        if frame.stars {
            self.draw_stars(display, frame.now_ms);
        }

        display.present()
    }

    fn draw_eye(
        &self,
        display: &mut impl DisplayPort,
        socket_x: i32,
        eye: &crate::engine::geometry::EyeGeometry,
        openness: f32,
    ) {
        let cx = socket_x + eye.offset_x as i32;
        let cy = SOCKET_Y + eye.offset_y as i32;
        let width = eye.width as i32;
        let height = (eye.height * openness) as i32;
        display.fill_ellipse(cx, cy, width, height, eye.angle);
    }

    /// The celebration stars pulse on a ~1 s sine, phase-shifted so the
    /// two never peak together.
    fn draw_stars(&self, display: &mut impl DisplayPort, now_ms: u32) {
        for (i, star) in HAPPY_STARS.iter().enumerate() {
            let phase = now_ms as f32 / 150.0 + i as f32 * 0.5;
            let size = (star.size + (phase.sin() * 2.0) as i32).max(1);
            display.fill_diamond(star.x, star.y, size);
        }
    }
}
