//! OLED display adapter.
//!
//! Implements [`DisplayPort`] over the shared [`FrameBuffer`] rasterizer.
//!
//! - **`target_os = "espidf"`** — `present()` flushes the buffer to the
//!   SSD1306 panel over I2C.
//! - **host** — `present()` only counts; tests inspect the framebuffer
//!   to assert on the exact pixels that would have been shown.

use crate::app::ports::{DisplayError, DisplayPort};
use crate::drivers::framebuffer::FrameBuffer;

#[cfg(target_os = "espidf")]
use crate::drivers::ssd1306::Ssd1306;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::i2c::I2cDriver;

pub struct OledDisplay {
    frame: FrameBuffer,
    #[cfg(target_os = "espidf")]
    panel: Ssd1306<I2cDriver<'static>>,
    #[cfg(not(target_os = "espidf"))]
    presented_frames: u32,
}

impl OledDisplay {
    #[cfg(target_os = "espidf")]
    pub fn new(panel: Ssd1306<I2cDriver<'static>>) -> Self {
        Self {
            frame: FrameBuffer::new(),
            panel,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
            presented_frames: 0,
        }
    }

    /// The working frame, for host-side inspection.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn presented_frames(&self) -> u32 {
        self.presented_frames
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for OledDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for OledDisplay {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn fill_screen(&mut self) {
        self.frame.fill();
    }

    fn fill_ellipse(&mut self, cx: i32, cy: i32, width: i32, height: i32, angle: f32) {
        self.frame.fill_ellipse(cx, cy, width, height, angle);
    }

    fn fill_diamond(&mut self, cx: i32, cy: i32, size: i32) {
        self.frame.fill_diamond(cx, cy, size);
    }

    #[cfg(target_os = "espidf")]
    fn present(&mut self) -> Result<(), DisplayError> {
        self.panel.flush(&self.frame)
    }

    #[cfg(not(target_os = "espidf"))]
    fn present(&mut self) -> Result<(), DisplayError> {
        self.presented_frames += 1;
        Ok(())
    }
}
