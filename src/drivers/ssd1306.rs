//! SSD1306 128x64 OLED driver.
//!
//! Minimal command set: init into horizontal addressing mode, then flush
//! whole frames from a page-ordered [`FrameBuffer`].  Generic over any
//! `embedded-hal` I2C bus, so the same driver runs against the ESP-IDF
//! I2C master on target and a recording bus in tests.

use embedded_hal::i2c::I2c;
use log::info;

use crate::app::ports::DisplayError;
use crate::drivers::framebuffer::{BUFFER_LEN, FrameBuffer, WIDTH};

/// Default 7-bit I2C address (SA0 low).
pub const I2C_ADDRESS: u8 = 0x3C;

/// Control byte preceding a command stream.
const CONTROL_COMMAND: u8 = 0x00;
/// Control byte preceding display data.
const CONTROL_DATA: u8 = 0x40;

/// Power-on init sequence for a 128x64 panel, horizontal addressing.
const INIT_SEQUENCE: &[u8] = &[
    0xAE, // display off
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 1/64
    0xD3, 0x00, // display offset
    0x40, // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1, // segment remap
    0xC8, // COM scan descending
    0xDA, 0x12, // COM pins alternative
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // precharge
    0xDB, 0x40, // VCOMH
    0xA4, // resume from RAM
    0xA6, // normal (not inverted)
    0xAF, // display on
];

pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ssd1306<I2C> {
    /// Initialise the panel.  The bus must already be configured.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, DisplayError> {
        let mut driver = Self { i2c, address };
        driver
            .send_commands(INIT_SEQUENCE)
            .map_err(|_| DisplayError::InitFailed)?;
        info!("ssd1306: panel initialised at 0x{address:02X}");
        Ok(driver)
    }

    /// Push a full frame.  Horizontal addressing auto-wraps, so one
    /// column/page window reset followed by the whole buffer suffices.
    pub fn flush(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        self.send_commands(&[
            0x21, 0x00, (WIDTH - 1) as u8, // column window
            0x22, 0x00, 0x07, // page window
        ])
        .map_err(|_| DisplayError::BusWriteFailed)?;

        let mut packet = [0u8; 1 + BUFFER_LEN];
        packet[0] = CONTROL_DATA;
        packet[1..].copy_from_slice(frame.data());
        self.i2c
            .write(self.address, &packet)
            .map_err(|_| DisplayError::BusWriteFailed)
    }

    fn send_commands(&mut self, commands: &[u8]) -> Result<(), I2C::Error> {
        for &command in commands {
            self.i2c.write(self.address, &[CONTROL_COMMAND, command])?;
        }
        Ok(())
    }
}
