//! Display drivers: the page-format framebuffer and the SSD1306 panel.

pub mod framebuffer;
pub mod ssd1306;
