//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                    |
//! |------------|---------------|--------------------------------|
//! | `display`  | DisplayPort   | SSD1306 OLED / host framebuffer|
//! | `http`     | command queue | Web control panel + OTA        |
//! | `log_sink` | EventSink     | Serial log output              |
//! | `mdns`     | —             | mDNS service advertisement     |
//! | `nvs`      | HungerStore   | NVS / in-memory store          |
//! |            | ConfigStore   |                                |
//! | `time`     | —             | ESP32 system timer             |
//! | `wifi`     | —             | ESP-IDF WiFi STA               |

pub mod display;
pub mod http;
pub mod log_sink;
pub mod mdns;
pub mod nvs;
pub mod time;
pub mod wifi;
