//! ESP32 time adapter.
//!
//! Monotonic millisecond timestamps for the animation engine.  The
//! engine works in wrapping `u32` milliseconds (about 49.7 days per
//! wrap), and every comparison in it uses `wrapping_sub`, so the wrap
//! is harmless.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` (the
//!   high-resolution monotonic timer).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side testing and simulation.

pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot, wrapping at `u32::MAX`.
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1000) as u32
    }

    /// Milliseconds since boot, wrapping at `u32::MAX`.
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_monotonic() {
        let t = Esp32TimeAdapter::new();
        let a = t.uptime_ms();
        let b = t.uptime_ms();
        assert!(b >= a);
    }
}
