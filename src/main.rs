//! Blinky firmware — main entry point.
//!
//! Boot sequence, adapter construction and the frame loop.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                   │
//! │                                                           │
//! │  OledDisplay    NvsAdapter      LogEventSink   Esp32Time  │
//! │  (DisplayPort)  (HungerStore+   (EventSink)    (uptime)   │
//! │                  ConfigStore)                             │
//! │  WifiAdapter    MdnsAdapter     HTTP server + OTA         │
//! │                                                           │
//! │  ─────────────── Port Trait Boundary ──────────────────   │
//! │                                                           │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │            PetService (pure logic)                  │  │
//! │  │  AnimationEngine · Renderer                         │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::units::FromValueType;
    use esp_idf_svc::wifi::EspWifi;
    use log::{error, info, warn};

    use blinky::adapters::display::OledDisplay;
    use blinky::adapters::http;
    use blinky::adapters::log_sink::LogEventSink;
    use blinky::adapters::mdns::MdnsAdapter;
    use blinky::adapters::nvs::NvsAdapter;
    use blinky::adapters::time::Esp32TimeAdapter;
    use blinky::adapters::wifi::WifiAdapter;
    use blinky::app::ports::ConfigStore;
    use blinky::app::service::PetService;
    use blinky::config::PetConfig;
    use blinky::drivers::ssd1306::{Ssd1306, I2C_ADDRESS};
    use blinky::events;

    /// Network credentials baked in at build time.
    const WIFI_SSID: &str = match option_env!("BLINKY_WIFI_SSID") {
        Some(ssid) => ssid,
        None => "wearable-net",
    };
    const WIFI_PASSWORD: &str = match option_env!("BLINKY_WIFI_PASSWORD") {
        Some(password) => password,
        None => "",
    };
    const MDNS_HOSTNAME: &str = "esp32-wearable";

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Blinky v{} booting", env!("CARGO_PKG_VERSION"));

    // ── 2. Storage ────────────────────────────────────────────
    let mut nvs = NvsAdapter::new().context("NVS init failed")?;
    let config = match nvs.load_config() {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            cfg
        }
        Err(e) => {
            warn!("NVS config load failed ({e}), using defaults");
            PetConfig::default()
        }
    };

    // ── 3. Display ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(400.kHz().into()),
    )
    .context("I2C init failed")?;
    let panel = Ssd1306::new(i2c, I2C_ADDRESS)
        .map_err(|e| anyhow::anyhow!("SSD1306 init failed: {e}"))?;
    let mut display = OledDisplay::new(panel);

    // ── 4. Networking ─────────────────────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let wifi_driver = EspWifi::new(peripherals.modem, sysloop.clone(), None)?;
    let mut wifi = WifiAdapter::new(wifi_driver, config.network_check_interval_ms);

    if let Err(e) = wifi.set_credentials(WIFI_SSID, WIFI_PASSWORD) {
        warn!("WiFi credentials rejected ({e}), running offline");
    } else if let Err(e) = wifi.connect() {
        warn!("WiFi connect failed ({e}), will keep retrying");
    }

    let mut hostname = heapless::String::<24>::new();
    let _ = hostname.push_str(MDNS_HOSTNAME);
    let mut mdns = MdnsAdapter::new(hostname);
    if wifi.is_connected() {
        mdns.start();
    }

    // The server lives until the end of main; handlers feed the queue.
    let _http_server = http::start().context("HTTP server start failed")?;

    // ── 5. Application service ────────────────────────────────
    let time = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();
    let mut service = PetService::new(config.clone(), &nvs, time.uptime_ms());
    service.start(&mut sink);

    info!("System ready. Entering frame loop.");

    // ── 6. Frame loop ─────────────────────────────────────────
    loop {
        let now_ms = time.uptime_ms();

        wifi.poll(now_ms);
        if wifi.is_connected() {
            mdns.start();
        } else {
            mdns.stop();
        }

        events::drain_commands(|command| {
            if let Err(e) = service.handle_command(command, now_ms, &mut nvs, &mut sink) {
                warn!("command rejected: {e}");
            }
        });

        if let Err(e) = service.tick(
            now_ms,
            &mut display,
            &mut nvs,
            &mut sink,
            http::update_in_progress(),
        ) {
            error!("frame failed: {e}");
        }

        FreeRtos::delay_ms(config.frame_interval_ms);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("blinky targets ESP-IDF; run the test suite on the host instead");
}
