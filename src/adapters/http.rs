//! Web control panel.
//!
//! A tiny HTTP API served by `esp-idf-svc`'s built-in server.  Handlers
//! run on the server task, so they never touch the engine directly:
//! each route validates its input, pushes a command into the lock-free
//! queue and replies immediately.  The control loop drains the queue
//! between frames.
//!
//! Routes:
//! - `GET /emotion?state=N` — show state `N` (0-10)
//! - `GET /manual` — toggle manual mode
//! - `GET /feed` — refill hunger, celebrate
//! - `GET /readinglight` — toggle the full-white reading light
//! - `POST /update` — OTA firmware upload
//!
//! Query parsing is plain string slicing kept free of server types so
//! the host test suite covers the exact validation the device runs.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::engine::state::EyeState;
use crate::error::CommandError;

/// Set for the whole duration of an OTA upload; the control loop checks
/// it each frame and pauses animation while it is up.
static UPDATE_IN_PROGRESS: AtomicBool = AtomicBool::new(false);

pub fn update_in_progress() -> bool {
    UPDATE_IN_PROGRESS.load(Ordering::Relaxed)
}

// ───────────────────────────────────────────────────────────────
// Query parsing (host-testable)
// ───────────────────────────────────────────────────────────────

/// Extract a query parameter's raw value from a request URI.
fn query_param<'a>(uri: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = uri.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Parse `/emotion?state=N` into an [`EyeState`].
pub fn parse_state_param(uri: &str) -> Result<EyeState, CommandError> {
    let raw = query_param(uri, "state").ok_or(CommandError::MissingParameter("state"))?;
    let idx: u8 = raw
        .parse()
        .map_err(|_| CommandError::InvalidStateIndex(u8::MAX))?;
    EyeState::from_index(idx).ok_or(CommandError::InvalidStateIndex(idx))
}

/// Body text for a successful `/emotion` request.
pub fn emotion_response(state: EyeState) -> heapless::String<32> {
    let mut body = heapless::String::new();
    // The literal format the companion page expects.
    let _ = core::fmt::write(
        &mut body,
        format_args!("Emotion set to {}", state as u8),
    );
    body
}

/// Body text for a rejected `/emotion` request.
pub fn emotion_error_response(error: CommandError) -> &'static str {
    match error {
        CommandError::MissingParameter(_) => "Missing state parameter",
        _ => "Invalid state value",
    }
}

// ───────────────────────────────────────────────────────────────
// Server (target only)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod server {
    use super::*;
    use crate::app::commands::PetCommand;
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::http::{Headers, Method};
    use esp_idf_svc::io::{Read, Write};
    use log::{info, warn};

    /// Largest accepted OTA chunk per read.
    const OTA_CHUNK: usize = 4096;

    /// Start the control-panel server.  The returned server owns its
    /// task; keep it alive for the lifetime of the firmware.
    pub fn start() -> anyhow::Result<EspHttpServer<'static>> {
        let mut server = EspHttpServer::new(&Configuration::default())?;

        server.fn_handler("/emotion", Method::Get, |request| {
            match parse_state_param(request.uri()) {
                Ok(state) => {
                    if !crate::events::push_command(PetCommand::SetState(state)) {
                        warn!("http: command queue full, /emotion dropped");
                    }
                    let body = emotion_response(state);
                    request.into_ok_response()?.write_all(body.as_bytes())?;
                }
                Err(e) => {
                    request
                        .into_response(400, Some("Bad Request"), &[])?
                        .write_all(emotion_error_response(e).as_bytes())?;
                }
            }
            Ok::<(), anyhow::Error>(())
        })?;

        server.fn_handler("/manual", Method::Get, |request| {
            if !crate::events::push_command(PetCommand::ToggleManualMode) {
                warn!("http: command queue full, /manual dropped");
            }
            request.into_ok_response()?.write_all(b"Manual mode toggled")?;
            Ok::<(), anyhow::Error>(())
        })?;

        server.fn_handler("/feed", Method::Get, |request| {
            if !crate::events::push_command(PetCommand::Feed) {
                warn!("http: command queue full, /feed dropped");
            }
            request.into_ok_response()?.write_all(b"Fed!")?;
            Ok::<(), anyhow::Error>(())
        })?;

        server.fn_handler("/readinglight", Method::Get, |request| {
            if !crate::events::push_command(PetCommand::ToggleReadingLight) {
                warn!("http: command queue full, /readinglight dropped");
            }
            request
                .into_ok_response()?
                .write_all(b"Reading light toggled")?;
            Ok::<(), anyhow::Error>(())
        })?;

        server.fn_handler("/update", Method::Post, |mut request| {
            let len = request.content_len().unwrap_or(0) as usize;
            if len == 0 {
                request
                    .into_response(400, Some("Bad Request"), &[])?
                    .write_all(b"Empty update")?;
                return Ok(());
            }

            info!("http: OTA update starting ({len} bytes)");
            UPDATE_IN_PROGRESS.store(true, Ordering::Relaxed);
            let result = apply_update(&mut request, len);
            UPDATE_IN_PROGRESS.store(false, Ordering::Relaxed);

            match result {
                Ok(completed) => {
                    request.into_ok_response()?.write_all(b"Update OK, rebooting")?;
                    info!("http: OTA update complete, restarting");
                    completed.restart();
                }
                Err(e) => {
                    warn!("http: OTA update failed: {e}");
                    request
                        .into_response(500, Some("Internal Server Error"), &[])?
                        .write_all(b"Update failed")?;
                    Ok::<(), anyhow::Error>(())
                }
            }
        })?;

        info!("http: control panel listening on port 80");
        Ok(server)
    }

    fn apply_update<R>(request: &mut R, len: usize) -> anyhow::Result<esp_ota::CompletedOtaUpdate>
    where
        R: Read,
        R::Error: std::error::Error + Send + Sync + 'static,
    {
        let mut ota = esp_ota::OtaUpdate::begin()?;
        let mut buf = [0u8; OTA_CHUNK];
        let mut remaining = len;

        while remaining > 0 {
            let n = request.read(&mut buf)?;
            if n == 0 {
                anyhow::bail!("connection closed mid-upload");
            }
            ota.write(&buf[..n])?;
            remaining = remaining.saturating_sub(n);
        }

        let mut completed = ota.finalize()?;
        completed.set_as_boot_partition()?;
        Ok(completed)
    }
}

#[cfg(target_os = "espidf")]
pub use server::start;
