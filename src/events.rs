//! Cross-thread command queue.
//!
//! Commands are produced by the HTTP server task and consumed by the
//! main control loop, one queue per direction of exactly one thread:
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ HTTP handler │────▶│ Command Queue │────▶│  Main Loop   │
//! │  (producer)  │     │  (lock-free)  │     │  (consumer)  │
//! └──────────────┘     └───────────────┘     └──────────────┘
//! ```
//!
//! The queue carries single command bytes so the HTTP task never blocks
//! and the loop drains everything pending between frames.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::app::commands::PetCommand;
use crate::engine::state::EyeState;

/// Maximum number of pending commands.
/// Power of 2 for efficient ring buffer modulo.
const COMMAND_QUEUE_CAP: usize = 32;

/// Wire codes above the state-index range (0..=10).
const CODE_TOGGLE_MANUAL: u8 = 32;
const CODE_FEED: u8 = 33;
const CODE_TOGGLE_READING_LIGHT: u8 = 34;

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// HTTP task writes (produce), main loop reads (consume).
// Uses atomic head/tail indices; the buffer lives in a static so the
// server callbacks can reach it without threading a handle through
// esp-idf-svc's handler closures.

static COMMAND_HEAD: AtomicU8 = AtomicU8::new(0);
static COMMAND_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: one producer (HTTP server task), one consumer (main loop).
// Each slot is written before the head release-store publishes it and
// read before the tail release-store retires it, so no concurrent
// access to a slot is possible.
static mut COMMAND_BUFFER: [u8; COMMAND_QUEUE_CAP] = [0; COMMAND_QUEUE_CAP];

/// Push a command into the queue.
/// Safe to call from the HTTP task (lock-free).
/// Returns `false` if the queue is full (command dropped).
pub fn push_command(command: PetCommand) -> bool {
    let head = COMMAND_HEAD.load(Ordering::Relaxed);
    let tail = COMMAND_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % COMMAND_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop command.
    }

    unsafe {
        COMMAND_BUFFER[head as usize] = encode(command);
    }

    COMMAND_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next command from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_command() -> Option<PetCommand> {
    let tail = COMMAND_TAIL.load(Ordering::Relaxed);
    let head = COMMAND_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = unsafe { COMMAND_BUFFER[tail as usize] };
    COMMAND_TAIL.store((tail + 1) % COMMAND_QUEUE_CAP as u8, Ordering::Release);

    decode(raw)
}

/// Drain all pending commands into a callback, FIFO order.
pub fn drain_commands(mut handler: impl FnMut(PetCommand)) {
    while let Some(command) = pop_command() {
        handler(command);
    }
}

/// Number of pending commands.
pub fn queue_len() -> usize {
    let head = COMMAND_HEAD.load(Ordering::Relaxed) as usize;
    let tail = COMMAND_TAIL.load(Ordering::Relaxed) as usize;
    (head + COMMAND_QUEUE_CAP - tail) % COMMAND_QUEUE_CAP
}

// ── Internal ──────────────────────────────────────────────────

fn encode(command: PetCommand) -> u8 {
    match command {
        PetCommand::SetState(state) => state as u8,
        PetCommand::ToggleManualMode => CODE_TOGGLE_MANUAL,
        PetCommand::Feed => CODE_FEED,
        PetCommand::ToggleReadingLight => CODE_TOGGLE_READING_LIGHT,
    }
}

fn decode(raw: u8) -> Option<PetCommand> {
    match raw {
        CODE_TOGGLE_MANUAL => Some(PetCommand::ToggleManualMode),
        CODE_FEED => Some(PetCommand::Feed),
        CODE_TOGGLE_READING_LIGHT => Some(PetCommand::ToggleReadingLight),
        idx => EyeState::from_index(idx).map(PetCommand::SetState),
    }
}
