//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing engine events to the ESP-IDF
//! logger (UART / USB-CDC in production, stdout on the host).

use log::info;

use crate::app::events::PetEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`PetEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PetEvent) {
        match event {
            PetEvent::Started(state) => {
                info!("START | initial_state={state:?}");
            }
            PetEvent::StateChanged { from, to } => {
                info!("STATE | {from:?} -> {to:?}");
            }
            PetEvent::ManualMode(on) => {
                info!("MODE  | manual={on}");
            }
            PetEvent::Fed { hunger } => {
                info!("FEED  | hunger={hunger}%");
            }
            PetEvent::HungerChanged(level) => {
                info!("HUNGER| level={level}%");
            }
            PetEvent::ReadingLight(on) => {
                info!("LIGHT | reading_light={on}");
            }
        }
    }
}
