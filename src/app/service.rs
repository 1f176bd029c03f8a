//! Application service: glues the engine, renderer and ports together.
//!
//! The control loop in `main` owns one `PetService` and calls
//! [`tick`](PetService::tick) once per frame, feeding it commands drained
//! from the queue in between.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::app::commands::PetCommand;
use crate::app::events::PetEvent;
use crate::app::ports::{DisplayPort, EventSink, HungerStore};
use crate::config::PetConfig;
use crate::engine::AnimationEngine;
use crate::error::Result;
use crate::render::Renderer;

pub struct PetService {
    engine: AnimationEngine,
    renderer: Renderer,
    rng: SmallRng,
}

impl PetService {
    /// Bring the service up: restore hunger from storage and seed the
    /// engine's RNG from the boot timestamp so each boot animates
    /// differently.
    pub fn new(config: PetConfig, store: &impl HungerStore, now_ms: u32) -> Self {
        let mut rng = SmallRng::seed_from_u64(u64::from(now_ms));
        let hunger = store.load_hunger();
        info!("engine starting with hunger {hunger}%");
        Self {
            engine: AnimationEngine::new(config, hunger, now_ms, &mut rng),
            renderer: Renderer::new(),
            rng,
        }
    }

    /// Announce the initial state to the sink.
    pub fn start(&self, sink: &mut impl EventSink) {
        sink.emit(&PetEvent::Started(self.engine.state()));
    }

    pub fn engine(&self) -> &AnimationEngine {
        &self.engine
    }

    /// Apply one queued command.
    ///
    /// Command rejections propagate to the caller (the HTTP layer mapped
    /// them to 400 before queueing, so here they only mean a disabled
    /// variant feature); dropped state requests do not.
    pub fn handle_command(
        &mut self,
        command: PetCommand,
        now_ms: u32,
        store: &mut impl HungerStore,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match command {
            PetCommand::SetState(state) => {
                let accepted = self.engine.set_state(state, now_ms)?;
                debug!("external state request {state:?}: accepted={accepted}");
            }
            PetCommand::ToggleManualMode => {
                let manual = self.engine.toggle_manual_mode(now_ms)?;
                sink.emit(&PetEvent::ManualMode(manual));
            }
            PetCommand::Feed => {
                let hunger = self.engine.feed(now_ms, store);
                sink.emit(&PetEvent::Fed { hunger });
            }
            PetCommand::ToggleReadingLight => {
                let on = self.renderer.toggle_reading_light();
                sink.emit(&PetEvent::ReadingLight(on));
            }
        }
        Ok(())
    }

    /// Advance one frame and draw it.
    ///
    /// `update_in_progress` pauses animation and rendering so an OTA
    /// flash gets the bus and the CPU to itself.
    pub fn tick(
        &mut self,
        now_ms: u32,
        display: &mut impl DisplayPort,
        store: &mut impl HungerStore,
        sink: &mut impl EventSink,
        update_in_progress: bool,
    ) -> Result<()> {
        if update_in_progress {
            return Ok(());
        }

        let state_before = self.engine.state();
        let hunger_before = self.engine.hunger_level();

        self.engine.tick(now_ms, &mut self.rng, store);

        let state_after = self.engine.state();
        if state_after != state_before {
            sink.emit(&PetEvent::StateChanged { from: state_before, to: state_after });
        }
        let hunger_after = self.engine.hunger_level();
        if hunger_after != hunger_before {
            sink.emit(&PetEvent::HungerChanged(hunger_after));
        }

        let frame = self.engine.frame(now_ms);
        self.renderer.render(&frame, display)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::{DisplayError, StorageError};
    use crate::engine::state::EyeState;

    #[derive(Default)]
    struct MockDisplay {
        presents: u32,
    }

    impl DisplayPort for MockDisplay {
        fn clear(&mut self) {}
        fn fill_screen(&mut self) {}
        fn fill_ellipse(&mut self, _: i32, _: i32, _: i32, _: i32, _: f32) {}
        fn fill_diamond(&mut self, _: i32, _: i32, _: i32) {}
        fn present(&mut self) -> core::result::Result<(), DisplayError> {
            self.presents += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockStore {
        hunger: u8,
    }

    impl HungerStore for MockStore {
        fn load_hunger(&self) -> u8 {
            self.hunger
        }
        fn save_hunger(&mut self, level: u8) -> core::result::Result<(), StorageError> {
            self.hunger = level;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<PetEvent>,
    }

    impl EventSink for RecordingSink {
        fn emit(&mut self, event: &PetEvent) {
            self.events.push(*event);
        }
    }

    #[test]
    fn start_emits_initial_state() {
        let store = MockStore { hunger: 100 };
        let service = PetService::new(PetConfig::default(), &store, 0);
        let mut sink = RecordingSink::default();
        service.start(&mut sink);
        assert_eq!(sink.events, vec![PetEvent::Started(EyeState::Neutral)]);
    }

    #[test]
    fn feed_command_emits_fed_event() {
        let mut store = MockStore { hunger: 40 };
        let mut service = PetService::new(PetConfig::default(), &store, 0);
        let mut sink = RecordingSink::default();

        service
            .handle_command(PetCommand::Feed, 0, &mut store, &mut sink)
            .unwrap();
        assert_eq!(sink.events, vec![PetEvent::Fed { hunger: 100 }]);
        assert_eq!(store.hunger, 100);
    }

    #[test]
    fn state_change_is_reported_once_on_commit() {
        let mut store = MockStore { hunger: 100 };
        let mut service = PetService::new(PetConfig::default(), &store, 0);
        let mut display = MockDisplay::default();
        let mut sink = RecordingSink::default();

        service
            .handle_command(
                PetCommand::SetState(EyeState::Angry),
                0,
                &mut store,
                &mut sink,
            )
            .unwrap();
        sink.events.clear();

        let mut now = 0;
        while now < 400 {
            now += 16;
            service
                .tick(now, &mut display, &mut store, &mut sink, false)
                .unwrap();
        }

        let changes: Vec<_> = sink
            .events
            .iter()
            .filter(|e| matches!(e, PetEvent::StateChanged { .. }))
            .collect();
        assert_eq!(
            changes,
            vec![&PetEvent::StateChanged { from: EyeState::Neutral, to: EyeState::Angry }]
        );
    }

    #[test]
    fn tick_is_suspended_during_update() {
        let mut store = MockStore { hunger: 100 };
        let mut service = PetService::new(PetConfig::default(), &store, 0);
        let mut display = MockDisplay::default();
        let mut sink = RecordingSink::default();

        service
            .tick(16, &mut display, &mut store, &mut sink, true)
            .unwrap();
        assert_eq!(display.presents, 0);
        assert!(sink.events.is_empty());
    }
}
