//! Scene session: the single owner of world state
//!
//! Hosts push pointer input, engine contacts and audio completions through a
//! `SessionHandle` at any time, from any thread. Nothing is applied until the
//! next `Session::frame`, which drains the inbox, ticks the sim and hands
//! capture events to audio.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;

use crate::audio::{AudioBackend, AudioDirector, CueId, SilentBackend};
use crate::settings::Settings;
use crate::sim::{
    Body, CaptureEvent, ControlPad, EntityId, GameEvent, GameState, PointerEvent, Scheduler,
    TickInput, ensure_population, overlay,
};

/// Messages accepted between frames
#[derive(Debug, Clone)]
pub enum Inbound {
    Pointer(PointerEvent),
    Contact(Body, Body),
    CueFinished(CueId),
}

/// Cloneable, `Send` entry point for external producers
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: Sender<Inbound>,
}

impl SessionHandle {
    fn post(&self, msg: Inbound) {
        if self.tx.send(msg).is_err() {
            log::debug!("Session torn down, message dropped");
        }
    }

    pub fn pointer_down(&self, pos: Vec2) {
        self.post(Inbound::Pointer(PointerEvent::Down(pos)));
    }

    pub fn pointer_up(&self, pos: Vec2) {
        self.post(Inbound::Pointer(PointerEvent::Up(pos)));
    }

    /// Report a contact from a host physics engine, in whatever order it came
    pub fn report_contact(&self, a: Body, b: Body) {
        self.post(Inbound::Contact(a, b));
    }

    /// Same, from raw category masks
    pub fn report_tagged_contact(&self, a: (u32, EntityId), b: (u32, EntityId)) {
        self.report_contact(Body::from_tagged(a.0, a.1), Body::from_tagged(b.0, b.1));
    }
}

/// What one frame did
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub dt: f32,
    pub captures: Vec<CaptureEvent>,
    pub spawned: Vec<EntityId>,
}

/// Game instance holding all state
pub struct Session<B: AudioBackend = SilentBackend> {
    state: GameState,
    scheduler: Scheduler,
    audio: AudioDirector<B>,
    pad: ControlPad,
    tx: Sender<Inbound>,
    rx: Option<Receiver<Inbound>>,
    started: bool,
}

impl<B: AudioBackend> Session<B> {
    pub fn new(settings: &Settings, backend: B) -> Self {
        let seed = settings.seed.unwrap_or_else(clock_seed);
        let state = GameState::with_config(seed, settings.world.clone());
        let pad = ControlPad::d_pad(&state.bounds());
        let (tx, rx) = mpsc::channel();
        log::info!("Session created with seed: {}", seed);
        Self {
            state,
            scheduler: Scheduler::new(),
            audio: AudioDirector::new(backend, &settings.audio),
            pad,
            tx,
            rx: Some(rx),
            started: false,
        }
    }

    /// Scene start: ambient music and the initial population
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.audio.start_ambient();
        let spawned = ensure_population(&mut self.state);
        log::info!("Scene started with {} critters", spawned);
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn pad(&self) -> &ControlPad {
        &self.pad
    }

    pub fn audio(&self) -> &AudioDirector<B> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioDirector<B> {
        &mut self.audio
    }

    pub fn is_torn_down(&self) -> bool {
        self.rx.is_none()
    }

    /// Run one rendered frame at host time `current_time` (seconds)
    pub fn frame(&mut self, current_time: f64) -> FrameReport {
        let Some(rx) = self.rx.as_ref() else {
            log::warn!("Frame after teardown ignored");
            return FrameReport::default();
        };

        let mut input = TickInput::default();
        for msg in rx.try_iter() {
            match msg {
                Inbound::Pointer(event) => input.commands.extend(self.pad.translate(event)),
                Inbound::Contact(a, b) => input.contacts.push((a, b)),
                Inbound::CueFinished(cue) => self.audio.on_cue_finished(cue),
            }
        }

        let mut report = FrameReport {
            dt: self.scheduler.tick(&mut self.state, &input, current_time),
            ..Default::default()
        };

        for event in self.state.drain_events() {
            match event {
                GameEvent::Captured(capture) => {
                    self.audio.play_capture(&self.tx);
                    report.captures.push(capture);
                }
                GameEvent::Spawned { id, .. } => report.spawned.push(id),
                GameEvent::Turned { .. } => {}
            }
        }
        report
    }

    /// Scene teardown. Pending completions, contacts and overlays are
    /// discarded; later messages are dropped.
    pub fn teardown(&mut self) {
        if self.rx.take().is_none() {
            return;
        }
        overlay::clear(&mut self.state);
        self.state.pending_contacts.clear();
        self.state.events.clear();
        self.audio.teardown();
        self.scheduler.reset();
        log::info!("Session torn down");
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tests::RecordingBackend;
    use crate::sim::{Collectible, Direction, MovementState};

    fn settings() -> Settings {
        let mut settings = Settings {
            seed: Some(77),
            ..Default::default()
        };
        settings.world.detect_contacts = false;
        settings
    }

    #[test]
    fn test_start_seeds_population_once() {
        let mut session = Session::new(&settings(), SilentBackend);
        session.start();
        session.start();
        assert_eq!(session.state().collectibles.len(), 3);
    }

    #[test]
    fn test_pointer_input_applies_on_next_frame() {
        let mut session = Session::new(&settings(), SilentBackend);
        session.start();
        session.frame(0.0);

        let right = session
            .pad()
            .zones
            .iter()
            .find(|z| z.name == "controller_right")
            .unwrap()
            .rect
            .center;
        session.handle().pointer_down(right);
        assert_eq!(session.state().player.as_ref().unwrap().state, MovementState::Stopped);

        session.frame(0.016);
        let player = session.state().player.as_ref().unwrap();
        assert_eq!(player.state, MovementState::from(Direction::Right));
        assert_eq!(player.texture, "player_right");

        session.handle().pointer_up(right);
        session.frame(0.032);
        assert_eq!(session.state().player.as_ref().unwrap().vel, Vec2::ZERO);
    }

    #[test]
    fn test_capture_drives_audio_cue() {
        let mut session = Session::new(&settings(), RecordingBackend::default());
        session.start();
        session.frame(0.0);

        let player = session.state().player.as_ref().unwrap().id;
        let id = session.state_mut().next_entity_id();
        session
            .state_mut()
            .collectibles
            .push(Collectible::new(id, 12, Vec2::new(300.0, 0.0)));
        session
            .handle()
            .report_tagged_contact((2, id), (1, player));

        let report = session.frame(0.5);
        assert_eq!(report.captures.len(), 1);
        assert_eq!(session.audio().outstanding(), 1);
        assert_eq!(
            session.audio().backend().calls,
            vec!["loop background_music", "pause background_music", "play capture_sound"]
        );

        // Backend signals completion; ambient resumes on the following frame
        let done = session.audio_mut().backend_mut().pending.pop().unwrap();
        done.complete();
        session.frame(0.6);
        assert_eq!(session.audio().outstanding(), 0);
        assert_eq!(
            session.audio().backend().calls.last().unwrap(),
            "resume background_music"
        );
    }

    #[test]
    fn test_teardown_discards_pending_work() {
        let mut session = Session::new(&settings(), RecordingBackend::default());
        session.start();
        session.frame(0.0);
        let player = session.state().player.as_ref().unwrap().id;
        let critter = session.state().collectibles[0].id;
        let handle = session.handle();
        handle.report_contact(Body::Player(player), Body::Collectible(critter));
        session.frame(0.1);
        assert_eq!(session.state().overlays.len(), 1);

        session.teardown();
        assert!(session.is_torn_down());
        assert!(session.state().overlays.is_empty());

        // Late messages and completions go nowhere
        handle.pointer_down(Vec2::ZERO);
        session.audio_mut().backend_mut().pending.pop().unwrap().complete();
        let report = session.frame(0.2);
        assert!(report.captures.is_empty());
        assert_eq!(
            session.audio().backend().calls.last().unwrap(),
            "stop background_music"
        );
    }
}
