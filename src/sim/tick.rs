//! Per-frame simulation tick
//!
//! The host calls `Scheduler::tick` once per rendered frame with its clock.
//! Everything that touches the world happens inside that call, in a fixed
//! order, so contacts and input reported between frames never interleave with
//! an update.

use super::contact::{self, Body};
use super::input::MoveCommand;
use super::movement::{move_player, stop_player};
use super::overlay;
use super::spawn::ensure_population;
use super::state::GameState;
use super::visibility;

/// Work queued since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement requests, in arrival order
    pub commands: Vec<MoveCommand>,
    /// Contacts reported by a host engine, in arrival order
    pub contacts: Vec<(Body, Body)>,
}

/// Frame clock bookkeeping
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    last_update_time: Option<f64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_update_time(&self) -> Option<f64> {
        self.last_update_time
    }

    /// Elapsed time since the previous call; zero on the first one
    fn elapsed(&self, current_time: f64) -> f32 {
        match self.last_update_time {
            Some(last) => (current_time - last).max(0.0) as f32,
            None => 0.0,
        }
    }

    /// Advance the world to `current_time` (seconds). Returns the dt used.
    pub fn tick(&mut self, state: &mut GameState, input: &TickInput, current_time: f64) -> f32 {
        let dt = self.elapsed(current_time);
        step(state, input, dt);
        self.last_update_time = Some(current_time);
        dt
    }

    /// Forget the clock (scene teardown); the next tick bootstraps again
    pub fn reset(&mut self) {
        self.last_update_time = None;
    }
}

/// Advance the world by `dt` seconds
pub fn step(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    for command in &input.commands {
        match *command {
            MoveCommand::Move(direction) => {
                move_player(state, direction);
            }
            MoveCommand::Release => stop_player(state),
        }
    }

    // (a) per-entity updates
    let bounds = state.bounds();
    if let Some(player) = state.player.as_mut() {
        player.update(dt, &bounds);
    }
    overlay::update_all(&mut state.overlays, dt);

    // Last tick's overlap pass first, then host reports. Overlays shown here
    // start counting down next tick.
    let detected = std::mem::take(&mut state.pending_contacts);
    for &(a, b) in detected.iter().chain(&input.contacts) {
        contact::resolve_contact(state, a, b);
    }

    // (b) top up the population
    let spawned = ensure_population(state);
    if spawned > 0 {
        log::debug!("Tick {}: spawned {} critters", state.time_ticks, spawned);
    }

    // (c) fog-of-war
    let radius = state.config.reveal_radius;
    match state.player.as_ref().map(|p| p.pos) {
        Some(pos) => visibility::refresh(pos, &mut state.collectibles, radius),
        None => visibility::hide_all(&mut state.collectibles),
    }

    if state.config.detect_contacts {
        state.pending_contacts = contact::detect_overlaps(state);
    }

    state.normalize_order();
}
