//! Player movement from discrete direction inputs
//!
//! A five-state machine. Re-issuing the current direction is a no-op, so a
//! held or repeated control never restarts the walk animation.

use super::state::{Direction, GameEvent, GameState, MovementState};

/// Apply a direction request to the player.
///
/// Returns true when the state actually changed.
pub fn move_player(state: &mut GameState, direction: Direction) -> bool {
    let speed = state.config.player_speed;
    let Some(player) = state.player.as_mut() else {
        log::warn!("Move {} ignored: no player in world", direction.as_str());
        return false;
    };

    let next = MovementState::from(direction);
    if player.state == next {
        return false;
    }

    log::debug!("Move player: {}", direction.as_str());
    player.state = next;
    player.vel = direction.axis() * speed;
    if let Some(texture) = direction.texture() {
        player.texture = texture;
    }

    state.events.push(GameEvent::Turned { state: next });
    true
}

/// Zero the player's velocity (input released). The direction state is kept.
pub fn stop_player(state: &mut GameState) {
    match state.player.as_mut() {
        Some(player) => player.vel = glam::Vec2::ZERO,
        None => log::warn!("Stop ignored: no player in world"),
    }
}
