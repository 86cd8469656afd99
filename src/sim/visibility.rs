//! Fog-of-war
//!
//! Critters are revealed only while the player is close. Fully recomputed
//! each tick; nothing is remembered between ticks.

use glam::Vec2;

use super::state::Collectible;

/// Mark each critter visible iff it is strictly closer than `threshold`.
///
/// A critter exactly at the threshold stays hidden.
pub fn refresh(player_pos: Vec2, collectibles: &mut [Collectible], threshold: f32) {
    for critter in collectibles.iter_mut() {
        critter.visible = player_pos.distance(critter.pos) < threshold;
    }
}

/// Hide everything (no player to reveal around)
pub fn hide_all(collectibles: &mut [Collectible]) {
    for critter in collectibles.iter_mut() {
        critter.visible = false;
    }
}
