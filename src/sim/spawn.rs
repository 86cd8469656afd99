//! Critter population management
//!
//! Keeps the world topped up to a target count. Spawning only ever adds;
//! captures are the only thing that lowers the count.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Collectible, EntityId, GameEvent, GameState, WorldBounds};
use crate::consts::*;

/// Population and placement rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Critters to keep alive
    pub target: usize,
    /// Distance kept between spawns and the world edge
    pub margin: f32,
    pub bounds: WorldBounds,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            target: TARGET_POPULATION,
            margin: SPAWN_MARGIN,
            bounds: WorldBounds::default(),
        }
    }
}

impl SpawnConfig {
    /// Inclusive placement ranges per axis.
    ///
    /// A margin wider than the world collapses that axis to the center line.
    pub fn placement_range(&self) -> (Vec2, Vec2) {
        let inset = self.bounds.half_extents() - Vec2::splat(self.margin);
        ((-inset).min(Vec2::ZERO), inset.max(Vec2::ZERO))
    }

    /// How many critters must be added to reach the target
    pub fn needed(&self, current_count: usize) -> usize {
        self.target.saturating_sub(current_count)
    }
}

/// Top the world up to the target population.
///
/// Returns the number of critters spawned.
pub fn ensure_population(state: &mut GameState) -> usize {
    let needed = state.config.spawn.needed(state.collectibles.len());
    for _ in 0..needed {
        spawn_one(state);
    }
    needed
}

/// Spawn a single hidden critter at a random spot inside the placement area
pub fn spawn_one(state: &mut GameState) -> EntityId {
    let (lo, hi) = state.config.spawn.placement_range();
    let id = state.next_entity_id();

    let rng = state.rng();
    let variant = rng.random_range(VARIANT_MIN..=VARIANT_MAX);
    let pos = Vec2::new(
        sample_axis(rng, lo.x, hi.x),
        sample_axis(rng, lo.y, hi.y),
    );

    // Joining the collection is what registers the body with the overlap pass
    state.collectibles.push(Collectible::new(id, variant, pos));
    state.events.push(GameEvent::Spawned { id, variant, pos });

    log::debug!("Spawning critter {} (variant {}) at {:?}", id, variant, pos);
    id
}

fn sample_axis(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if lo < hi { rng.random_range(lo..=hi) } else { lo }
}
