//! Contact detection and capture resolution
//!
//! Contacts arrive as unordered body pairs, either from the built-in overlap
//! pass or from a host physics engine. Pairs are canonicalized by matching
//! categories symmetrically, so `(a, b)` and `(b, a)` always resolve alike.

use super::overlay;
use super::state::{CaptureEvent, EntityId, GameEvent, GameState, variant_name};

/// Collision category tags as reported across the engine boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    None,
    Player,
    Collectible,
}

impl Category {
    pub const NONE_BITS: u32 = 0;
    pub const PLAYER_BITS: u32 = 0b1;
    pub const COLLECTIBLE_BITS: u32 = 0b10;

    pub fn bits(&self) -> u32 {
        match self {
            Category::None => Self::NONE_BITS,
            Category::Player => Self::PLAYER_BITS,
            Category::Collectible => Self::COLLECTIBLE_BITS,
        }
    }

    /// Unknown masks map to `None`
    pub fn from_bits(bits: u32) -> Self {
        match bits {
            Self::PLAYER_BITS => Category::Player,
            Self::COLLECTIBLE_BITS => Category::Collectible,
            _ => Category::None,
        }
    }
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Player(EntityId),
    Collectible(EntityId),
    Other,
}

impl Body {
    /// Build from a raw category mask plus the entity the engine attached it to
    pub fn from_tagged(category_bits: u32, entity: EntityId) -> Self {
        match Category::from_bits(category_bits) {
            Category::Player => Body::Player(entity),
            Category::Collectible => Body::Collectible(entity),
            Category::None => Body::Other,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Body::Player(_) => Category::Player,
            Body::Collectible(_) => Category::Collectible,
            Body::Other => Category::None,
        }
    }
}

/// A contact resolved to its semantic roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturePair {
    pub player: EntityId,
    pub collectible: EntityId,
}

/// Resolve an unordered pair into (player, critter), if it is one
pub fn canonicalize(a: Body, b: Body) -> Option<CapturePair> {
    match (a, b) {
        (Body::Player(player), Body::Collectible(collectible))
        | (Body::Collectible(collectible), Body::Player(player)) => Some(CapturePair {
            player,
            collectible,
        }),
        _ => None,
    }
}

/// Apply one contact to the world.
///
/// On a player/critter pair the critter is removed, a single `Captured`
/// event is raised and a capture overlay is shown. Repeat reports of the same
/// contact find the critter already gone and do nothing.
pub fn resolve_contact(state: &mut GameState, a: Body, b: Body) -> Option<CaptureEvent> {
    let pair = canonicalize(a, b)?;

    let Some(player) = state.player.as_ref() else {
        log::warn!("Contact with {} ignored: no player in world", pair.collectible);
        return None;
    };
    if player.id != pair.player {
        log::debug!("Contact from stale player body {} ignored", pair.player);
        return None;
    }

    let index = state
        .collectibles
        .iter()
        .position(|c| c.id == pair.collectible)?;
    let critter = state.collectibles.remove(index);

    let event = CaptureEvent {
        variant: critter.variant,
        collectible: critter.id,
    };
    log::info!("Captured {} (variant {})", critter.id, critter.variant);

    state.events.push(GameEvent::Captured(event));
    overlay::show(state, critter.variant, &variant_name(critter.variant));
    Some(event)
}

/// Overlap pass standing in for the host engine's contact reports.
///
/// Reports every critter whose box overlaps the player's box.
pub fn detect_overlaps(state: &GameState) -> Vec<(Body, Body)> {
    let Some(player) = state.player.as_ref() else {
        return Vec::new();
    };
    let hitbox = player.hitbox();
    state
        .collectibles
        .iter()
        .filter(|c| hitbox.overlaps(&c.hitbox()))
        .map(|c| (Body::Player(player.id), Body::Collectible(c.id)))
        .collect()
}
