//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - World mutated only inside a tick
//! - No rendering, audio or platform dependencies

pub mod contact;
pub mod input;
pub mod movement;
pub mod overlay;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod visibility;

pub use contact::{Body, CapturePair, Category, canonicalize, detect_overlaps, resolve_contact};
pub use input::{ControlPad, ControlZone, MoveCommand, PointerEvent, parse_zone};
pub use movement::{move_player, stop_player};
pub use overlay::CaptureOverlay;
pub use spawn::{SpawnConfig, ensure_population, spawn_one};
pub use state::{
    CaptureEvent, Collectible, Direction, EntityId, GameEvent, GameState, MovementState, Player,
    WorldBounds, WorldConfig, variant_name,
};
pub use tick::{Scheduler, TickInput, step};
