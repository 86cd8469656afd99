//! Critter Catch - top-down catch-the-critter mini-game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, fog-of-war, contacts, movement)
//! - `audio`: Ambient track and capture cue sequencing over a pluggable backend
//! - `session`: Frame driver that owns the world and marshals external events
//! - `settings`: Data-driven game tuning

pub mod audio;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Session, SessionHandle};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Background asset dimensions; the world is centered on the origin
    pub const BACKGROUND_WIDTH: f32 = 1024.731;
    pub const BACKGROUND_HEIGHT: f32 = 753.924;

    /// Critters kept alive in the world at once
    pub const TARGET_POPULATION: usize = 3;
    /// Keep spawns this far from the world edge (roughly one critter sprite)
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Variant ids are drawn uniformly from this inclusive range
    pub const VARIANT_MIN: u16 = 1;
    pub const VARIANT_MAX: u16 = 151;

    /// Fog-of-war: critters closer than this are drawn opaque
    pub const REVEAL_RADIUS: f32 = 200.0;

    /// Player speed along an axis (units/s)
    pub const PLAYER_SPEED: f32 = 100.0;
    /// Player collision box
    pub const PLAYER_SIZE: f32 = 48.0;
    /// Critter collision box
    pub const CRITTER_SIZE: f32 = 60.0;

    /// Capture overlay lifetime (seconds)
    pub const OVERLAY_DURATION: f32 = 2.0;
    /// Capture overlay icon footprint
    pub const OVERLAY_ICON_SIZE: f32 = 100.0;
    /// Gap between icon bottom edge and label baseline
    pub const OVERLAY_LABEL_GAP: f32 = 24.0;

    /// Draw layers
    pub const LAYER_CRITTER: i32 = 1;
    pub const LAYER_PLAYER: i32 = 2;
    pub const LAYER_CONTROLS: i32 = 10;
    pub const LAYER_OVERLAY: i32 = 100;
}

/// Axis-aligned rectangle given by center and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half.x && d.y <= self.half.y
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }
}
