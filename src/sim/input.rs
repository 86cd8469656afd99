//! Pointer input and the on-screen control pad
//!
//! A pointer-down is hit-tested against named control zones
//! (`controller_<direction>`); the direction token is all movement ever sees.

use glam::Vec2;
use super::state::{Direction, WorldBounds};
use crate::Rect;
use crate::consts::LAYER_CONTROLS;

/// Name prefix shared by every control zone
pub const ZONE_PREFIX: &str = "controller_";

/// D-pad button size
const BUTTON_SIZE: f32 = 64.0;
/// Distance from pad center to each arrow button
const BUTTON_SPACING: f32 = 70.0;
/// Pad center inset from the lower-left world corner
const PAD_INSET: f32 = 130.0;

/// Raw pointer input as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Up(Vec2),
}

/// Movement request consumed by the tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCommand {
    Move(Direction),
    /// Input released: zero velocity, keep direction state
    Release,
}

/// A named, hit-testable rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct ControlZone {
    pub name: String,
    pub rect: Rect,
    pub layer: i32,
}

/// The set of control zones currently on screen
#[derive(Debug, Clone, Default)]
pub struct ControlPad {
    pub zones: Vec<ControlZone>,
}

impl ControlPad {
    pub fn new(zones: Vec<ControlZone>) -> Self {
        Self { zones }
    }

    /// Five-button d-pad in the lower-left corner of the world
    pub fn d_pad(bounds: &WorldBounds) -> Self {
        let center = -bounds.half_extents() + Vec2::splat(PAD_INSET);
        let size = Vec2::splat(BUTTON_SIZE);
        let zones = [
            (Direction::Stop, Vec2::ZERO),
            (Direction::Up, Vec2::Y),
            (Direction::Down, Vec2::NEG_Y),
            (Direction::Left, Vec2::NEG_X),
            (Direction::Right, Vec2::X),
        ]
        .into_iter()
        .map(|(dir, offset)| ControlZone {
            name: zone_name(dir),
            rect: Rect::new(center + offset * BUTTON_SPACING, size),
            layer: LAYER_CONTROLS,
        })
        .collect();
        Self::new(zones)
    }

    /// Names of every zone under `point`
    pub fn hit_test(&self, point: Vec2) -> impl Iterator<Item = &str> + '_ {
        self.zones
            .iter()
            .filter(move |z| z.rect.contains(point))
            .map(|z| z.name.as_str())
    }

    /// Translate a pointer event into movement commands
    pub fn translate(&self, event: PointerEvent) -> Vec<MoveCommand> {
        match event {
            PointerEvent::Down(point) => self
                .hit_test(point)
                .filter_map(parse_zone)
                .map(MoveCommand::Move)
                .collect(),
            PointerEvent::Up(_) => vec![MoveCommand::Release],
        }
    }
}

/// Zone name for a direction
pub fn zone_name(direction: Direction) -> String {
    format!("{}{}", ZONE_PREFIX, direction.as_str())
}

/// Direction carried by a zone name; anything unrecognized is `None`
pub fn parse_zone(name: &str) -> Option<Direction> {
    name.strip_prefix(ZONE_PREFIX).and_then(Direction::from_token)
}
