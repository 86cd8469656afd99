//! World state and core simulation types
//!
//! Everything the scheduler mutates during a tick lives here. Presentation
//! collaborators only read it between ticks.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::contact::Body;
use super::overlay::CaptureOverlay;
use super::spawn::SpawnConfig;
use crate::Rect;
use crate::consts::*;

/// Stable identifier for a world entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Requested movement direction (the token carried by a control zone)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Stop,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Stop => "stop",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "stop" => Some(Direction::Stop),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit axis vector (zero for stop)
    pub fn axis(&self) -> Vec2 {
        match self {
            Direction::Stop => Vec2::ZERO,
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    /// Facing texture for this direction. Stop keeps whatever was shown.
    pub fn texture(&self) -> Option<&'static str> {
        match self {
            Direction::Stop => None,
            Direction::Up => Some("player_up"),
            Direction::Down => Some("player_down"),
            Direction::Left => Some("player_left"),
            Direction::Right => Some("player_right"),
        }
    }
}

/// Player movement state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementState {
    #[default]
    Stopped,
    MovingUp,
    MovingDown,
    MovingLeft,
    MovingRight,
}

impl From<Direction> for MovementState {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Stop => MovementState::Stopped,
            Direction::Up => MovementState::MovingUp,
            Direction::Down => MovementState::MovingDown,
            Direction::Left => MovementState::MovingLeft,
            Direction::Right => MovementState::MovingRight,
        }
    }
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: MovementState,
    /// Facing texture key (`player_up`, `player_left`, ...)
    pub texture: &'static str,
    /// Collision box size
    pub size: Vec2,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            state: MovementState::Stopped,
            texture: "player_down",
            size: Vec2::splat(PLAYER_SIZE),
        }
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn layer(&self) -> i32 {
        LAYER_PLAYER
    }

    /// Per-entity update hook: integrate velocity, keep the box inside the world
    pub fn update(&mut self, dt: f32, bounds: &WorldBounds) {
        if self.vel == Vec2::ZERO {
            return;
        }
        let limit = (bounds.half_extents() - self.size * 0.5).max(Vec2::ZERO);
        self.pos = (self.pos + self.vel * dt).clamp(-limit, limit);
    }
}

/// A capturable critter
#[derive(Debug, Clone)]
pub struct Collectible {
    pub id: EntityId,
    /// Variant id in `VARIANT_MIN..=VARIANT_MAX`
    pub variant: u16,
    pub pos: Vec2,
    /// Fog-of-war flag, recomputed every tick
    pub visible: bool,
    /// Collision box size
    pub size: Vec2,
}

impl Collectible {
    pub fn new(id: EntityId, variant: u16, pos: Vec2) -> Self {
        Self {
            id,
            variant,
            pos,
            visible: false,
            size: Vec2::splat(CRITTER_SIZE),
        }
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn layer(&self) -> i32 {
        LAYER_CRITTER
    }

    /// Render alpha: opaque when revealed, fully transparent otherwise
    pub fn alpha(&self) -> f32 {
        if self.visible { 1.0 } else { 0.0 }
    }

    /// Sprite key; critter art is named by variant number
    pub fn icon_key(&self) -> String {
        self.variant.to_string()
    }
}

/// Display label for a critter variant
pub fn variant_name(variant: u16) -> String {
    format!("Critter #{:03}", variant)
}

/// World rectangle centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    pub half_width: f32,
    pub half_height: f32,
}

impl WorldBounds {
    /// Bounds matching a background image of the given size
    pub fn from_background(width: f32, height: f32) -> Self {
        Self {
            half_width: width / 2.0,
            half_height: height / 2.0,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.half_width, self.half_height)
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::from_background(BACKGROUND_WIDTH, BACKGROUND_HEIGHT)
    }
}

/// A capture, produced once per removed critter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureEvent {
    pub variant: u16,
    pub collectible: EntityId,
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned {
        id: EntityId,
        variant: u16,
        pos: Vec2,
    },
    Captured(CaptureEvent),
    Turned {
        state: MovementState,
    },
}

/// Tuning shared by the sim modules (immutable for a session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub spawn: SpawnConfig,
    /// Fog-of-war radius
    pub reveal_radius: f32,
    /// Player speed along an axis
    pub player_speed: f32,
    /// Capture overlay lifetime (seconds)
    pub overlay_duration: f32,
    /// Run the built-in overlap pass (disable when a host engine reports contacts)
    pub detect_contacts: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            spawn: SpawnConfig::default(),
            reveal_radius: REVEAL_RADIUS,
            player_speed: PLAYER_SPEED,
            overlay_duration: OVERLAY_DURATION,
            detect_contacts: true,
        }
    }
}

/// Complete world state for one scene
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub config: WorldConfig,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Player, once attached to the world
    pub player: Option<Player>,
    /// Live critters (sorted by id for determinism)
    pub collectibles: Vec<Collectible>,
    /// Capture overlays currently on screen
    pub overlays: Vec<CaptureOverlay>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    /// Contact pairs waiting for the next tick boundary
    pub pending_contacts: Vec<(Body, Body)>,
    next_id: u32,
}

impl GameState {
    /// Create a world with default tuning and the player at the origin
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, WorldConfig::default())
    }

    pub fn with_config(seed: u64, config: WorldConfig) -> Self {
        let mut state = Self::empty(seed, config);
        state.attach_player(Vec2::ZERO);
        state
    }

    /// A world with no player attached yet
    pub fn empty(seed: u64, config: WorldConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            time_ticks: 0,
            player: None,
            collectibles: Vec::new(),
            overlays: Vec::new(),
            events: Vec::new(),
            pending_contacts: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn bounds(&self) -> WorldBounds {
        self.config.spawn.bounds
    }

    /// Attach a fresh player at `pos`, replacing any existing one
    pub fn attach_player(&mut self, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.player = Some(Player::new(id, pos));
        id
    }

    pub fn detach_player(&mut self) -> Option<Player> {
        self.player.take()
    }

    pub fn collectible(&self, id: EntityId) -> Option<&Collectible> {
        self.collectibles.iter().find(|c| c.id == id)
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure critters are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.collectibles.sort_by_key(|c| c.id);
        self.overlays.sort_by_key(|o| o.id);
    }
}
