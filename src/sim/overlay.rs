//! Capture feedback overlay
//!
//! Each capture gets its own icon + label pair, centered on screen above all
//! gameplay layers, that removes itself after a fixed delay. Instances never
//! queue or merge.

use glam::Vec2;

use super::state::{EntityId, GameState};
use crate::consts::*;

/// One on-screen capture notice
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOverlay {
    pub id: EntityId,
    pub variant: u16,
    /// Sprite key of the captured critter
    pub icon_key: String,
    pub icon_pos: Vec2,
    pub icon_size: Vec2,
    pub label: String,
    pub label_pos: Vec2,
    pub layer: i32,
    /// Seconds until removal
    pub remaining: f32,
}

impl CaptureOverlay {
    pub fn new(id: EntityId, variant: u16, name: &str, duration: f32) -> Self {
        let icon_size = Vec2::splat(OVERLAY_ICON_SIZE);
        let icon_pos = Vec2::ZERO;
        Self {
            id,
            variant,
            icon_key: variant.to_string(),
            icon_pos,
            icon_size,
            label: name.to_string(),
            label_pos: icon_pos - Vec2::new(0.0, icon_size.y / 2.0 + OVERLAY_LABEL_GAP),
            layer: LAYER_OVERLAY,
            remaining: duration,
        }
    }

    /// Per-entity update hook: count down the display timer
    pub fn update(&mut self, dt: f32) {
        self.remaining -= dt;
    }

    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Put a new overlay on screen. Returns its id.
pub fn show(state: &mut GameState, variant: u16, name: &str) -> EntityId {
    let id = state.next_entity_id();
    let duration = state.config.overlay_duration;
    state
        .overlays
        .push(CaptureOverlay::new(id, variant, name, duration));
    id
}

/// Advance every overlay timer and drop the finished ones
pub fn update_all(overlays: &mut Vec<CaptureOverlay>, dt: f32) {
    for overlay in overlays.iter_mut() {
        overlay.update(dt);
    }
    overlays.retain(|o| !o.expired());
}

/// Discard every overlay without side effects (scene teardown)
pub fn clear(state: &mut GameState) {
    state.overlays.clear();
}
