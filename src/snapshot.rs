//! Per-tick draw state
//!
//! A renderer never reads [`GameState`] directly; it takes a snapshot
//! after each tick and draws from that. The snapshot is plain data and
//! serializes cleanly, which also makes it the capture format for replay
//! dumps and the headless demo driver's frame log.

use serde::{Deserialize, Serialize};

use crate::sim::animation::AnimationKey;
use crate::sim::state::{Facing, GameState, Screen};

/// Everything needed to draw the player this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Collision box top-left, world pixels
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub animation: AnimationKey,
    pub frame_index: u32,
    /// Source frame geometry for the active sheet
    pub frame_width: f32,
    pub frame_height: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CakeView {
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

/// Immutable view of one tick's draw state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawSnapshot {
    pub screen: Screen,
    pub time_left: u32,
    pub cakes_collected: u32,
    pub total_cakes: u32,
    pub player: PlayerView,
    pub cakes: Vec<CakeView>,
}

impl GameState {
    pub fn snapshot(&self) -> DrawSnapshot {
        let (_, anim) = self.catalog.get_or_idle(self.player.animation);
        DrawSnapshot {
            screen: self.screen,
            time_left: self.time_left,
            cakes_collected: self.cakes_collected,
            total_cakes: self.total_cakes,
            player: PlayerView {
                x: self.player.pos.x,
                y: self.player.pos.y,
                facing: self.player.facing,
                animation: self.player.animation,
                frame_index: self.player.cursor.frame_index,
                frame_width: anim.frame_width,
                frame_height: anim.frame_height,
                scale: anim.scale,
            },
            cakes: self
                .cakes
                .iter()
                .map(|c| CakeView {
                    x: c.pos.x,
                    y: c.pos.y,
                    collected: c.collected,
                })
                .collect(),
        }
    }
}
