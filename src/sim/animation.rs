//! Animation catalog and physics-driven state selection
//!
//! Frame geometry is measured once from the loaded sprite sheets and is
//! constant afterwards. The selector never produces a frame index outside
//! the bounds of the animation it selects.

use serde::{Deserialize, Serialize};

use crate::consts::SPRITE_SCALE;

/// The fixed set of animations across both scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKey {
    Idle,
    Run,
    JumpStart,
    /// Apex transition; defined by the art but unused by the platform scene
    JumpTransition,
    JumpFall,
    Attack,
    Death,
    // Celebration scene
    Attack1,
    Attack2,
    Attack3,
    AirAttack,
    ThrowAttack,
    SpecialAttack,
}

impl AnimationKey {
    /// Death latches on its final frame instead of wrapping
    pub fn latches(self) -> bool {
        self == AnimationKey::Death
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnimationKey::Idle => "idle",
            AnimationKey::Run => "run",
            AnimationKey::JumpStart => "jump-start",
            AnimationKey::JumpTransition => "jump-transition",
            AnimationKey::JumpFall => "jump-fall",
            AnimationKey::Attack => "attack",
            AnimationKey::Death => "death",
            AnimationKey::Attack1 => "attack1",
            AnimationKey::Attack2 => "attack2",
            AnimationKey::Attack3 => "attack3",
            AnimationKey::AirAttack => "air-attack",
            AnimationKey::ThrowAttack => "throw-attack",
            AnimationKey::SpecialAttack => "special-attack",
        }
    }
}

/// Immutable playback record for one animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub frames: u32,
    /// Simulation ticks each frame is held for
    pub ticks_per_frame: u32,
    pub frame_width: f32,
    pub frame_height: f32,
    pub scale: f32,
}

impl Animation {
    /// Derive frame geometry from a loaded sheet's pixel dimensions.
    ///
    /// Called once per sheet after the asset provider reports readiness.
    pub fn measure(sheet_width: f32, sheet_height: f32, frames: u32, ticks_per_frame: u32) -> Self {
        Self {
            frames,
            ticks_per_frame,
            frame_width: sheet_width / frames as f32,
            frame_height: sheet_height,
            scale: SPRITE_SCALE,
        }
    }

    pub fn visual_width(&self) -> f32 {
        self.frame_width * self.scale
    }

    pub fn visual_height(&self) -> f32 {
        self.frame_height * self.scale
    }

    /// Total ticks for one full playback cycle
    pub fn cycle_ticks(&self) -> u32 {
        self.frames * self.ticks_per_frame
    }
}

/// Read-only lookup from animation key to playback record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationCatalog {
    entries: Vec<(AnimationKey, Animation)>,
}

impl AnimationCatalog {
    pub fn new(entries: Vec<(AnimationKey, Animation)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: AnimationKey) -> Option<&Animation> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, a)| a)
    }

    /// Look up an animation, degrading to Idle when the key is missing.
    ///
    /// A missing entry is an asset anomaly, not a reason to stall the
    /// frame loop; the fallback is logged and play continues.
    pub fn get_or_idle(&self, key: AnimationKey) -> (AnimationKey, &Animation) {
        if let Some(anim) = self.get(key) {
            return (key, anim);
        }
        log::warn!("no animation metadata for {:?}, falling back to idle", key);
        let idle = self
            .get(AnimationKey::Idle)
            .expect("catalog must always contain idle");
        (AnimationKey::Idle, idle)
    }

    /// Catalog matching the shipped sprite sheets (35x44 frames, 2x scale)
    pub fn standard() -> Self {
        const FRAME_W: f32 = 35.0;
        const FRAME_H: f32 = 44.0;
        let sheet = |frames: u32, ticks: u32| {
            Animation::measure(FRAME_W * frames as f32, FRAME_H, frames, ticks)
        };
        Self::new(vec![
            (AnimationKey::Idle, sheet(10, 10)),
            (AnimationKey::Run, sheet(16, 8)),
            (AnimationKey::JumpStart, sheet(3, 6)),
            (AnimationKey::JumpTransition, sheet(3, 6)),
            (AnimationKey::JumpFall, sheet(3, 6)),
            (AnimationKey::Attack, sheet(6, 8)),
            (AnimationKey::Death, sheet(9, 8)),
            (AnimationKey::Attack1, sheet(7, 8)),
            (AnimationKey::Attack2, sheet(7, 8)),
            (AnimationKey::Attack3, sheet(6, 8)),
            (AnimationKey::AirAttack, sheet(6, 8)),
            (AnimationKey::ThrowAttack, sheet(7, 8)),
            (AnimationKey::SpecialAttack, sheet(14, 8)),
        ])
    }
}

/// Sub-frame playback cursor: current frame plus tick accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCursor {
    pub frame_index: u32,
    pub ticks: u32,
}

impl FrameCursor {
    /// Reset to the first frame (on every animation switch)
    pub fn rewind(&mut self) {
        self.frame_index = 0;
        self.ticks = 0;
    }

    /// Advance one simulation tick.
    ///
    /// Wraps modulo the frame count, except for latching animations which
    /// clamp on their final frame. Returns true the tick the final frame
    /// of a latching animation is first reached.
    pub fn advance(&mut self, key: AnimationKey, anim: &Animation) -> bool {
        self.ticks += 1;
        if self.ticks < anim.ticks_per_frame {
            return false;
        }
        self.ticks = 0;
        if key.latches() {
            if self.frame_index + 1 < anim.frames {
                self.frame_index += 1;
                return self.frame_index == anim.frames - 1;
            }
            return false;
        }
        self.frame_index = (self.frame_index + 1) % anim.frames;
        false
    }
}
