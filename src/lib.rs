//! Cake Dash - a timed cake-collecting platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, game state)
//! - `audio`: Cue requests for an external playback sink
//! - `snapshot`: Per-tick draw-state view for a renderer to consume
//! - `settings`: User preferences

pub mod audio;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use settings::Settings;

/// Game tuning constants
///
/// Pixel-space values are tied to the source art (1984x1088 scene,
/// 35x44 sprite frames at 2x scale) and must not drift independently.
pub mod consts {
    /// World dimensions in pixels
    pub const WORLD_WIDTH: f32 = 1984.0;
    pub const WORLD_HEIGHT: f32 = 1088.0;

    /// Nominal driver tick rate; delays below are expressed in these ticks
    pub const TICKS_PER_SECOND: u64 = 60;

    /// Player kinematics (per-tick units, not per-second)
    pub const RUN_SPEED: f32 = 7.0;
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_IMPULSE: f32 = -15.0;
    /// Tiny downward push when walking off a ledge, so the fall branch engages
    pub const FALL_SEED_SPEED: f32 = 0.1;

    /// Vertical distance from the player box bottom to the visual feet
    pub const COLLISION_OFFSET: f32 = 30.0;
    /// Sprite art is drawn at 2x
    pub const SPRITE_SCALE: f32 = 2.0;

    /// Platform support test: vertical tolerance and edge margin
    pub const PLATFORM_TOLERANCE: f32 = 5.0;
    pub const PLATFORM_EDGE_MARGIN: f32 = 10.0;
    /// Tighter pre-movement stand check used by input handling
    pub const STAND_TOLERANCE: f32 = 2.0;
    pub const STAND_EDGE_MARGIN: f32 = 5.0;

    /// Pickup alignment window around the cake anchor point
    pub const PICKUP_RANGE_X: f32 = 20.0;
    pub const PICKUP_RANGE_Y: f32 = 10.0;
    /// Cakes render below their logical origin by half their height plus this
    pub const CAKE_ANCHOR_DROP: f32 = 8.0;

    /// Countdown length in seconds
    pub const ROUND_SECONDS: u32 = 60;
    /// Collected count that fires the one-time milestone cue
    pub const MILESTONE_CAKES: u32 = 6;

    /// Delay from death-animation completion to restart
    pub const DEATH_RESTART_DELAY_TICKS: u64 = TICKS_PER_SECOND;
    /// Nominal finale cue length (asset-tied; the core cannot measure audio)
    pub const FINALE_CUE_TICKS: u64 = 4 * TICKS_PER_SECOND;
    /// Extra padding after the finale cue before the victory transition
    pub const FINALE_EXTRA_DELAY_TICKS: u64 = 2 * TICKS_PER_SECOND;
    /// Delay from entering victory to handing off to the celebration scene
    pub const SCENE_HANDOFF_DELAY_TICKS: u64 = TICKS_PER_SECOND;
}
