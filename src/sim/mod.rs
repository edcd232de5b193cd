//! Deterministic game simulation
//!
//! Everything here is pure state-in, state-out: no clocks, no rendering,
//! no audio output. The host drives [`tick`] at a fixed rate, calls
//! [`GameState::countdown_second`] once per second, and drains events and
//! cues after each tick. Running the same inputs against the same starting
//! state always produces the same result.

pub mod animation;
pub mod celebration;
pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use animation::{Animation, AnimationCatalog, AnimationKey, FrameCursor};
pub use celebration::Celebration;
pub use collision::{SupportQuery, can_stand_at, resolve_support};
pub use level::{Level, LevelError, Platform, Slope};
pub use state::{Cake, Facing, GameEvent, GameState, Player, Screen};
pub use tick::{TickInput, tick};
