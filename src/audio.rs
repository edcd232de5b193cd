//! Audio cue requests
//!
//! The simulation decides *which* cue fires and *when*; decoding, volume,
//! and looping belong to whatever sink the host wires up.

use serde::{Deserialize, Serialize};

/// Discrete cue requests emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    /// Looping background music for the platform scene
    MusicStart,
    MusicStop,
    /// Death grunt, fired once when the death animation begins
    DeathGrunt,
    /// One-time cue at the milestone collected count
    Milestone,
    /// Finale cue when the last cake is collected
    Finale,
    /// Celebration-scene attack grunt
    AttackGrunt,
    /// Celebration-scene throw grunt
    ThrowGrunt,
    /// Celebration-scene recorded voice message
    VoiceMessage,
    /// Celebration-scene music, after the voice message ends
    CelebrationMusic,
}

/// Destination for cue requests
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Sink that logs each cue; used by the native demo driver and tests
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: AudioCue) {
        log::debug!("audio cue: {:?}", cue);
    }
}

/// Sink that drops every cue
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _cue: AudioCue) {}
}
