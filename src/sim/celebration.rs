//! Victory celebration scene
//!
//! A fixed choreography, not a playable scene: a short idle intro, then a
//! scripted run of attack animations with sound cues timed to land near
//! each swing, then an idle ending that plays the recorded voice message.
//! The host reports when the message finishes so the celebration music can
//! start behind it.

use super::animation::{AnimationCatalog, AnimationKey, FrameCursor};
use super::state::Facing;
use crate::audio::AudioCue;
use crate::consts::TICKS_PER_SECOND;

const INTRO_TICKS: u32 = TICKS_PER_SECOND as u32;
/// Extra delay so the throw grunt lands on the release frame
const THROW_GRUNT_DELAY_TICKS: u32 = 15;

/// Scripted attack sequence, in playback order
const STEPS: [(AnimationKey, Facing); 5] = [
    (AnimationKey::Attack1, Facing::Right),
    (AnimationKey::Attack2, Facing::Left),
    (AnimationKey::AirAttack, Facing::Left),
    (AnimationKey::ThrowAttack, Facing::Right),
    (AnimationKey::SpecialAttack, Facing::Right),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Intro,
    Step(usize),
    Ending,
}

/// Celebration playback state
#[derive(Debug, Clone)]
pub struct Celebration {
    phase: Phase,
    /// Ticks since entering the current phase
    tick_in_phase: u32,
    /// Ticks since the scene started, for scheduled cues
    ticks: u32,
    animation: AnimationKey,
    facing: Facing,
    cursor: FrameCursor,
    scheduled: Vec<(u32, AudioCue)>,
    cues: Vec<AudioCue>,
    music_started: bool,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            phase: Phase::Intro,
            tick_in_phase: 0,
            ticks: 0,
            animation: AnimationKey::Idle,
            facing: Facing::Right,
            cursor: FrameCursor::default(),
            scheduled: Vec::new(),
            cues: Vec::new(),
            music_started: false,
        }
    }

    pub fn animation(&self) -> AnimationKey {
        self.animation
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn frame_index(&self) -> u32 {
        self.cursor.frame_index
    }

    /// The choreography has finished and the scene idles indefinitely
    pub fn is_ending(&self) -> bool {
        self.phase == Phase::Ending
    }

    /// Advance one tick: fire due cues, advance the frame cursor, and step
    /// the choreography when the current phase has run its course.
    pub fn tick(&mut self, catalog: &AnimationCatalog) {
        self.ticks += 1;
        self.tick_in_phase += 1;

        let now = self.ticks;
        let cues = &mut self.cues;
        self.scheduled.retain(|(due, cue)| {
            if *due <= now {
                cues.push(*cue);
                false
            } else {
                true
            }
        });

        let (key, anim) = {
            let (key, anim) = catalog.get_or_idle(self.animation);
            (key, *anim)
        };
        self.animation = key;
        self.cursor.advance(key, &anim);

        match self.phase {
            Phase::Intro => {
                if self.tick_in_phase >= INTRO_TICKS {
                    self.enter_step(0, catalog);
                }
            }
            Phase::Step(i) => {
                if self.tick_in_phase >= anim.cycle_ticks() {
                    if i + 1 < STEPS.len() {
                        self.enter_step(i + 1, catalog);
                    } else {
                        self.enter_ending();
                    }
                }
            }
            Phase::Ending => {}
        }
    }

    fn enter_step(&mut self, index: usize, catalog: &AnimationCatalog) {
        let (key, facing) = STEPS[index];
        self.phase = Phase::Step(index);
        self.tick_in_phase = 0;
        self.animation = key;
        self.facing = facing;
        self.cursor.rewind();
        log::debug!("celebration step {}: {}", index, key.as_str());

        // Time the grunt near the end of the swing
        let (_, anim) = catalog.get_or_idle(key);
        let cue_offset = anim.frames * (anim.ticks_per_frame - 1);
        match key {
            AnimationKey::Attack1 | AnimationKey::Attack2 => {
                self.scheduled
                    .push((self.ticks + cue_offset, AudioCue::AttackGrunt));
            }
            AnimationKey::ThrowAttack => {
                self.scheduled.push((
                    self.ticks + cue_offset + THROW_GRUNT_DELAY_TICKS,
                    AudioCue::ThrowGrunt,
                ));
            }
            _ => {}
        }
    }

    fn enter_ending(&mut self) {
        self.phase = Phase::Ending;
        self.tick_in_phase = 0;
        self.animation = AnimationKey::Idle;
        self.facing = Facing::Right;
        self.cursor.rewind();
        self.cues.push(AudioCue::VoiceMessage);
        log::info!("celebration choreography finished");
    }

    /// Host callback when the voice message playback ends; starts the
    /// celebration music exactly once.
    pub fn voice_message_finished(&mut self) {
        if self.music_started {
            return;
        }
        self.music_started = true;
        self.cues.push(AudioCue::CelebrationMusic);
    }

    pub fn take_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
