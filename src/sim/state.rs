//! Game state and core simulation types
//!
//! All mutation funnels through the tick pipeline and the 1 Hz countdown
//! callback; delayed effects go through the generation-guarded task queue
//! so a superseded sequence can never fire late.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{AnimationCatalog, AnimationKey, FrameCursor};
use super::level::{CAKE_SIZE, Level, LevelError};
use crate::audio::AudioCue;
use crate::consts::*;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Initial title card
    Title,
    /// Instructions screen, waiting for the start trigger
    Welcome,
    /// Live round; the only screen where the simulation advances
    Playing,
    /// Round won; draw phase becomes a no-op
    Victory,
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Collision box top-left
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision box size; narrower than the visual sprite
    pub width: f32,
    pub height: f32,
    /// Distance from box bottom up to the visual feet
    pub collision_offset: f32,
    pub facing: Facing,
    pub animation: AnimationKey,
    pub cursor: FrameCursor,
    pub is_jumping: bool,
    pub is_moving: bool,
    pub is_dying: bool,
    pub death_animation_complete: bool,
}

impl Player {
    /// Size the collision box from the idle sheet's measured frame.
    ///
    /// The box is 80% of the visual frame width, full frame height.
    pub fn new(catalog: &AnimationCatalog) -> Self {
        let (_, idle) = catalog.get_or_idle(AnimationKey::Idle);
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            width: idle.visual_width() * 0.8,
            height: idle.visual_height(),
            collision_offset: COLLISION_OFFSET,
            facing: Facing::Right,
            animation: AnimationKey::Idle,
            cursor: FrameCursor::default(),
            is_jumping: false,
            is_moving: false,
            is_dying: false,
            death_animation_complete: false,
        }
    }

    /// Feet point: box bottom-center, raised by the collision offset
    pub fn feet_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    pub fn feet_y(&self) -> f32 {
        self.pos.y + self.height - self.collision_offset
    }

    /// Switch animation, rewinding the cursor only on an actual change
    pub fn play(&mut self, key: AnimationKey) {
        if self.animation != key {
            self.animation = key;
            self.cursor.rewind();
        }
    }

    /// Place the feet exactly on a surface at the given height
    pub fn snap_to_surface(&mut self, surface_y: f32) {
        self.pos.y = surface_y - self.height + self.collision_offset;
        self.vel.y = 0.0;
        self.is_jumping = false;
    }
}

/// A cake pickup; `collected` flips true exactly once per round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cake {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub collected: bool,
}

impl Cake {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            width: CAKE_SIZE,
            height: CAKE_SIZE,
            collected: false,
        }
    }

    /// Visual anchor: bottom-center of where the cake is drawn, which sits
    /// below the logical origin by half its height plus a fixed drop
    pub fn anchor_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    pub fn anchor_y(&self) -> f32 {
        self.pos.y + self.height + self.height / 2.0 + CAKE_ANCHOR_DROP
    }
}

/// Events drained by the driver after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Cue(AudioCue),
    CakeCollected { collected: u32, total: u32 },
    PlayerDied,
    Restarted,
    VictoryReached,
    /// Host should navigate to the celebration scene
    CelebrationRequested,
}

/// Deferred transitions carried by the task queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum ScheduledAction {
    Restart,
    Victory,
    SceneHandoff,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScheduledTask {
    due_tick: u64,
    /// Generation at scheduling time; stale tasks are dropped, never fired
    generation: u32,
    action: ScheduledAction,
}

/// Complete game state, owned by the driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub screen: Screen,
    /// Countdown seconds remaining
    pub time_left: u32,
    pub cakes_collected: u32,
    pub total_cakes: u32,
    /// Latch preventing duplicate victory scheduling
    pub victory_pending: bool,
    pub player: Player,
    pub level: Level,
    pub cakes: Vec<Cake>,
    pub catalog: AnimationCatalog,
    /// Falling past this height starts the death animation
    pub death_boundary: f32,
    /// Driver tick counter; advances every frame regardless of screen
    pub time_ticks: u64,
    generation: u32,
    tasks: Vec<ScheduledTask>,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Build state for the given level index.
    ///
    /// Precondition: the animation catalog is fully measured. An unknown
    /// level index is unrecoverable at this layer.
    pub fn new(level_index: usize, catalog: AnimationCatalog) -> Result<Self, LevelError> {
        let level = Level::load(level_index)?;
        let total_cakes = level.total_cakes();
        let player = Player::new(&catalog);
        let mut state = Self {
            screen: Screen::Title,
            time_left: ROUND_SECONDS,
            cakes_collected: 0,
            total_cakes,
            victory_pending: false,
            player,
            level,
            cakes: Vec::new(),
            catalog,
            death_boundary: WORLD_HEIGHT,
            time_ticks: 0,
            generation: 0,
            tasks: Vec::new(),
            events: Vec::new(),
        };
        state.reset_round();
        Ok(state)
    }

    /// Title -> Welcome (external trigger)
    pub fn show_welcome(&mut self) {
        if self.screen == Screen::Title {
            self.screen = Screen::Welcome;
        }
    }

    /// Welcome -> Playing: starts the countdown and the live round
    pub fn start_game(&mut self) {
        if self.screen != Screen::Welcome {
            log::warn!("start_game from {:?} ignored", self.screen);
            return;
        }
        self.screen = Screen::Playing;
        self.time_left = ROUND_SECONDS;
        self.push(GameEvent::Cue(AudioCue::MusicStart));
        log::info!("round started: {} cakes, {}s", self.total_cakes, ROUND_SECONDS);
    }

    /// One step of the host's 1 Hz countdown.
    ///
    /// Returns whether the timer should keep firing. Self-cancels when the
    /// screen leaves Playing or the finale has frozen the countdown.
    pub fn countdown_second(&mut self) -> bool {
        if self.screen != Screen::Playing || self.victory_pending {
            return false;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.round_over();
            return self.screen == Screen::Playing;
        }
        true
    }

    /// Countdown expiry: victory only with a full set, otherwise restart
    fn round_over(&mut self) {
        self.push(GameEvent::Cue(AudioCue::MusicStop));
        if self.cakes_collected == self.total_cakes {
            self.enter_victory();
        } else {
            self.restart();
        }
    }

    /// Full round reset: countdown, cakes, player spawn, pending tasks
    pub fn restart(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.reset_round();
        self.push(GameEvent::Restarted);
        if self.screen == Screen::Playing {
            self.push(GameEvent::Cue(AudioCue::MusicStart));
        }
    }

    fn reset_round(&mut self) {
        self.time_left = ROUND_SECONDS;
        self.cakes_collected = 0;
        self.victory_pending = false;
        self.cakes = self.level.cake_spawns.iter().map(|&p| Cake::at(p)).collect();

        let spawn = self.level.platforms[self.level.spawn_platform];
        let p = &mut self.player;
        p.pos.x = spawn.x + (spawn.width - p.width) / 2.0;
        p.pos.y = spawn.y - p.height + p.collision_offset;
        p.vel = Vec2::ZERO;
        p.facing = Facing::Right;
        p.is_jumping = false;
        p.is_moving = false;
        p.is_dying = false;
        p.death_animation_complete = false;
        p.animation = AnimationKey::Idle;
        p.cursor.rewind();
    }

    /// Enter the victory screen. Idempotent; cancels any pending restart.
    pub(crate) fn enter_victory(&mut self) {
        if self.screen == Screen::Victory {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.screen = Screen::Victory;
        self.victory_pending = true;
        self.push(GameEvent::Cue(AudioCue::MusicStop));
        self.push(GameEvent::VictoryReached);
        self.schedule(SCENE_HANDOFF_DELAY_TICKS, ScheduledAction::SceneHandoff);
        log::info!("victory at tick {}", self.time_ticks);
    }

    /// Begin the death animation; velocity pins to zero until restart
    pub(crate) fn start_death(&mut self) {
        if self.player.is_dying {
            return;
        }
        let p = &mut self.player;
        p.is_dying = true;
        p.is_moving = false;
        p.is_jumping = false;
        p.vel = Vec2::ZERO;
        p.animation = AnimationKey::Death;
        p.cursor.rewind();
        self.push(GameEvent::Cue(AudioCue::DeathGrunt));
        self.push(GameEvent::PlayerDied);
    }

    pub(crate) fn schedule(&mut self, delay_ticks: u64, action: ScheduledAction) {
        self.tasks.push(ScheduledTask {
            due_tick: self.time_ticks + delay_ticks,
            generation: self.generation,
            action,
        });
    }

    /// Drain due tasks; tasks from a superseded generation are discarded
    pub(crate) fn take_due_actions(&mut self) -> Vec<ScheduledAction> {
        let now = self.time_ticks;
        let generation = self.generation;
        let mut due = Vec::new();
        self.tasks.retain(|task| {
            if task.generation != generation {
                return false;
            }
            if task.due_tick <= now {
                due.push(task.action);
                return false;
            }
            true
        });
        due
    }

    pub(crate) fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain events accumulated since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[cfg(test)]
    pub(crate) fn pending_task_count(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state() -> GameState {
        let mut state = GameState::new(0, AnimationCatalog::standard()).unwrap();
        state.show_welcome();
        state.start_game();
        state.take_events();
        state
    }

    #[test]
    fn new_state_spawns_player_on_designated_platform() {
        let state = GameState::new(0, AnimationCatalog::standard()).unwrap();
        let spawn = state.level.platforms[state.level.spawn_platform];
        let feet_x = state.player.feet_x();
        assert!(feet_x > spawn.x && feet_x < spawn.x + spawn.width);
        assert_eq!(state.player.feet_y(), spawn.y);
    }

    #[test]
    fn screen_transitions_follow_title_welcome_playing() {
        let mut state = GameState::new(0, AnimationCatalog::standard()).unwrap();
        assert_eq!(state.screen, Screen::Title);
        state.start_game();
        assert_eq!(state.screen, Screen::Title);
        state.show_welcome();
        assert_eq!(state.screen, Screen::Welcome);
        state.start_game();
        assert_eq!(state.screen, Screen::Playing);
    }

    #[test]
    fn countdown_expiry_without_full_set_restarts() {
        let mut state = playing_state();
        state.time_left = 1;
        state.cakes_collected = 10;
        let keep_firing = state.countdown_second();
        assert!(keep_firing);
        assert_eq!(state.screen, Screen::Playing);
        assert_eq!(state.cakes_collected, 0);
        assert_eq!(state.time_left, ROUND_SECONDS);
    }

    #[test]
    fn countdown_expiry_with_full_set_wins() {
        let mut state = playing_state();
        state.time_left = 1;
        state.cakes_collected = state.total_cakes;
        let keep_firing = state.countdown_second();
        assert!(!keep_firing);
        assert_eq!(state.screen, Screen::Victory);
    }

    #[test]
    fn countdown_self_cancels_outside_playing() {
        let mut state = GameState::new(0, AnimationCatalog::standard()).unwrap();
        assert!(!state.countdown_second());
        assert_eq!(state.time_left, ROUND_SECONDS);
    }

    #[test]
    fn countdown_freezes_while_victory_pending() {
        let mut state = playing_state();
        state.victory_pending = true;
        assert!(!state.countdown_second());
        assert_eq!(state.time_left, ROUND_SECONDS);
    }

    #[test]
    fn restart_is_a_full_reset() {
        let mut state = playing_state();
        state.cakes_collected = 5;
        state.cakes[0].collected = true;
        state.time_left = 3;
        state.player.is_dying = true;
        state.restart();
        assert_eq!(state.cakes_collected, 0);
        assert!(state.cakes.iter().all(|c| !c.collected));
        assert_eq!(state.time_left, ROUND_SECONDS);
        assert!(!state.player.is_dying);
        assert_eq!(state.player.feet_y(), {
            let spawn = state.level.platforms[state.level.spawn_platform];
            spawn.y
        });
    }

    #[test]
    fn restart_invalidates_scheduled_tasks() {
        let mut state = playing_state();
        state.schedule(0, ScheduledAction::Victory);
        state.restart();
        assert!(state.take_due_actions().is_empty());
        assert_eq!(state.pending_task_count(), 0);
    }

    #[test]
    fn enter_victory_is_idempotent() {
        let mut state = playing_state();
        state.enter_victory();
        state.take_events();
        state.enter_victory();
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn tasks_fire_only_when_due() {
        let mut state = playing_state();
        state.schedule(10, ScheduledAction::Restart);
        assert!(state.take_due_actions().is_empty());
        state.time_ticks += 10;
        assert_eq!(state.take_due_actions(), vec![ScheduledAction::Restart]);
    }
}
