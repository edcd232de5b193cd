//! Per-frame simulation tick
//!
//! The update is an explicit pipeline with a fixed stage order:
//! input -> integrate -> resolve support -> death boundary -> animation ->
//! pickups. The countdown runs separately at 1 Hz via
//! [`GameState::countdown_second`]; deferred transitions (death restart,
//! finale victory, scene handoff) come back through the task queue at the
//! top of the next tick.

use super::animation::AnimationKey;
use super::collision::{SupportQuery, can_stand_at, resolve_support};
use super::state::{Facing, GameEvent, GameState, ScheduledAction, Screen};
use crate::audio::AudioCue;
use crate::consts::*;

/// Normalized input for one tick: held directions plus a jump edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Edge-triggered; the driver clears it after each tick
    pub jump: bool,
}

/// Advance the game by one driver frame.
///
/// The tick counter and task queue run on every screen so deferred
/// transitions still fire after victory; the simulation stages only run
/// while playing.
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;
    run_scheduled(state);

    if state.screen != Screen::Playing {
        return;
    }

    apply_input(state, input);
    integrate(state);
    resolve_collisions(state);
    check_death_boundary(state);
    select_animation(state);
    collect_pickups(state);
}

fn run_scheduled(state: &mut GameState) {
    for action in state.take_due_actions() {
        match action {
            ScheduledAction::Restart => state.restart(),
            ScheduledAction::Victory => state.enter_victory(),
            ScheduledAction::SceneHandoff => state.push(GameEvent::CelebrationRequested),
        }
    }
}

/// Input stage: horizontal velocity is held-key driven, jump is an edge.
///
/// Also pre-empts walking onto empty air: a grounded player whose feet no
/// longer pass the tight stand check starts falling immediately instead
/// of hovering off the ledge.
fn apply_input(state: &mut GameState, input: &TickInput) {
    if state.player.is_dying {
        return;
    }

    if input.jump && !state.player.is_jumping {
        let p = &mut state.player;
        p.vel.y = JUMP_IMPULSE;
        p.is_jumping = true;
        p.play(AnimationKey::JumpStart);
    }

    {
        let p = &mut state.player;
        if input.left {
            p.vel.x = -RUN_SPEED;
            p.facing = Facing::Left;
            p.is_moving = true;
        } else if input.right {
            p.vel.x = RUN_SPEED;
            p.facing = Facing::Right;
            p.is_moving = true;
        } else {
            p.vel.x = 0.0;
            p.is_moving = false;
        }
    }

    let grounded = !state.player.is_jumping;
    if grounded && !can_stand_at(state.player.feet_x(), state.player.feet_y(), &state.level) {
        let p = &mut state.player;
        p.is_jumping = true;
        p.vel.y = FALL_SEED_SPEED;
        p.play(AnimationKey::JumpFall);
    }
}

/// Kinematics stage: apply velocity, then clamp x to the world.
///
/// The clamp runs before support re-evaluation so a player pushed against
/// a wall cannot slide off a platform edge it is still over.
fn integrate(state: &mut GameState) {
    let p = &mut state.player;
    p.pos += p.vel;
    p.pos.x = p.pos.x.clamp(0.0, WORLD_WIDTH - p.width);
}

/// Support stage: snap to a matched surface, otherwise accrue gravity.
///
/// A dying player is pinned; physics no longer applies.
fn resolve_collisions(state: &mut GameState) {
    if state.player.is_dying {
        return;
    }
    let query = SupportQuery {
        left: state.player.pos.x,
        width: state.player.width,
        feet_y: state.player.feet_y(),
        vel_y: state.player.vel.y,
    };
    match resolve_support(&query, &state.level) {
        Some(surface_y) => state.player.snap_to_surface(surface_y),
        None => state.player.vel.y += GRAVITY,
    }
}

/// Terminal stage for falls: crossing the death boundary starts the death
/// animation; the screen stays Playing until the scheduled restart.
fn check_death_boundary(state: &mut GameState) {
    let bottom = state.player.pos.y + state.player.height;
    if bottom < state.death_boundary {
        return;
    }
    state.player.pos.y = state.death_boundary - state.player.height;
    state.start_death();
}

/// Animation stage: select by precedence (dying > airborne > moving >
/// idle), then advance the frame cursor. Death latching completion
/// schedules the restart exactly once.
fn select_animation(state: &mut GameState) {
    {
        let p = &mut state.player;
        if p.is_dying {
            p.play(AnimationKey::Death);
        } else if p.is_jumping {
            if p.vel.y < 0.0 {
                p.play(AnimationKey::JumpStart);
            } else if p.vel.y > 0.0 {
                p.play(AnimationKey::JumpFall);
            }
            // At the exact apex, hold the current sub-state
        } else if p.is_moving {
            p.play(AnimationKey::Run);
        } else {
            p.play(AnimationKey::Idle);
        }
    }

    let finished = {
        let (key, anim) = state.catalog.get_or_idle(state.player.animation);
        let anim = *anim;
        if key != state.player.animation {
            state.player.animation = key;
            state.player.cursor.rewind();
        }
        state.player.cursor.advance(key, &anim)
    };

    if finished && state.player.is_dying && !state.player.death_animation_complete {
        state.player.death_animation_complete = true;
        state.schedule(DEATH_RESTART_DELAY_TICKS, ScheduledAction::Restart);
    }
}

/// Pickup stage: feet point against each uncollected cake's anchor.
///
/// Collection is one-shot and monotonic; the milestone cue and the
/// finale trigger fire exactly once per round, the latter latched by
/// `victory_pending` and freezing the countdown immediately.
fn collect_pickups(state: &mut GameState) {
    let feet_x = state.player.feet_x();
    let feet_y = state.player.feet_y();

    for i in 0..state.cakes.len() {
        let cake = state.cakes[i];
        if cake.collected {
            continue;
        }
        let aligned = (feet_y - cake.anchor_y()).abs() < PICKUP_RANGE_Y
            && (feet_x - cake.anchor_x()).abs() < PICKUP_RANGE_X;
        if !aligned {
            continue;
        }

        state.cakes[i].collected = true;
        state.cakes_collected += 1;
        let collected = state.cakes_collected;
        let total = state.total_cakes;
        state.push(GameEvent::CakeCollected { collected, total });

        if collected == MILESTONE_CAKES {
            state.push(GameEvent::Cue(AudioCue::Milestone));
        }
        if collected == total && !state.victory_pending {
            state.victory_pending = true;
            state.push(GameEvent::Cue(AudioCue::Finale));
            state.schedule(
                FINALE_CUE_TICKS + FINALE_EXTRA_DELAY_TICKS,
                ScheduledAction::Victory,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::AnimationCatalog;
    use crate::sim::level::Platform;
    use proptest::prelude::*;

    const HOLD_RIGHT: TickInput = TickInput {
        left: false,
        right: true,
        jump: false,
    };
    const IDLE: TickInput = TickInput {
        left: false,
        right: false,
        jump: false,
    };

    fn playing_state() -> GameState {
        let mut state = GameState::new(0, AnimationCatalog::standard()).unwrap();
        state.show_welcome();
        state.start_game();
        state.take_events();
        state
    }

    /// One platform spanning the whole world, so the player never falls
    fn floor_state() -> GameState {
        let mut state = playing_state();
        state.level.platforms = vec![Platform::new(0.0, 900.0, WORLD_WIDTH, 20.0)];
        state.level.spawn_platform = 0;
        state.restart();
        state.take_events();
        state
    }

    fn cues(events: &[GameEvent]) -> Vec<AudioCue> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Cue(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn idle_player_stays_put_and_animates() {
        let mut state = playing_state();
        let start = state.player.pos;
        for _ in 0..120 {
            tick(&mut state, &IDLE);
            assert_eq!(state.player.animation, AnimationKey::Idle);
        }
        assert_eq!(state.player.pos, start);
    }

    #[test]
    fn held_right_runs_right() {
        let mut state = floor_state();
        let x0 = state.player.pos.x;
        tick(&mut state, &HOLD_RIGHT);
        assert_eq!(state.player.pos.x, x0 + RUN_SPEED);
        assert_eq!(state.player.animation, AnimationKey::Run);
        assert_eq!(state.player.facing, Facing::Right);
        assert!(state.player.is_moving);
    }

    #[test]
    fn horizontal_position_clamps_to_world() {
        let mut state = floor_state();
        for _ in 0..1000 {
            tick(&mut state, &HOLD_RIGHT);
            assert!(state.player.pos.x <= WORLD_WIDTH - state.player.width);
        }
        assert_eq!(state.player.pos.x, WORLD_WIDTH - state.player.width);
    }

    #[test]
    fn jump_arc_selects_start_then_fall_then_lands() {
        let mut state = floor_state();
        let ground_y = state.player.feet_y();
        tick(
            &mut state,
            &TickInput {
                jump: true,
                ..IDLE
            },
        );
        assert!(state.player.is_jumping);
        assert_eq!(state.player.vel.y, JUMP_IMPULSE + GRAVITY);
        assert_eq!(state.player.animation, AnimationKey::JumpStart);

        let mut saw_fall = false;
        for _ in 0..300 {
            tick(&mut state, &IDLE);
            if state.player.is_jumping && state.player.vel.y > 0.0 {
                saw_fall = true;
                assert_eq!(state.player.animation, AnimationKey::JumpFall);
            }
            if !state.player.is_jumping {
                break;
            }
        }
        assert!(saw_fall);
        assert!(!state.player.is_jumping);
        assert_eq!(state.player.feet_y(), ground_y);
    }

    #[test]
    fn jump_is_ignored_while_airborne() {
        let mut state = floor_state();
        tick(&mut state, &TickInput { jump: true, ..IDLE });
        let vy = state.player.vel.y;
        tick(&mut state, &TickInput { jump: true, ..IDLE });
        // A second impulse would have reset vy to the full impulse
        assert!(state.player.vel.y > vy);
    }

    #[test]
    fn walking_off_a_ledge_starts_a_fall() {
        let mut state = playing_state();
        // March right off the spawn platform
        let mut fell = false;
        for _ in 0..60 {
            tick(&mut state, &HOLD_RIGHT);
            if state.player.is_jumping {
                fell = true;
                assert_eq!(state.player.animation, AnimationKey::JumpFall);
                assert!(state.player.vel.y > 0.0);
                break;
            }
        }
        assert!(fell);
    }

    #[test]
    fn falling_off_screen_dies_then_restarts() {
        let mut state = playing_state();
        // Drop the player into the void below all platforms
        state.player.pos.x = 50.0;
        state.player.is_jumping = true;
        state.player.vel.y = 1.0;

        let mut died_at = None;
        for t in 0..2000u64 {
            tick(&mut state, &IDLE);
            let events = state.take_events();
            if events.contains(&GameEvent::PlayerDied) {
                died_at = Some(t);
                assert!(cues(&events).contains(&AudioCue::DeathGrunt));
                assert!(state.player.is_dying);
                assert_eq!(state.player.vel, glam::Vec2::ZERO);
                assert_eq!(
                    state.player.pos.y + state.player.height,
                    state.death_boundary
                );
            }
            if events.contains(&GameEvent::Restarted) {
                assert!(died_at.is_some());
                assert!(!state.player.is_dying);
                assert_eq!(state.cakes_collected, 0);
                assert_eq!(state.time_left, ROUND_SECONDS);
                let spawn = state.level.platforms[state.level.spawn_platform];
                assert_eq!(state.player.feet_y(), spawn.y);
                return;
            }
        }
        panic!("death/restart sequence never completed");
    }

    #[test]
    fn dying_player_ignores_input() {
        let mut state = playing_state();
        state.player.pos.y = state.death_boundary;
        tick(&mut state, &IDLE);
        assert!(state.player.is_dying);
        tick(&mut state, &HOLD_RIGHT);
        assert_eq!(state.player.vel.x, 0.0);
        assert!(!state.player.is_moving);
        assert_eq!(state.player.animation, AnimationKey::Death);
    }

    fn align_player_with_cake(state: &mut GameState, cake_index: usize) {
        let cake = state.cakes[cake_index];
        let p = &mut state.player;
        p.pos.x = cake.anchor_x() - p.width / 2.0;
        p.pos.y = cake.anchor_y() - p.height + p.collision_offset;
    }

    #[test]
    fn cake_collection_is_one_shot() {
        let mut state = floor_state();
        align_player_with_cake(&mut state, 0);
        tick(&mut state, &IDLE);
        assert_eq!(state.cakes_collected, 1);
        assert!(state.cakes[0].collected);

        // Standing in the same spot does not re-trigger
        for _ in 0..10 {
            tick(&mut state, &IDLE);
        }
        assert_eq!(state.cakes_collected, 1);
    }

    #[test]
    fn milestone_cue_fires_exactly_once() {
        let mut state = floor_state();
        state.cakes_collected = MILESTONE_CAKES - 1;
        align_player_with_cake(&mut state, 2);
        tick(&mut state, &IDLE);
        let first = cues(&state.take_events());
        assert_eq!(
            first.iter().filter(|c| **c == AudioCue::Milestone).count(),
            1
        );

        align_player_with_cake(&mut state, 3);
        tick(&mut state, &IDLE);
        assert!(!cues(&state.take_events()).contains(&AudioCue::Milestone));
    }

    #[test]
    fn final_cake_freezes_countdown_and_schedules_victory() {
        let mut state = floor_state();
        state.cakes_collected = state.total_cakes - 1;
        align_player_with_cake(&mut state, 5);
        tick(&mut state, &IDLE);

        assert!(state.victory_pending);
        let events = state.take_events();
        assert!(cues(&events).contains(&AudioCue::Finale));
        assert_eq!(state.screen, Screen::Playing);

        // Countdown is frozen while the finale plays out
        assert!(!state.countdown_second());
        assert_eq!(state.time_left, ROUND_SECONDS);

        // Victory fires after the finale delay, then the scene handoff
        let mut reached = false;
        let mut handoff = false;
        for _ in 0..(FINALE_CUE_TICKS + FINALE_EXTRA_DELAY_TICKS + SCENE_HANDOFF_DELAY_TICKS + 2) {
            tick(&mut state, &IDLE);
            for event in state.take_events() {
                match event {
                    GameEvent::VictoryReached => {
                        assert!(!reached);
                        reached = true;
                    }
                    GameEvent::CelebrationRequested => handoff = true,
                    _ => {}
                }
            }
        }
        assert!(reached);
        assert!(handoff);
        assert_eq!(state.screen, Screen::Victory);
    }

    #[test]
    fn victory_latch_survives_duplicate_triggers() {
        let mut state = floor_state();
        state.cakes_collected = state.total_cakes - 1;
        align_player_with_cake(&mut state, 5);
        tick(&mut state, &IDLE);
        state.take_events();

        // A countdown expiry arriving after the latch must not restart
        assert!(!state.countdown_second());
        for _ in 0..(FINALE_CUE_TICKS + FINALE_EXTRA_DELAY_TICKS + 1) {
            tick(&mut state, &IDLE);
        }
        assert_eq!(state.screen, Screen::Victory);
        assert!(
            !state
                .take_events()
                .contains(&GameEvent::Restarted)
        );
    }

    proptest! {
        /// Frame index stays in bounds and x stays clamped under any input
        #[test]
        fn invariants_hold_under_arbitrary_input(
            inputs in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..400)
        ) {
            let mut state = playing_state();
            for (left, right, jump) in inputs {
                tick(&mut state, &TickInput { left, right, jump });
                let frames = state
                    .catalog
                    .get(state.player.animation)
                    .map(|a| a.frames)
                    .unwrap_or(1);
                prop_assert!(state.player.cursor.frame_index < frames);
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= WORLD_WIDTH - state.player.width);
                if state.player.is_dying {
                    prop_assert_eq!(state.player.vel, glam::Vec2::ZERO);
                    prop_assert!(!state.player.is_moving);
                }
            }
        }
    }
}
