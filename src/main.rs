//! Cake Dash entry point
//!
//! Headless demo driver: runs a scripted round at the nominal tick rate
//! with no renderer attached, draining events into a logging audio sink
//! and printing a frame-log summary at the end. A graphical host would
//! drive the same `tick`/`countdown_second`/`take_events` surface.

use cake_dash::audio::{AudioSink, LogSink};
use cake_dash::consts::*;
use cake_dash::sim::{AnimationCatalog, Celebration, GameEvent, GameState, Screen, TickInput, tick};
use cake_dash::snapshot::DrawSnapshot;
use cake_dash::Settings;

fn main() {
    env_logger::init();
    log::info!("Cake Dash (headless demo) starting...");

    let settings = Settings::load(Settings::DEFAULT_PATH);
    log::info!(
        "sfx volume {:.2}, music volume {:.2}",
        settings.effective_sfx_volume(),
        settings.effective_music_volume()
    );

    let catalog = AnimationCatalog::standard();
    let mut state = match GameState::new(0, catalog.clone()) {
        Ok(state) => state,
        Err(err) => {
            log::error!("failed to load level: {}", err);
            std::process::exit(1);
        }
    };

    state.show_welcome();
    state.start_game();

    let mut sink = LogSink;
    let mut celebration: Option<Celebration> = None;
    let mut last_snapshot: Option<DrawSnapshot> = None;

    // Scripted input: run right with a jump burst every second
    let total_ticks = 30 * TICKS_PER_SECOND;
    for frame in 0..total_ticks {
        let input = TickInput {
            left: false,
            right: true,
            jump: frame % TICKS_PER_SECOND == 0,
        };
        tick(&mut state, &input);

        if frame % TICKS_PER_SECOND == 0 {
            state.countdown_second();
        }

        for event in state.take_events() {
            match event {
                GameEvent::Cue(cue) => sink.play(cue),
                GameEvent::CakeCollected { collected, total } => {
                    log::info!("cake {}/{}", collected, total);
                }
                GameEvent::PlayerDied => log::info!("player died at tick {}", frame),
                GameEvent::Restarted => log::info!("round restarted at tick {}", frame),
                GameEvent::VictoryReached => log::info!("victory at tick {}", frame),
                GameEvent::CelebrationRequested => {
                    celebration = Some(Celebration::new());
                }
            }
        }

        if let Some(cele) = celebration.as_mut() {
            cele.tick(&catalog);
            for cue in cele.take_cues() {
                sink.play(cue);
            }
        }

        last_snapshot = Some(state.snapshot());
    }

    let snap = last_snapshot.expect("at least one frame ran");
    println!(
        "screen {:?}, {}s left, cakes {}/{}, player at ({:.0}, {:.0}) playing {}",
        snap.screen,
        snap.time_left,
        snap.cakes_collected,
        snap.total_cakes,
        snap.player.x,
        snap.player.y,
        snap.player.animation.as_str(),
    );
    if snap.screen == Screen::Victory {
        println!("demo round won");
    }
}
