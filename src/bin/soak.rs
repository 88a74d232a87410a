//! Headless runner: simulates a session with a scripted wander and logs how it went.

use clap::Parser;
use glam::Vec2;
use hollow::args::LaunchArgs;
use hollow::config::Tuning;
use hollow::game::{Game, GameConfig};
use hollow::platform;
use hollow::systems::{Actions, GameStage, PlayerInput, TracingAudio};
use tracing::{debug, info};

/// Ticks spent on each leg of the wander before turning.
const LEG_TICKS: u64 = 90;

/// The scripted input for a tick: walk a leg, turn, poke at whatever is nearby.
fn wander(tick: u64) -> PlayerInput {
    let leg = tick / LEG_TICKS;
    let mut actions = Actions::FORWARD;
    if leg % 3 == 2 {
        actions |= Actions::RUN;
    }
    if tick % 45 == 0 {
        actions |= Actions::INTERACT;
    }

    let look = if tick % LEG_TICKS == 0 {
        Vec2::new(if leg % 2 == 0 { 1.3 } else { -0.9 }, 0.0)
    } else {
        Vec2::ZERO
    };
    PlayerInput { actions, look }
}

fn main() -> anyhow::Result<()> {
    platform::init_tracing()?;

    let args = LaunchArgs::parse();
    let tuning = Tuning::load(args.tuning.as_deref())?;
    let seed = args.seed.unwrap_or(0x5EED);

    let mut game = Game::new(GameConfig {
        tuning: tuning.clone(),
        seed: Some(seed),
        audio: Box::new(TracingAudio),
        ..GameConfig::default()
    })?;

    debug!(tuning = %serde_json::to_string(&tuning)?, "Effective tuning");
    info!(seed, ticks = args.ticks, "Starting soak run");
    let mut stage = game.stage();
    for tick in 1..=args.ticks {
        game.set_input(wander(tick));
        game.tick();

        if game.stage() != stage {
            stage = game.stage();
            debug!(tick, stage = stage.name(), "Stage changed");
        }
        if stage.is_terminal() {
            break;
        }
        if matches!(stage, GameStage::ReadingNote { .. }) {
            // close the note on the next tick
            game.set_input(PlayerInput {
                actions: Actions::INTERACT,
                look: Vec2::ZERO,
            });
            game.tick();
        }
    }

    let snapshot = game.snapshot();
    info!(
        ticks = game.tick_count(),
        stage = snapshot.stage.name(),
        battery = snapshot.battery_percent,
        keys = snapshot.keys_found,
        enemy = %game.enemy().state,
        "Soak run finished"
    );

    // One machine-readable line on stdout for scripts comparing runs
    let report = serde_json::json!({
        "seed": seed,
        "ticks": game.tick_count(),
        "outcome": snapshot.stage.name(),
        "battery_percent": snapshot.battery_percent,
        "keys_found": snapshot.keys_found,
        "enemy_state": game.enemy().state.to_string(),
    });
    println!("{report}");
    Ok(())
}
