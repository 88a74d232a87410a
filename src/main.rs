#![cfg_attr(all(not(debug_assertions), target_os = "windows"), windows_subsystem = "windows")]

use clap::Parser;
use hollow::app::App;
use hollow::args::LaunchArgs;
use hollow::config::Tuning;
use hollow::game::GameConfig;
use hollow::platform;
use hollow::systems::TracingAudio;
use hollow::texture::sprite::TextureStore;
use tracing::info;

pub fn main() -> anyhow::Result<()> {
    platform::init_tracing()?;

    let args = LaunchArgs::parse();
    let tuning = Tuning::load(args.tuning.as_deref())?;
    let textures = args.assets.as_deref().map(TextureStore::load_dir).unwrap_or_default();

    let mut app = App::new(GameConfig {
        tuning,
        seed: args.seed,
        textures,
        audio: Box::new(TracingAudio),
        ..GameConfig::default()
    })?;

    info!(loop_time = ?hollow::constants::LOOP_TIME, "Starting game loop");
    while app.run() {}

    info!(stage = app.game.stage().name(), ticks = app.game.tick_count(), "Shut down");
    Ok(())
}
