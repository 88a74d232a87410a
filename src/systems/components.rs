use bevy_ecs::resource::Resource;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

/// The single random source for the simulation.
///
/// Seeded explicitly for deterministic runs and tests, or from OS entropy otherwise.
/// The seed in use is logged so any run can be replayed.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| SmallRng::from_os_rng().next_u64());
        info!(seed, "Seeding game RNG");
        Self(SmallRng::seed_from_u64(seed))
    }

    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

/// Number of ticks simulated so far. All cooldowns and timers use this as their time basis.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickCount(pub u64);

/// A short message for the HUD that disappears after a number of ticks.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    text: Option<String>,
    remaining_ticks: u32,
}

impl TransientMessage {
    pub fn show(&mut self, text: impl Into<String>, ticks: u32) {
        self.text = Some(text.into());
        self.remaining_ticks = ticks;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Advance one frame, clearing the message once its lifetime runs out.
    pub fn tick(&mut self) {
        if self.remaining_ticks > 0 {
            self.remaining_ticks -= 1;
        }
        if self.remaining_ticks == 0 {
            self.text = None;
        }
    }
}

/// Global flags the frontend polls between frames.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct GlobalState {
    pub exit: bool,
}
