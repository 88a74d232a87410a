//! Process-level setup shared by the binaries.

use std::time::Duration;

use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{GameError, GameResult};
use crate::formatter::CustomFormatter;

/// Installs the global tracing subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() -> GameResult<()> {
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true).event_format(CustomFormatter))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| GameError::Platform(format!("Failed to set tracing subscriber: {}", e)))?;

    Ok(())
}

/// Sleeps for the remainder of a frame. Spin-sleeps for precision while the window has focus.
#[cfg(feature = "desktop")]
pub fn sleep(duration: Duration, focused: bool) {
    if focused {
        spin_sleep::sleep(duration);
    } else {
        std::thread::sleep(duration);
    }
}

#[cfg(not(feature = "desktop"))]
pub fn sleep(duration: Duration, _focused: bool) {
    std::thread::sleep(duration);
}
