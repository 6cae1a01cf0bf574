#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use anyhow::Context;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use typing_survivors::app::App;
use typing_survivors::config::GameConfig;
use typing_survivors::constants::LOOP_TIME;
use typing_survivors::formatter::TickFormatter;

fn init_tracing() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().event_format(TickFormatter))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

/// The main entry point of the application.
///
/// Sets up logging, reads the configuration, opens the window and runs the game loop
/// until the player quits.
pub fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = GameConfig::from_env();
    info!(assets = %config.asset_dir.display(), highscore = %config.highscore_path.display(), "Configuration loaded");

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Could not start the game");
            return Err(e).context("Could not create app");
        }
    };

    info!(loop_time = ?LOOP_TIME, "Starting game loop");
    while app.run() {}

    info!("Game loop exited");
    Ok(())
}
