use tracing_subscriber::EnvFilter;

use crate::AppConfig;

/// Installs the global `tracing` subscriber. `RUST_LOG` takes precedence over
/// `logging.level`; calling it twice keeps the first subscriber.
pub fn setup_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.logging.ansi)
        .with_target(true)
        .try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed, keeping existing one");
    }
}
