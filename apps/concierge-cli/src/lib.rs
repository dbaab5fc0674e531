//! Shared start-up for the command-line binaries.
use anyhow::Result;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use concierge_core::config::{Config, Settings};

/// Load configuration from `dir` and install a stderr subscriber.
/// `RUST_LOG` overrides the configured `logging.level`.
pub fn bootstrap(dir: &Path) -> Result<(Config, Settings)> {
    let config = Config::load_from(dir)?;
    let settings = config.settings()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    tracing::debug!(dir = %dir.display(), "configuration loaded");
    Ok((config, settings))
}
