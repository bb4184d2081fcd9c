mod config;

pub use config::{
    CacheConfig, Config, DisplayConfig, LinksConfig, ServiceConfig, TimelineConfig,
    ANALYTICS_TOKEN_ENV, CONTENT_TOKEN_ENV,
};

use std::path::PathBuf;

/// Returns `~/.config/courseboard[-dev]/` based on COURSEBOARD_ENV.
///
/// Set COURSEBOARD_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("COURSEBOARD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("courseboard-dev")
    } else {
        base_dir.join("courseboard")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
