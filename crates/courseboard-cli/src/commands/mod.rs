pub mod answers;
pub mod config;
pub mod content;
pub mod engagement;
pub mod learners;

use serde::Serialize;
use std::path::Path;

use courseboard_core::{Config, CourseEngine};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load the config from `path`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default(),
    })
}

pub fn engine(path: Option<&Path>) -> Result<CourseEngine, Box<dyn std::error::Error>> {
    let config = load_config(path)?.with_env_overrides();
    tracing::debug!(
        content = %config.content_service.base_url,
        analytics = %config.analytics_service.base_url,
        cache = config.cache.enabled,
        "building engine"
    );
    Ok(CourseEngine::from_config(&config)?)
}

pub fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
