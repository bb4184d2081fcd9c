use std::time::Duration;

use crate::storage::Config;

/// Engine knobs taken from [`Config`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub cache_ttl: Duration,
    pub segment_size: u64,
    pub unknown_label: String,
    pub top_countries: usize,
    pub answer_chart_limit: usize,
    pub link_base: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            cache_ttl: config.cache.ttl(),
            segment_size: config.timeline.segment_size,
            unknown_label: config.display.unknown_label.clone(),
            top_countries: config.display.top_countries,
            answer_chart_limit: config.display.answer_chart_limit,
            link_base: config.links.base_path.clone(),
        }
    }
}
