use crate::cli::Cli;
use crate::error::LbResult;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;
use tracing::Level;

const TRACE_LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
const DEFAULT_SETTINGS_FILE: &str = "leaderboard.yaml";
const ENV_PREFIX: &str = "LEADERBOARD_";

// All settings may be configured via environment variables. Example:
// LEADERBOARD_SIZE_LIMIT=50 would set size_limit to 50.
#[derive(Deserialize, Debug)]
pub struct Settings {
    #[serde(default = "default_trace_level")]
    trace_level: String,
    // Maximum number of scores kept in memory per leaderboard
    #[serde(default = "default_size_limit")]
    pub size_limit: usize,
    // Age after which unfrozen map metadata is refreshed from upstream
    #[serde(default = "default_map_update_interval_hours")]
    pub map_update_interval_hours: i64,
    #[serde(default = "default_cache_leaderboards")]
    pub cache_leaderboards: bool,
}

impl Settings {
    /// Layers the settings file, the environment and the command line, in
    /// increasing order of precedence.
    pub fn new(cli: &Cli) -> LbResult<Self> {
        let settings_file = cli
            .config
            .clone()
            .unwrap_or_else(|| DEFAULT_SETTINGS_FILE.into());

        let mut figment = Figment::new();
        if Path::new(&settings_file).exists() {
            println!(
                "\n######################################\n\
                   ##   Found '{}' file,\n\
                   ##   loading local configuration.   ##\n\
                   ######################################\n\
                ",
                settings_file.display()
            );
            figment = figment.merge(Yaml::file(&settings_file));
        }
        figment = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(cli));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> LbResult<Self> {
        Ok(figment.extract()?)
    }

    pub fn get_trace_level(&self) -> Level {
        get_trace_level(&self.trace_level)
    }

    pub fn map_update_interval(&self) -> chrono::Duration {
        chrono::Duration::hours(self.map_update_interval_hours)
    }
}

fn get_trace_level(level_str: &str) -> Level {
    match level_str {
        level if level == TRACE_LEVELS[0] => Level::TRACE,
        level if level == TRACE_LEVELS[1] => Level::DEBUG,
        level if level == TRACE_LEVELS[2] => Level::INFO,
        level if level == TRACE_LEVELS[3] => Level::WARN,
        level if level == TRACE_LEVELS[4] => Level::ERROR,
        // Default trace level
        _ => Level::INFO,
    }
}

fn default_trace_level() -> String {
    "INFO".to_string()
}

fn default_size_limit() -> usize {
    crate::core::leaderboard::SIZE_LIMIT
}

fn default_map_update_interval_hours() -> i64 {
    24
}

fn default_cache_leaderboards() -> bool {
    true
}
