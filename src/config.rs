use std::path::PathBuf;

use crate::http_client::DEFAULT_REQUEST_TIMEOUT_SECS;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_CACHE_MAX_AGE_HOURS: i64 = 24;

/// Environment-level settings. CLI flags take precedence over these.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding `teams.json`, `short2long.json` and the default
    /// games snapshot (STREAK_DATA_DIR).
    pub data_dir: PathBuf,
    /// Local games snapshot (STREAK_GAMES_FILE).
    pub games_file: Option<PathBuf>,
    /// Upstream games endpoint (STREAK_GAMES_URL).
    pub games_url: Option<String>,
    pub http_timeout_secs: u64,
    pub cache_max_age_hours: i64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            games_file: None,
            games_url: None,
            http_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_max_age_hours: DEFAULT_CACHE_MAX_AGE_HOURS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `.env.local` and `.env` (if present) before reading the environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: non_empty_var("STREAK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            games_file: non_empty_var("STREAK_GAMES_FILE").map(PathBuf::from),
            games_url: non_empty_var("STREAK_GAMES_URL"),
            http_timeout_secs: non_empty_var("STREAK_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.http_timeout_secs)
                .clamp(1, 300),
            cache_max_age_hours: non_empty_var("STREAK_CACHE_MAX_AGE_HOURS")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(defaults.cache_max_age_hours)
                .max(0),
            log_level: non_empty_var("STREAK_LOG")
                .or_else(|| non_empty_var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
