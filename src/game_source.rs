use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::config::AppConfig;
use crate::games::{GameRecord, parse_games_json};
use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;

pub const DEFAULT_GAMES_FILE: &str = "games.json";

/// Anything that can hand over the full table of played games.
pub trait GameSource {
    fn describe(&self) -> String;
    fn load_games(&self) -> Result<Vec<GameRecord>>;
}

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GameSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn load_games(&self) -> Result<Vec<GameRecord>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read games file {}", self.path.display()))?;
        parse_games_json(&raw).with_context(|| format!("parse games file {}", self.path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    pub url: String,
    pub timeout_secs: u64,
    pub max_age_hours: i64,
}

impl GameSource for HttpSource {
    fn describe(&self) -> String {
        format!("url {}", self.url)
    }

    fn load_games(&self) -> Result<Vec<GameRecord>> {
        let client = http_client(self.timeout_secs)?;
        let body = fetch_json_cached(
            client,
            &self.url,
            chrono::Duration::hours(self.max_age_hours),
        )
        .context("games request failed")?;
        parse_games_json(&body)
    }
}

/// Pick the games source: an explicit file wins, then a configured file,
/// then a configured URL, then `<data_dir>/games.json`.
pub fn resolve_source(explicit: Option<&Path>, cfg: &AppConfig) -> Result<Box<dyn GameSource>> {
    if let Some(path) = explicit.or(cfg.games_file.as_deref()) {
        return Ok(Box::new(JsonFileSource::new(path)));
    }
    if let Some(url) = cfg.games_url.as_ref() {
        return Ok(Box::new(HttpSource {
            url: url.clone(),
            timeout_secs: cfg.http_timeout_secs,
            max_age_hours: cfg.cache_max_age_hours,
        }));
    }
    let fallback = cfg.data_dir.join(DEFAULT_GAMES_FILE);
    if fallback.exists() {
        return Ok(Box::new(JsonFileSource::new(fallback)));
    }
    Err(anyhow!(
        "no game data: pass --games <file>, set STREAK_GAMES_URL, or run fetch_games to create {}",
        fallback.display()
    ))
}

pub fn load_all(source: &dyn GameSource) -> Result<Vec<GameRecord>> {
    let games = source.load_games()?;
    info!(source = %source.describe(), games = games.len(), "loaded game records");
    Ok(games)
}
