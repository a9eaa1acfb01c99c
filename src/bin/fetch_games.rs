use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use streak_finder::config::AppConfig;
use streak_finder::game_source::DEFAULT_GAMES_FILE;
use streak_finder::games::parse_games_json;
use streak_finder::http_cache::fetch_json_cached;
use streak_finder::http_client::http_client;

fn main() -> Result<()> {
    let cfg = AppConfig::load();

    let url = parse_string_arg("--url")
        .or_else(|| cfg.games_url.clone())
        .ok_or_else(|| anyhow!("no games url: pass --url or set STREAK_GAMES_URL"))?;
    let data_dir = parse_string_arg("--data-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.data_dir.clone());
    let out_path = parse_string_arg("--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join(DEFAULT_GAMES_FILE));

    let client = http_client(cfg.http_timeout_secs)?;
    // Always revalidate: a snapshot should reflect the provider right now.
    let body = fetch_json_cached(client, &url, chrono::Duration::zero())
        .context("games download failed")?;
    let games = parse_games_json(&body)?;
    if games.is_empty() {
        return Err(anyhow!("provider returned no games; refusing to write an empty snapshot"));
    }

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let tmp = out_path.with_extension("json.tmp");
    fs::write(&tmp, &body).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, &out_path).with_context(|| format!("swap {}", out_path.display()))?;

    let mut per_season: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
    for game in &games {
        let entry = per_season.entry(game.season).or_default();
        entry.0 += 1;
        if game.is_tie() {
            entry.1 += 1;
        }
    }

    println!("Games snapshot written");
    println!("File: {}", out_path.display());
    println!("Games: {}", games.len());
    for (season, (count, ties)) in per_season {
        println!("season {}: games={} ties={}", season + 1, count, ties);
    }
    Ok(())
}

fn parse_string_arg(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
