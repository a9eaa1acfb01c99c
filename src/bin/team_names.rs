use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use streak_finder::config::AppConfig;
use streak_finder::http_cache::fetch_json_cached;
use streak_finder::http_client::http_client;
use streak_finder::reference::SHORT2LONG_FILE;

/// Builds `short2long.json` (team nickname -> full name) from a teams endpoint.
fn main() -> Result<()> {
    let cfg = AppConfig::load();

    let url = parse_string_arg("--url")
        .or_else(|| std::env::var("STREAK_TEAMS_URL").ok())
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| anyhow!("no teams url: pass --url or set STREAK_TEAMS_URL"))?;
    let data_dir = parse_string_arg("--data-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.data_dir.clone());

    println!("Creating map of team nicknames to full team names");
    let client = http_client(cfg.http_timeout_secs)?;
    let body = fetch_json_cached(client, &url, chrono::Duration::hours(cfg.cache_max_age_hours))
        .context("teams request failed")?;
    let names = parse_team_names(&body)?;
    if names.is_empty() {
        return Err(anyhow!("teams payload contained no nickname/fullName pairs"));
    }

    fs::create_dir_all(&data_dir).ok();
    let path = data_dir.join(SHORT2LONG_FILE);
    let json = serde_json::to_string_pretty(&names).context("serialize team names")?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {} team names to {}", names.len(), path.display());
    Ok(())
}

/// Accepts an array of team objects or an object keyed by team id.
fn parse_team_names(raw: &str) -> Result<BTreeMap<String, String>> {
    let v: Value = serde_json::from_str(raw.trim()).context("invalid teams json")?;
    let teams: Vec<&Value> = match &v {
        Value::Array(arr) => arr.iter().collect(),
        Value::Object(obj) => obj.values().collect(),
        _ => return Err(anyhow!("teams json must be an array or an object")),
    };

    let mut out = BTreeMap::new();
    for team in teams {
        let nickname = team.get("nickname").and_then(|x| x.as_str());
        let full_name = team
            .get("fullName")
            .or_else(|| team.get("full_name"))
            .and_then(|x| x.as_str());
        if let (Some(nick), Some(full)) = (nickname, full_name) {
            out.insert(nick.to_string(), full.to_string());
        }
    }
    Ok(out)
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

#[cfg(test)]
mod tests {
    use super::parse_team_names;

    #[test]
    fn reads_array_and_id_keyed_payloads() {
        let arr = r#"[{"nickname":"Sunbeams","fullName":"Hellmouth Sunbeams"},{"nickname":"Pies"}]"#;
        let names = parse_team_names(arr).expect("array should parse");
        assert_eq!(names.len(), 1);
        assert_eq!(names["Sunbeams"], "Hellmouth Sunbeams");

        let keyed = r#"{"abc":{"nickname":"Pies","fullName":"Philly Pies"}}"#;
        let names = parse_team_names(keyed).expect("object should parse");
        assert_eq!(names["Pies"], "Philly Pies");
    }
}
