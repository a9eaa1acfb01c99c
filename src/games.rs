use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{debug, warn};

/// One played game as supplied by the upstream results provider.
/// Seasons and days are 0-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub season: u32,
    pub day: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_score: i32,
    pub away_score: i32,
}

impl GameRecord {
    pub fn is_tie(&self) -> bool {
        self.home_score == self.away_score
    }

    pub fn winner(&self) -> Option<&str> {
        if self.home_score > self.away_score {
            Some(self.home_team.as_str())
        } else if self.home_score < self.away_score {
            Some(self.away_team.as_str())
        } else {
            None
        }
    }

    pub fn loser(&self) -> Option<&str> {
        if self.home_score > self.away_score {
            Some(self.away_team.as_str())
        } else if self.home_score < self.away_score {
            Some(self.home_team.as_str())
        } else {
            None
        }
    }

    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.home_team == team {
            Some(self.away_team.as_str())
        } else if self.away_team == team {
            Some(self.home_team.as_str())
        } else {
            None
        }
    }
}

/// Parse the upstream games payload.
///
/// Accepts a bare array or an object wrapping the array under `games` or
/// `data`. Rows that lack a required field are skipped.
pub fn parse_games_json(raw: &str) -> Result<Vec<GameRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid games json")?;

    let rows = match &v {
        Value::Array(arr) => arr,
        Value::Object(obj) => obj
            .get("games")
            .or_else(|| obj.get("data"))
            .and_then(|x| x.as_array())
            .ok_or_else(|| anyhow!("games json object has no games array"))?,
        _ => return Err(anyhow!("games json must be an array or an object")),
    };

    let mut out = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in rows {
        match parse_game_record(row) {
            Some(game) => out.push(game),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, kept = out.len(), "skipped malformed game rows");
    }
    debug!(games = out.len(), "parsed games payload");
    Ok(out)
}

fn parse_game_record(v: &Value) -> Option<GameRecord> {
    let season = as_u32_any(v.get("season")?)?;
    let day = as_u32_any(v.get("day")?)?;

    let home_team = string_field(v, &["homeTeamNickname", "homeTeam"])?;
    let away_team = string_field(v, &["awayTeamNickname", "awayTeam"])?;
    if home_team.is_empty() || away_team.is_empty() {
        return None;
    }
    let home_team_name =
        string_field(v, &["homeTeamName"]).unwrap_or_else(|| home_team.clone());
    let away_team_name =
        string_field(v, &["awayTeamName"]).unwrap_or_else(|| away_team.clone());

    let home_score = as_score(v.get("homeScore")?)?;
    let away_score = as_score(v.get("awayScore")?)?;

    Some(GameRecord {
        season,
        day,
        home_team,
        away_team,
        home_team_name,
        away_team_name,
        home_score,
        away_score,
    })
}

fn string_field(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| v.get(*k).and_then(|x| x.as_str()))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn as_u64_any(v: &Value) -> Option<u64> {
    if let Some(n) = v.as_u64() {
        return Some(n);
    }
    v.as_str()?.trim().parse::<u64>().ok()
}

fn as_u32_any(v: &Value) -> Option<u32> {
    let n = as_u64_any(v)?;
    u32::try_from(n).ok()
}

// Scores occasionally arrive as whole floats ("3.0"); anything fractional is rejected.
fn as_score(v: &Value) -> Option<i32> {
    if let Some(n) = v.as_i64() {
        return i32::try_from(n).ok();
    }
    let f = match v.as_f64() {
        Some(f) => f,
        None => v.as_str()?.trim().parse::<f64>().ok()?,
    };
    if f.fract() != 0.0 || !f.is_finite() {
        return None;
    }
    i32::try_from(f as i64).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_accept_whole_floats_and_strings() {
        assert_eq!(as_score(&serde_json::json!(4)), Some(4));
        assert_eq!(as_score(&serde_json::json!(3.0)), Some(3));
        assert_eq!(as_score(&serde_json::json!("7")), Some(7));
        assert_eq!(as_score(&serde_json::json!(2.5)), None);
        assert_eq!(as_score(&serde_json::json!("x")), None);
    }

    #[test]
    fn full_name_falls_back_to_nickname() {
        let row = serde_json::json!({
            "season": "2", "day": 10,
            "homeTeamNickname": "Tacos", "awayTeamNickname": "Pies",
            "homeScore": 1, "awayScore": 5
        });
        let game = parse_game_record(&row).expect("row should parse");
        assert_eq!(game.season, 2);
        assert_eq!(game.home_team_name, "Tacos");
        assert_eq!(game.winner(), Some("Pies"));
        assert_eq!(game.loser(), Some("Tacos"));
        assert_eq!(game.opponent_of("Pies"), Some("Tacos"));
    }

    #[test]
    fn tie_has_no_winner() {
        let row = serde_json::json!({
            "season": 0, "day": 0,
            "homeTeamNickname": "Tacos", "awayTeamNickname": "Pies",
            "homeScore": 3, "awayScore": 3
        });
        let game = parse_game_record(&row).expect("row should parse");
        assert!(game.is_tie());
        assert_eq!(game.winner(), None);
        assert_eq!(game.loser(), None);
    }
}
