//! Static league / division / team reference data.
//!
//! Team identifiers are nicknames spelled as the game data spells them.
//! `Dalé` is the one name with an accent; the command line also accepts
//! the plain spelling.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::error::StreakError;

pub const TEAMS_FILE: &str = "teams.json";
pub const SHORT2LONG_FILE: &str = "short2long.json";

const DALE_SAFE: &str = "Dale";
const DALE_UTF8: &str = "Dal\u{e9}";
const FULL_DALE_SAFE: &str = "Miami Dale";
const FULL_DALE_UTF8: &str = "Miami Dal\u{e9}";

/// One season's league and division layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeasonTeams {
    #[serde(default)]
    pub leagues: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub divisions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub seasons: Vec<SeasonTeams>,
    pub short2long: HashMap<String, String>,
}

impl ReferenceData {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let teams_path = data_dir.join(TEAMS_FILE);
        let names_path = data_dir.join(SHORT2LONG_FILE);
        let seasons: Vec<SeasonTeams> = read_json(&teams_path)?;
        let short2long: HashMap<String, String> = read_json(&names_path)?;
        debug!(
            seasons = seasons.len(),
            names = short2long.len(),
            dir = %data_dir.display(),
            "loaded reference data"
        );
        Ok(Self {
            seasons,
            short2long,
        })
    }

    pub fn leagues(&self) -> Vec<String> {
        self.collect_keys(|s| &s.leagues)
    }

    pub fn divisions(&self) -> Vec<String> {
        self.collect_keys(|s| &s.divisions)
    }

    /// Every team that appears in any league, sorted.
    pub fn all_teams(&self) -> Vec<String> {
        let teams: BTreeSet<&String> = self
            .seasons
            .iter()
            .flat_map(|s| s.leagues.values())
            .flatten()
            .collect();
        teams.into_iter().cloned().collect()
    }

    pub fn league_to_teams(&self, league: &str) -> Result<Vec<String>, StreakError> {
        self.first_group(|s| s.leagues.get(league))
            .ok_or_else(|| StreakError::UnknownLeague {
                name: league.to_string(),
                choices: choices(&self.leagues()),
            })
    }

    pub fn division_to_teams(&self, division: &str) -> Result<Vec<String>, StreakError> {
        self.first_group(|s| s.divisions.get(division))
            .ok_or_else(|| StreakError::UnknownDivision {
                name: division.to_string(),
                choices: choices(&self.divisions()),
            })
    }

    /// Map a command-line team name onto the data spelling, rejecting
    /// names that are not in any league.
    pub fn resolve_team(&self, input: &str) -> Result<String, StreakError> {
        let wanted = display_name(input.trim());
        let teams = self.all_teams();
        match teams.iter().find(|t| **t == wanted) {
            Some(team) => Ok(team.clone()),
            None => Err(StreakError::UnknownTeam {
                name: input.to_string(),
                choices: choices(&teams),
            }),
        }
    }

    pub fn full_name(&self, nickname: &str) -> String {
        self.short2long
            .get(nickname)
            .cloned()
            .unwrap_or_else(|| nickname.to_string())
    }

    fn collect_keys(&self, f: impl Fn(&SeasonTeams) -> &BTreeMap<String, Vec<String>>) -> Vec<String> {
        let keys: BTreeSet<&String> = self.seasons.iter().flat_map(|s| f(s).keys()).collect();
        keys.into_iter().cloned().collect()
    }

    fn first_group<'a>(
        &'a self,
        f: impl Fn(&'a SeasonTeams) -> Option<&'a Vec<String>>,
    ) -> Option<Vec<String>> {
        let mut teams = self
            .seasons
            .iter()
            .filter_map(f)
            .find(|teams| !teams.is_empty())?
            .clone();
        teams.sort();
        Some(teams)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(StreakError::MissingReferenceData(PathBuf::from(path)).into());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("read reference data {}", path.display()));
        }
    };
    serde_json::from_str(&raw).with_context(|| format!("parse reference data {}", path.display()))
}

/// Valid names for an error message, spelled the way they can be typed.
fn choices(names: &[String]) -> String {
    names
        .iter()
        .map(|n| cli_safe_name(n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Spelling safe to type on a command line.
pub fn cli_safe_name(name: &str) -> &str {
    match name {
        DALE_UTF8 => DALE_SAFE,
        FULL_DALE_UTF8 => FULL_DALE_SAFE,
        other => other,
    }
}

/// Spelling used by the game data and reports.
pub fn display_name(name: &str) -> String {
    match name {
        DALE_SAFE => DALE_UTF8.to_string(),
        FULL_DALE_SAFE => FULL_DALE_UTF8.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dale_spellings_convert_both_ways() {
        assert_eq!(cli_safe_name("Dal\u{e9}"), "Dale");
        assert_eq!(cli_safe_name("Miami Dal\u{e9}"), "Miami Dale");
        assert_eq!(cli_safe_name("Tacos"), "Tacos");
        assert_eq!(display_name("Dale"), "Dal\u{e9}");
        assert_eq!(display_name("Miami Dale"), "Miami Dal\u{e9}");
        assert_eq!(display_name("Pies"), "Pies");
    }
}
