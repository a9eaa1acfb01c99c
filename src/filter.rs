use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::error::{Result, StreakError};
use crate::games::GameRecord;
use crate::query::SeasonSelection;

/// Head-to-head games for one team, ordered by `(season, day)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamGameView {
    pub team: String,
    pub games: Vec<GameRecord>,
}

impl TeamGameView {
    pub fn season_games(&self, season: u32) -> impl Iterator<Item = &GameRecord> {
        self.games.iter().filter(move |g| g.season == season)
    }

    pub fn game_on(&self, season: u32, day: u32) -> Option<&GameRecord> {
        self.games
            .iter()
            .find(|g| g.season == season && g.day == day)
    }
}

/// Per-team views in the order the teams were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamViews(pub Vec<TeamGameView>);

impl TeamViews {
    pub fn get(&self, team: &str) -> Option<&TeamGameView> {
        self.0.iter().find(|v| v.team == team)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamGameView> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn drop_ties(games: &[GameRecord]) -> Vec<GameRecord> {
    games.iter().filter(|g| !g.is_tie()).cloned().collect()
}

/// Turn 1-indexed season tokens into 0-indexed season numbers.
/// `All` yields every season present in `games`, ascending.
pub fn resolve_seasons(selection: &SeasonSelection, games: &[GameRecord]) -> Result<Vec<u32>> {
    match selection {
        SeasonSelection::All => {
            let seasons: BTreeSet<u32> = games.iter().map(|g| g.season).collect();
            Ok(seasons.into_iter().collect())
        }
        SeasonSelection::Seasons(tokens) => {
            let mut out = Vec::with_capacity(tokens.len());
            for token in tokens {
                let number = token
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| StreakError::InvalidSeason(token.clone()))?;
                // Out-of-range seasons hold no games, so they select nothing.
                let Some(season) = number.checked_sub(1).and_then(|n| u32::try_from(n).ok()) else {
                    debug!(token = %token, "season has no games");
                    continue;
                };
                if !out.contains(&season) {
                    out.push(season);
                }
            }
            Ok(out)
        }
    }
}

/// Collect, for every requested team, the games it played against any of
/// the versus teams in the selected seasons, whichever side won. Both win
/// and loss runs come out of the same view.
pub fn filter_step(
    games: &[GameRecord],
    seasons: &[u32],
    teams: &[String],
    versus: &[String],
) -> TeamViews {
    let seasons: HashSet<u32> = seasons.iter().copied().collect();
    let versus: HashSet<&str> = versus.iter().map(String::as_str).collect();

    let views = teams
        .iter()
        .map(|team| {
            let mut team_games: Vec<GameRecord> = games
                .iter()
                .filter(|g| seasons.contains(&g.season))
                .filter(|g| is_head_to_head(g, team, &versus))
                .cloned()
                .collect();
            team_games.sort_by_key(|g| (g.season, g.day));
            TeamGameView {
                team: team.clone(),
                games: team_games,
            }
        })
        .collect();
    TeamViews(views)
}

fn is_head_to_head(game: &GameRecord, team: &str, versus: &HashSet<&str>) -> bool {
    if game.is_tie() || game.home_team == game.away_team {
        return false;
    }
    game.opponent_of(team)
        .is_some_and(|opponent| versus.contains(opponent))
}
