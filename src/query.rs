use tracing::{debug, info};

use crate::error::{Result, StreakError};
use crate::filter::{self, TeamViews};
use crate::games::GameRecord;
use crate::streaks::{self, StreakRecord};

pub const DEFAULT_MIN_STREAK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreakKind {
    #[default]
    Winning,
    Losing,
}

impl StreakKind {
    pub fn label(self) -> &'static str {
        match self {
            StreakKind::Winning => "Winning",
            StreakKind::Losing => "Losing",
        }
    }

    /// Does `game` count toward a streak of this kind for `team`?
    pub fn qualifies(self, game: &GameRecord, team: &str) -> bool {
        let side = match self {
            StreakKind::Winning => game.winner(),
            StreakKind::Losing => game.loser(),
        };
        side == Some(team)
    }
}

/// Seasons as the user asked for them: 1-indexed tokens, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeasonSelection {
    #[default]
    All,
    Seasons(Vec<String>),
}

impl SeasonSelection {
    /// No tokens, or any token spelled `all`, selects every season.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .collect();
        if tokens.is_empty() || tokens.iter().any(|t| t.eq_ignore_ascii_case("all")) {
            SeasonSelection::All
        } else {
            SeasonSelection::Seasons(tokens)
        }
    }
}

/// A fully normalized request: team names are already in data spelling
/// and league/division selections are expanded.
#[derive(Debug, Clone)]
pub struct StreakQuery {
    pub kind: StreakKind,
    pub teams: Vec<String>,
    pub versus_teams: Vec<String>,
    pub seasons: SeasonSelection,
    pub min: usize,
}

impl StreakQuery {
    pub fn new(kind: StreakKind, teams: Vec<String>, versus_teams: Vec<String>) -> Self {
        Self {
            kind,
            teams: dedup_preserving_order(teams),
            versus_teams: dedup_preserving_order(versus_teams),
            seasons: SeasonSelection::All,
            min: DEFAULT_MIN_STREAK,
        }
    }

    pub fn with_seasons(mut self, seasons: SeasonSelection) -> Self {
        self.seasons = seasons;
        self
    }

    pub fn with_min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }
}

#[derive(Debug, Clone)]
pub struct StreakReport {
    /// Ranked: longest first, then earliest season, then earliest start day.
    pub streaks: Vec<StreakRecord>,
    pub views: TeamViews,
    /// 0-indexed.
    pub seasons: Vec<u32>,
}

/// Filter, detect and rank in one pass over an in-memory games table.
pub fn run_query(games: &[GameRecord], query: &StreakQuery) -> Result<StreakReport> {
    if query.min == 0 {
        return Err(StreakError::InvalidMinimum(query.min));
    }

    let games = filter::drop_ties(games);
    let seasons = filter::resolve_seasons(&query.seasons, &games)?;
    debug!(
        games = games.len(),
        seasons = ?seasons,
        teams = query.teams.len(),
        versus = query.versus_teams.len(),
        "running streak query"
    );

    let views = filter::filter_step(&games, &seasons, &query.teams, &query.versus_teams);
    let mut streaks = streaks::detect_streaks(&views, query.kind, query.min, &seasons)?;
    streaks::rank_streaks(&mut streaks);
    info!(
        streaks = streaks.len(),
        kind = query.kind.label(),
        min = query.min,
        "streak query complete"
    );

    Ok(StreakReport {
        streaks,
        views,
        seasons,
    })
}

pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
