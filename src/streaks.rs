use tracing::debug;

use crate::error::{Result, StreakError};
use crate::filter::TeamViews;
use crate::games::GameRecord;
use crate::query::StreakKind;

/// A maximal run of qualifying games for one team inside one season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakRecord {
    pub team_name: String,
    pub length: usize,
    /// 0-indexed.
    pub season: u32,
    /// 0-indexed; always `days[0]`.
    pub start_day: u32,
    /// 0-indexed days of the games in the run, ascending.
    pub days: Vec<u32>,
}

/// Walk every team's season-ordered games and emit each run of at least
/// `min` qualifying games. Runs are closed at the first non-qualifying
/// game and at the end of every season, so they never span two seasons.
///
/// Emission order is team order, then `seasons` order, then chronological.
/// Fails with [`StreakError::NoStreaksFound`] when nothing qualifies.
pub fn detect_streaks(
    views: &TeamViews,
    kind: StreakKind,
    min: usize,
    seasons: &[u32],
) -> Result<Vec<StreakRecord>> {
    if min == 0 {
        return Err(StreakError::InvalidMinimum(min));
    }

    let mut out = Vec::new();
    for view in views.iter() {
        if view.games.is_empty() {
            continue;
        }
        for &season in seasons {
            let before = out.len();
            scan_season(&view.team, season, view.season_games(season), kind, min, &mut out);
            debug!(
                team = %view.team,
                season,
                found = out.len() - before,
                "scanned season"
            );
        }
    }

    if out.is_empty() {
        return Err(StreakError::NoStreaksFound);
    }
    Ok(out)
}

fn scan_season<'a>(
    team: &str,
    season: u32,
    games: impl Iterator<Item = &'a GameRecord>,
    kind: StreakKind,
    min: usize,
    out: &mut Vec<StreakRecord>,
) {
    let mut run: Vec<u32> = Vec::new();
    for game in games {
        if kind.qualifies(game, team) {
            run.push(game.day);
        } else {
            close_run(team, season, &mut run, min, out);
        }
    }
    // End of season closes whatever is still open.
    close_run(team, season, &mut run, min, out);
}

fn close_run(team: &str, season: u32, run: &mut Vec<u32>, min: usize, out: &mut Vec<StreakRecord>) {
    let days = std::mem::take(run);
    if days.len() < min {
        return;
    }
    out.push(StreakRecord {
        team_name: team.to_string(),
        length: days.len(),
        season,
        start_day: days[0],
        days,
    });
}

/// Stable sort: length descending, then season ascending, then start day
/// ascending. Full ties keep emission order.
pub fn rank_streaks(streaks: &mut [StreakRecord]) {
    streaks.sort_by(|a, b| {
        b.length
            .cmp(&a.length)
            .then(a.season.cmp(&b.season))
            .then(a.start_day.cmp(&b.start_day))
    });
}
