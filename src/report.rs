use std::collections::HashSet;

use crate::filter::TeamViews;
use crate::games::GameRecord;
use crate::query::{SeasonSelection, StreakKind, StreakReport};
use crate::reference::ReferenceData;
use crate::render_html::HtmlRenderer;
use crate::render_markdown::MarkdownRenderer;
use crate::render_text::TextRenderer;
use crate::streaks::StreakRecord;

pub const INDEX_NOTE: &str = "Note: all days and seasons displayed are 1-indexed.";
pub const NO_STREAKS_MESSAGE: &str = "No streaks matching the specified criteria were found. Try a lower value for --min, or more versus teams.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    #[default]
    Nickname,
    FullName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStyle {
    /// One row per streak.
    #[default]
    Short,
    /// One table per streak, one row per game.
    Long,
}

/// What the renderers need to know about the request besides the streaks.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub kind: StreakKind,
    pub min: usize,
    pub teams: &'a [String],
    pub versus_teams: &'a [String],
    pub seasons: &'a SeasonSelection,
    pub names: NameStyle,
    pub reference: &'a ReferenceData,
}

impl ReportContext<'_> {
    /// e.g. "Winning streaks of 3 or more games for Tacos versus all teams for all time"
    pub fn describe(&self) -> String {
        let all_teams = self.reference.all_teams();
        let ours = team_list_label(self.teams, &all_teams);
        let theirs = team_list_label(self.versus_teams, &all_teams);

        let when = match self.seasons {
            SeasonSelection::All => "for all time".to_string(),
            SeasonSelection::Seasons(tokens) if tokens.len() == 1 => {
                format!("for season {}", tokens[0])
            }
            SeasonSelection::Seasons(tokens) => format!("for seasons {}", tokens.join(", ")),
        };

        format!(
            "{} streaks of {} or more games for {} versus {} {}",
            self.kind.label(),
            self.min,
            ours,
            theirs,
            when
        )
    }

    pub fn team_label(&self, nickname: &str) -> String {
        match self.names {
            NameStyle::Nickname => nickname.to_string(),
            NameStyle::FullName => self.reference.full_name(nickname),
        }
    }

    /// `G1: Season 2 Game 14: Pies 3  @  5 Tacos` (away first, 1-indexed).
    pub fn game_line(&self, index: usize, game: &GameRecord) -> String {
        let (away, home) = match self.names {
            NameStyle::Nickname => (&game.away_team, &game.home_team),
            NameStyle::FullName => (&game.away_team_name, &game.home_team_name),
        };
        format!(
            "G{}: Season {} Game {}: {} {:<2} @ {:>2} {}",
            index + 1,
            game.season + 1,
            game.day + 1,
            away,
            game.away_score,
            game.home_score,
            home
        )
    }

    pub fn streak_title(&self, streak: &StreakRecord) -> String {
        format!("{} Game {} Streak", streak.length, self.kind.label())
    }

    pub fn season_games_label(&self, streak: &StreakRecord) -> String {
        format!("Season {} Games {}", streak.season + 1, days_label(&streak.days))
    }
}

fn team_list_label(teams: &[String], all_teams: &[String]) -> String {
    let requested: HashSet<&str> = teams.iter().map(String::as_str).collect();
    let covers_all = !all_teams.is_empty() && all_teams.iter().all(|t| requested.contains(t.as_str()));
    if covers_all {
        "all teams".to_string()
    } else {
        teams.join(", ")
    }
}

/// 0-indexed days rendered 1-indexed, comma separated.
pub fn days_label(days: &[u32]) -> String {
    days.iter()
        .map(|d| (d + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Games of `streak` in order, looked up in the team's filtered view.
pub fn streak_games<'v>(streak: &StreakRecord, views: &'v TeamViews) -> Vec<&'v GameRecord> {
    let Some(view) = views.get(&streak.team_name) else {
        return Vec::new();
    };
    streak
        .days
        .iter()
        .filter_map(|day| view.game_on(streak.season, *day))
        .collect()
}

pub trait Renderer {
    fn render_short(&self, ctx: &ReportContext<'_>, streaks: &[StreakRecord]) -> String;

    fn render_long(
        &self,
        ctx: &ReportContext<'_>,
        streaks: &[StreakRecord],
        views: &TeamViews,
    ) -> String;

    fn render_no_streaks(&self) -> String {
        format!("\n{NO_STREAKS_MESSAGE}\n")
    }
}

impl OutputFormat {
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            OutputFormat::Text => Box::new(TextRenderer),
            OutputFormat::Html => Box::new(HtmlRenderer),
            OutputFormat::Markdown => Box::new(MarkdownRenderer),
        }
    }
}

pub fn render_report(
    format: OutputFormat,
    style: TableStyle,
    ctx: &ReportContext<'_>,
    report: &StreakReport,
) -> String {
    let renderer = format.renderer();
    match style {
        TableStyle::Short => renderer.render_short(ctx, &report.streaks),
        TableStyle::Long => renderer.render_long(ctx, &report.streaks, &report.views),
    }
}
