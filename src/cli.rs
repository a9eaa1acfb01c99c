use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::error::StreakError;
use crate::filter;
use crate::query::{DEFAULT_MIN_STREAK, SeasonSelection, StreakKind, StreakQuery};
use crate::reference::ReferenceData;
use crate::report::{NameStyle, OutputFormat, TableStyle};

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "streak_finder",
    version,
    about = "Find winning and losing streaks in historical game results"
)]
pub struct Cli {
    #[arg(short = 'c', long, help = "JSON config file using the same option names")]
    pub config: Option<PathBuf>,

    #[arg(long, conflicts_with = "losing", help = "Find winning streaks (default)")]
    pub winning: bool,
    #[arg(long, help = "Find losing streaks")]
    pub losing: bool,

    #[arg(long, conflicts_with_all = ["division", "league"], help = "Our team (repeat for multiple teams)")]
    pub team: Vec<String>,
    #[arg(long, conflicts_with = "league", help = "Our division (repeat for multiple divisions)")]
    pub division: Vec<String>,
    #[arg(long, help = "Our league (repeat for multiple leagues)")]
    pub league: Vec<String>,

    #[arg(long, conflicts_with_all = ["versus_division", "versus_league"], help = "Versus team (repeat for multiple teams)")]
    pub versus_team: Vec<String>,
    #[arg(long, conflicts_with = "versus_league", help = "Versus division (repeat for multiple divisions)")]
    pub versus_division: Vec<String>,
    #[arg(long, help = "Versus league (repeat for multiple leagues)")]
    pub versus_league: Vec<String>,

    #[arg(long, help = "Season, 1-indexed (repeat for multiple seasons; omit for all seasons)")]
    pub season: Vec<String>,

    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Minimum number of games to be considered a streak (default 3)"
    )]
    pub min: Option<u64>,

    #[arg(long, conflicts_with = "markdown", help = "Print streak data as HTML")]
    pub html: bool,
    #[arg(long, help = "Print streak data as Markdown tables")]
    pub markdown: bool,
    #[arg(long, help = "Write the report to this file instead of stdout")]
    pub output: Option<PathBuf>,

    #[arg(long, conflicts_with = "short", help = "One table per streak, one row per game")]
    pub long: bool,
    #[arg(long, help = "One line per streak (default)")]
    pub short: bool,

    #[arg(long, conflicts_with = "fullname", help = "Print team nicknames, e.g. Sunbeams (default)")]
    pub nickname: bool,
    #[arg(long, help = "Print full team names, e.g. Hellmouth Sunbeams")]
    pub fullname: bool,

    #[arg(long, help = "Games JSON snapshot to read instead of the configured source")]
    pub games: Option<PathBuf>,
    #[arg(long, help = "Directory with teams.json and short2long.json")]
    pub data_dir: Option<PathBuf>,
}

/// Config file counterpart of [`Cli`]; keys are the long flag names.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileConfig {
    pub winning: bool,
    pub losing: bool,
    pub team: Vec<String>,
    pub division: Vec<String>,
    pub league: Vec<String>,
    pub versus_team: Vec<String>,
    pub versus_division: Vec<String>,
    pub versus_league: Vec<String>,
    pub season: Vec<String>,
    pub min: Option<u64>,
    pub html: bool,
    pub markdown: bool,
    pub output: Option<PathBuf>,
    pub long: bool,
    pub short: bool,
    pub nickname: bool,
    pub fullname: bool,
    pub games: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let file: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parse config file {}", path.display()))?;
        file.check_conflicts()?;
        Ok(file)
    }

    /// The file obeys the same mutually exclusive groups as the flags.
    pub fn check_conflicts(&self) -> Result<(), StreakError> {
        exclusive("winning, losing", &[self.winning, self.losing])?;
        exclusive(
            "team, division, league",
            &[!self.team.is_empty(), !self.division.is_empty(), !self.league.is_empty()],
        )?;
        exclusive(
            "versus-team, versus-division, versus-league",
            &[
                !self.versus_team.is_empty(),
                !self.versus_division.is_empty(),
                !self.versus_league.is_empty(),
            ],
        )?;
        exclusive("html, markdown", &[self.html, self.markdown])?;
        exclusive("long, short", &[self.long, self.short])?;
        exclusive("nickname, fullname", &[self.nickname, self.fullname])
    }
}

fn exclusive(keys: &str, set: &[bool]) -> Result<(), StreakError> {
    if set.iter().filter(|s| **s).count() > 1 {
        return Err(StreakError::ConflictingOptions(format!(
            "only one of {keys} may be set"
        )));
    }
    Ok(())
}

impl Cli {
    /// Fill in whatever the command line left unset from `file`. Mutually
    /// exclusive groups are taken as a whole from one side.
    pub fn merge_file(mut self, file: FileConfig) -> Self {
        if !self.winning && !self.losing {
            self.winning = file.winning;
            self.losing = file.losing;
        }
        if self.team.is_empty() && self.division.is_empty() && self.league.is_empty() {
            self.team = file.team;
            self.division = file.division;
            self.league = file.league;
        }
        if self.versus_team.is_empty()
            && self.versus_division.is_empty()
            && self.versus_league.is_empty()
        {
            self.versus_team = file.versus_team;
            self.versus_division = file.versus_division;
            self.versus_league = file.versus_league;
        }
        if self.season.is_empty() {
            self.season = file.season;
        }
        self.min = self.min.or(file.min);
        if !self.html && !self.markdown {
            self.html = file.html;
            self.markdown = file.markdown;
        }
        self.output = self.output.or(file.output);
        if !self.long && !self.short {
            self.long = file.long;
            self.short = file.short;
        }
        if !self.nickname && !self.fullname {
            self.nickname = file.nickname;
            self.fullname = file.fullname;
        }
        self.games = self.games.or(file.games);
        self.data_dir = self.data_dir.or(file.data_dir);
        self
    }

    pub fn kind(&self) -> StreakKind {
        if self.losing && !self.winning {
            StreakKind::Losing
        } else {
            StreakKind::Winning
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.html {
            OutputFormat::Html
        } else if self.markdown {
            OutputFormat::Markdown
        } else {
            OutputFormat::Text
        }
    }

    pub fn table_style(&self) -> TableStyle {
        if self.long && !self.short {
            TableStyle::Long
        } else {
            TableStyle::Short
        }
    }

    pub fn name_style(&self) -> NameStyle {
        if self.fullname && !self.nickname {
            NameStyle::FullName
        } else {
            NameStyle::Nickname
        }
    }

    /// Expand leagues/divisions, validate team names and season tokens,
    /// and default empty selections to every team.
    pub fn resolve_query(&self, reference: &ReferenceData) -> Result<StreakQuery, StreakError> {
        let teams = resolve_teams(reference, &self.team, &self.division, &self.league)?;
        let versus = resolve_teams(
            reference,
            &self.versus_team,
            &self.versus_division,
            &self.versus_league,
        )?;

        let seasons = SeasonSelection::from_tokens(&self.season);
        // Fail on bad tokens before any game data is loaded.
        filter::resolve_seasons(&seasons, &[])?;

        let min = match self.min {
            Some(0) => return Err(StreakError::InvalidMinimum(0)),
            Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
            None => DEFAULT_MIN_STREAK,
        };

        Ok(StreakQuery::new(self.kind(), teams, versus)
            .with_seasons(seasons)
            .with_min(min))
    }
}

fn resolve_teams(
    reference: &ReferenceData,
    teams: &[String],
    divisions: &[String],
    leagues: &[String],
) -> Result<Vec<String>, StreakError> {
    let mut out = Vec::new();
    for team in teams {
        out.push(reference.resolve_team(team)?);
    }
    for division in divisions {
        out.extend(reference.division_to_teams(division)?);
    }
    for league in leagues {
        out.extend(reference.league_to_teams(league)?);
    }
    if out.is_empty() {
        out = reference.all_teams();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_groups_are_mutually_exclusive() {
        let file = FileConfig {
            html: true,
            markdown: true,
            ..FileConfig::default()
        };
        assert!(matches!(
            file.check_conflicts(),
            Err(StreakError::ConflictingOptions(ref msg)) if msg.contains("html, markdown")
        ));

        let file = FileConfig {
            losing: true,
            versus_division: vec!["Mild High".into()],
            long: true,
            ..FileConfig::default()
        };
        assert!(file.check_conflicts().is_ok());
    }
}
