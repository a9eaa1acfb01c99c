use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreakError {
    #[error("invalid season {0:?}: seasons must be integers, e.g. --season 1 --season 2")]
    InvalidSeason(String),

    #[error("could not find any teams in league {name} (choose from: {choices})")]
    UnknownLeague { name: String, choices: String },

    #[error("could not find any teams in division {name} (choose from: {choices})")]
    UnknownDivision { name: String, choices: String },

    #[error("unknown team {name} (choose from: {choices})")]
    UnknownTeam { name: String, choices: String },

    #[error("conflicting options in config file: {0}")]
    ConflictingOptions(String),

    #[error("minimum streak length must be at least 1 (got {0})")]
    InvalidMinimum(usize),

    #[error("no streaks found")]
    NoStreaksFound,

    #[error("missing reference data file: {}", .0.display())]
    MissingReferenceData(PathBuf),
}

pub type Result<T> = std::result::Result<T, StreakError>;

impl StreakError {
    /// Errors caused by what the user asked for rather than by the data.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            StreakError::InvalidSeason(_)
                | StreakError::UnknownLeague { .. }
                | StreakError::UnknownDivision { .. }
                | StreakError::UnknownTeam { .. }
                | StreakError::InvalidMinimum(_)
                | StreakError::ConflictingOptions(_)
        )
    }
}
