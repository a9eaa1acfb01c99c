use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use crate::cli::{Cli, FileConfig};
use crate::config::AppConfig;
use crate::error::StreakError;
use crate::game_source::{load_all, resolve_source};
use crate::query::run_query;
use crate::reference::ReferenceData;
use crate::report::{ReportContext, render_report};

/// A finished report and where it should go.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub body: String,
    /// `None` means stdout.
    pub output: Option<PathBuf>,
}

/// Run one query end to end and render it. "No streaks" is a normal
/// outcome and comes back as a rendered message, not an error.
pub fn execute(cli: Cli, cfg: &AppConfig) -> Result<Rendered> {
    let cli = match cli.config.clone() {
        Some(path) => cli.merge_file(FileConfig::load(&path)?),
        None => cli,
    };

    let mut cfg = cfg.clone();
    if let Some(dir) = cli.data_dir.clone() {
        cfg.data_dir = dir;
    }
    let reference = ReferenceData::load(&cfg.data_dir)?;
    let query = cli.resolve_query(&reference)?;
    let output = cli.output.as_deref().map(prepare_output_path).transpose()?;

    let source = resolve_source(cli.games.as_deref(), &cfg)?;
    let games = load_all(source.as_ref())?;

    let format = cli.output_format();
    let ctx = ReportContext {
        kind: query.kind,
        min: query.min,
        teams: &query.teams,
        versus_teams: &query.versus_teams,
        seasons: &query.seasons,
        names: cli.name_style(),
        reference: &reference,
    };

    match run_query(&games, &query) {
        Ok(report) => Ok(Rendered {
            body: render_report(format, cli.table_style(), &ctx, &report),
            output,
        }),
        Err(StreakError::NoStreaksFound) => {
            info!("no streaks matched");
            Ok(Rendered {
                body: format.renderer().render_no_streaks(),
                output: None,
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Write to the requested file, or stdout.
pub fn emit(rendered: &Rendered) -> Result<()> {
    match rendered.output.as_ref() {
        Some(path) => {
            fs::write(path, &rendered.body)
                .with_context(|| format!("write report to {}", path.display()))?;
            println!("Wrote report to file: {}", path.display());
        }
        None => print!("{}", rendered.body),
    }
    Ok(())
}

fn prepare_output_path(raw: &Path) -> Result<PathBuf> {
    let path = std::path::absolute(raw)
        .with_context(|| format!("resolve output path {}", raw.display()))?;
    if path.exists() {
        warn!(path = %path.display(), "overwriting existing output file");
        return Ok(path);
    }
    let parent = path
        .parent()
        .ok_or_else(|| anyhow!("output path {} has no parent directory", path.display()))?;
    if !parent.is_dir() {
        return Err(anyhow!(
            "directory for output file ({}) does not exist",
            parent.display()
        ));
    }
    Ok(path)
}
