use crate::filter::TeamViews;
use crate::report::{INDEX_NOTE, ReportContext, Renderer, days_label, streak_games};
use crate::streaks::StreakRecord;

const RULE_WIDTH: usize = 60;

/// Fixed-width plain text tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

fn short_row(team: &str, length: &str, season: &str, days: &str) -> String {
    format!("{team:<25} {length:<9} {season:<9} {days}")
}

impl Renderer for TextRenderer {
    fn render_short(&self, ctx: &ReportContext<'_>, streaks: &[StreakRecord]) -> String {
        let mut lines = Vec::with_capacity(streaks.len() + 4);
        lines.push(format!("\n{}\n", ctx.describe()));
        lines.push(short_row("Team Name", "Length", "Season", "Days"));
        lines.push("-".repeat(RULE_WIDTH));
        for streak in streaks {
            lines.push(short_row(
                &ctx.team_label(&streak.team_name),
                &streak.length.to_string(),
                &(streak.season + 1).to_string(),
                &days_label(&streak.days),
            ));
        }
        lines.push(format!("\n{INDEX_NOTE}"));
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn render_long(
        &self,
        ctx: &ReportContext<'_>,
        streaks: &[StreakRecord],
        views: &TeamViews,
    ) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        let mut out = format!("\n{}\n", ctx.describe());
        for streak in streaks {
            let mut block = vec![
                "\n".to_string(),
                rule.clone(),
                ctx.streak_title(streak),
                ctx.team_label(&streak.team_name),
                ctx.season_games_label(streak),
                rule.clone(),
            ];
            for (j, game) in streak_games(streak, views).into_iter().enumerate() {
                block.push(ctx.game_line(j, game));
            }
            block.push(rule.clone());
            block.push("\n".to_string());
            out.push_str(&block.join("\n"));
            out.push('\n');
        }
        out.push_str(&format!("\n{INDEX_NOTE}\n"));
        out
    }
}
