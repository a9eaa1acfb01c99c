use crate::filter::TeamViews;
use crate::report::{INDEX_NOTE, ReportContext, Renderer, days_label, streak_games};
use crate::streaks::StreakRecord;

/// GitHub-flavored Markdown tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render_short(&self, ctx: &ReportContext<'_>, streaks: &[StreakRecord]) -> String {
        let mut table = String::new();
        table.push_str("| Team Name | Length | Season | Days |\n");
        table.push_str("| ----- | ----- | ----- | ----- |\n");
        for streak in streaks {
            table.push_str(&format!(
                "| {:<30} | {:<10} | {:<10} | {} |\n",
                md_cell(&ctx.team_label(&streak.team_name)),
                streak.length,
                streak.season + 1,
                days_label(&streak.days)
            ));
        }
        format!("\n\n{}\n\n{}\n\n{}\n", ctx.describe(), table, INDEX_NOTE)
    }

    fn render_long(
        &self,
        ctx: &ReportContext<'_>,
        streaks: &[StreakRecord],
        views: &TeamViews,
    ) -> String {
        let mut md = format!("\n\n{}\n\n", ctx.describe());
        for streak in streaks {
            let mut table = format!(
                "| {} by the {} |\n| ----- |\n| {} |\n",
                ctx.streak_title(streak),
                md_cell(&ctx.team_label(&streak.team_name)),
                ctx.season_games_label(streak)
            );
            for (j, game) in streak_games(streak, views).into_iter().enumerate() {
                table.push_str(&format!("| {} |\n", md_cell(&ctx.game_line(j, game))));
            }
            md.push_str(&table);
            md.push_str("\n\n");
        }
        md.push_str(&format!("\n{INDEX_NOTE}\n"));
        md
    }
}

fn md_cell(raw: &str) -> String {
    raw.replace('|', "\\|")
}
