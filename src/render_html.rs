use crate::filter::TeamViews;
use crate::report::{INDEX_NOTE, ReportContext, Renderer, days_label, streak_games};
use crate::streaks::StreakRecord;

/// HTML fragments meant to be pasted into a page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render_short(&self, ctx: &ReportContext<'_>, streaks: &[StreakRecord]) -> String {
        let mut out = Vec::new();
        out.push(format!("<p>{}</p>\n", escape_html(&ctx.describe())));
        out.push("<br />".to_string());
        out.push("<table border=\"1\" class=\"dataframe\">".to_string());
        out.push("  <thead>".to_string());
        out.push("    <tr style=\"text-align: center;\">".to_string());
        for head in ["Team Name", "Length", "Season", "Days"] {
            out.push(format!("      <th>{head}</th>"));
        }
        out.push("    </tr>".to_string());
        out.push("  </thead>".to_string());
        out.push("  <tbody>".to_string());
        for streak in streaks {
            out.push("    <tr>".to_string());
            out.push(format!(
                "      <td>{}</td>",
                escape_html(&ctx.team_label(&streak.team_name))
            ));
            out.push(format!("      <td>{}</td>", streak.length));
            out.push(format!("      <td>{}</td>", streak.season + 1));
            out.push(format!("      <td>{}</td>", days_label(&streak.days)));
            out.push("    </tr>".to_string());
        }
        out.push("  </tbody>".to_string());
        out.push("</table>".to_string());
        out.push("<br />".to_string());
        out.push(format!("<p>{INDEX_NOTE}</p>"));
        let mut html = out.join("\n");
        html.push('\n');
        html
    }

    fn render_long(
        &self,
        ctx: &ReportContext<'_>,
        streaks: &[StreakRecord],
        views: &TeamViews,
    ) -> String {
        let mut html = format!("<p>{}</p>\n<br />\n", escape_html(&ctx.describe()));
        for streak in streaks {
            let mut table = vec![
                "<br />".to_string(),
                "<table border=\"1\">".to_string(),
                "<tr><td>".to_string(),
                ctx.streak_title(streak),
                "<br />".to_string(),
                escape_html(&ctx.team_label(&streak.team_name)),
                "<br />".to_string(),
                ctx.season_games_label(streak),
                "</td></tr>".to_string(),
            ];
            for (j, game) in streak_games(streak, views).into_iter().enumerate() {
                table.push("<tr><td>".to_string());
                table.push(escape_html(&ctx.game_line(j, game)));
                table.push("</td></tr>".to_string());
            }
            table.push("</table>".to_string());
            table.push("<br />".to_string());
            html.push_str(&table.join("\n"));
            html.push('\n');
        }
        html.push_str(&format!("<p>{INDEX_NOTE}</p>\n"));
        html
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
