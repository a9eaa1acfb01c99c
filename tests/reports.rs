use std::fs;
use std::path::PathBuf;

use streak_finder::games::{GameRecord, parse_games_json};
use streak_finder::query::{SeasonSelection, StreakKind, StreakQuery, StreakReport, run_query};
use streak_finder::reference::ReferenceData;
use streak_finder::report::{
    INDEX_NOTE, NO_STREAKS_MESSAGE, NameStyle, OutputFormat, ReportContext, TableStyle,
    render_report,
};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn fixture_games() -> Vec<GameRecord> {
    let raw = fs::read_to_string(fixture_path("games.json")).expect("fixture file should be readable");
    parse_games_json(&raw).expect("fixture should parse")
}

fn reference() -> ReferenceData {
    ReferenceData::load(&fixture_path("data")).expect("reference fixture should load")
}

fn tacos_vs_pies() -> (StreakQuery, StreakReport) {
    let query = StreakQuery::new(
        StreakKind::Winning,
        vec!["Tacos".to_string()],
        vec!["Pies".to_string()],
    );
    let report = run_query(&fixture_games(), &query).expect("streaks expected");
    (query, report)
}

fn ctx<'a>(query: &'a StreakQuery, reference: &'a ReferenceData, names: NameStyle) -> ReportContext<'a> {
    ReportContext {
        kind: query.kind,
        min: query.min,
        teams: &query.teams,
        versus_teams: &query.versus_teams,
        seasons: &query.seasons,
        names,
        reference,
    }
}

#[test]
fn description_names_teams_and_seasons() {
    let reference = reference();
    let (query, _) = tacos_vs_pies();
    assert_eq!(
        ctx(&query, &reference, NameStyle::Nickname).describe(),
        "Winning streaks of 3 or more games for Tacos versus Pies for all time"
    );

    let one = query.clone().with_seasons(SeasonSelection::from_tokens(["2"]));
    assert!(ctx(&one, &reference, NameStyle::Nickname).describe().ends_with("for season 2"));

    let many = query.with_seasons(SeasonSelection::from_tokens(["1", "2"]));
    assert!(ctx(&many, &reference, NameStyle::Nickname).describe().ends_with("for seasons 1, 2"));
}

#[test]
fn description_collapses_every_team_to_all_teams() {
    let reference = reference();
    let query = StreakQuery::new(StreakKind::Losing, reference.all_teams(), vec!["Pies".to_string()])
        .with_min(4);
    assert_eq!(
        ctx(&query, &reference, NameStyle::Nickname).describe(),
        "Losing streaks of 4 or more games for all teams versus Pies for all time"
    );
}

#[test]
fn short_text_table_is_one_indexed() {
    let reference = reference();
    let (query, report) = tacos_vs_pies();
    let out = render_report(
        OutputFormat::Text,
        TableStyle::Short,
        &ctx(&query, &reference, NameStyle::Nickname),
        &report,
    );
    let header = format!("{:<25} {:<9} {:<9} {}", "Team Name", "Length", "Season", "Days");
    let first = format!("{:<25} {:<9} {:<9} {}", "Tacos", "5", "1", "1, 2, 3, 4, 5");
    let second = format!("{:<25} {:<9} {:<9} {}", "Tacos", "3", "2", "1, 2, 3");
    assert!(out.contains(&header));
    assert!(out.contains(&"-".repeat(60)));
    let first_at = out.find(&first).expect("first row present");
    let second_at = out.find(&second).expect("second row present");
    assert!(first_at < second_at);
    assert!(out.trim_end().ends_with(INDEX_NOTE));
}

#[test]
fn long_text_lists_every_game_of_every_streak() {
    let reference = reference();
    let (query, report) = tacos_vs_pies();
    let out = render_report(
        OutputFormat::Text,
        TableStyle::Long,
        &ctx(&query, &reference, NameStyle::Nickname),
        &report,
    );
    assert!(out.contains("5 Game Winning Streak"));
    assert!(out.contains("Season 1 Games 1, 2, 3, 4, 5"));
    assert!(out.contains("G1: Season 1 Game 1: Pies 2  @  5 Tacos"));
    assert!(out.contains("G2: Season 1 Game 2: Tacos 3  @  1 Pies"));
    assert!(out.contains("G5: Season 1 Game 5: Pies 1  @  3 Tacos"));
    assert!(out.contains("3 Game Winning Streak"));
    assert!(out.contains("G3: Season 2 Game 3: Pies 4  @  5 Tacos"));
    assert_eq!(out.matches("G1: ").count(), 2);
}

#[test]
fn full_names_replace_nicknames() {
    let reference = reference();
    let (query, report) = tacos_vs_pies();
    let out = render_report(
        OutputFormat::Text,
        TableStyle::Long,
        &ctx(&query, &reference, NameStyle::FullName),
        &report,
    );
    assert!(out.contains("Unlimited Tacos"));
    assert!(out.contains("G1: Season 1 Game 1: Philly Pies 2  @  5 Unlimited Tacos"));
}

#[test]
fn markdown_short_table_has_header_and_rows() {
    let reference = reference();
    let (query, report) = tacos_vs_pies();
    let out = render_report(
        OutputFormat::Markdown,
        TableStyle::Short,
        &ctx(&query, &reference, NameStyle::Nickname),
        &report,
    );
    assert!(out.contains("| Team Name | Length | Season | Days |\n| ----- | ----- | ----- | ----- |\n"));
    assert!(out.contains(&format!("| {:<30} | {:<10} | {:<10} | {} |", "Tacos", 5, 1, "1, 2, 3, 4, 5")));
    assert!(out.contains(INDEX_NOTE));
}

#[test]
fn markdown_long_has_one_table_per_streak() {
    let reference = reference();
    let (query, report) = tacos_vs_pies();
    let out = render_report(
        OutputFormat::Markdown,
        TableStyle::Long,
        &ctx(&query, &reference, NameStyle::FullName),
        &report,
    );
    assert!(out.contains("| 5 Game Winning Streak by the Unlimited Tacos |\n| ----- |\n| Season 1 Games 1, 2, 3, 4, 5 |"));
    assert!(out.contains("| G1: Season 2 Game 1: Philly Pies 1  @  3 Unlimited Tacos |"));
    assert_eq!(out.matches("| ----- |\n").count(), 2);
}

#[test]
fn html_short_table_escapes_names() {
    let mut reference = reference();
    reference
        .short2long
        .insert("Tacos".to_string(), "Tacos <Unlimited> & Co".to_string());
    let (query, report) = tacos_vs_pies();
    let out = render_report(
        OutputFormat::Html,
        TableStyle::Short,
        &ctx(&query, &reference, NameStyle::FullName),
        &report,
    );
    assert!(out.starts_with("<p>Winning streaks of 3 or more games"));
    assert!(out.contains("<th>Team Name</th>"));
    assert!(out.contains("<td>Tacos &lt;Unlimited&gt; &amp; Co</td>"));
    assert!(out.contains("<td>1, 2, 3, 4, 5</td>"));
    assert!(out.contains(&format!("<p>{INDEX_NOTE}</p>")));
}

#[test]
fn html_long_wraps_each_streak_in_a_table() {
    let reference = reference();
    let (query, report) = tacos_vs_pies();
    let out = render_report(
        OutputFormat::Html,
        TableStyle::Long,
        &ctx(&query, &reference, NameStyle::Nickname),
        &report,
    );
    assert_eq!(out.matches("<table border=\"1\">").count(), 2);
    assert!(out.contains("<tr><td>\nG1: Season 1 Game 1: Pies 2  @  5 Tacos\n</td></tr>"));
}

#[test]
fn no_streaks_message_is_plain_text_in_every_format() {
    for format in [OutputFormat::Text, OutputFormat::Html, OutputFormat::Markdown] {
        assert_eq!(
            format.renderer().render_no_streaks(),
            format!("\n{NO_STREAKS_MESSAGE}\n")
        );
    }
}
