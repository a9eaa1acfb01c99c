use std::fs;
use std::path::PathBuf;

use streak_finder::error::StreakError;
use streak_finder::filter::{drop_ties, filter_step, resolve_seasons};
use streak_finder::games::{GameRecord, parse_games_json};
use streak_finder::query::SeasonSelection;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_games() -> Vec<GameRecord> {
    parse_games_json(&read_fixture("games.json")).expect("fixture should parse")
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn fixture_parses_every_row() {
    let games = fixture_games();
    assert_eq!(games.len(), 22);
    assert_eq!(games.iter().filter(|g| g.is_tie()).count(), 1);
    assert_eq!(games[0].home_team_name, "Unlimited Tacos");
}

#[test]
fn ties_are_dropped() {
    let games = drop_ties(&fixture_games());
    assert_eq!(games.len(), 21);
    assert!(games.iter().all(|g| g.home_score != g.away_score));
}

#[test]
fn all_seasons_come_from_the_data_in_order() {
    let games = fixture_games();
    let seasons = resolve_seasons(&SeasonSelection::All, &games).expect("all resolves");
    assert_eq!(seasons, vec![0, 1]);
}

#[test]
fn season_tokens_are_one_indexed() {
    let selection = SeasonSelection::from_tokens(["3", "1", "3"]);
    let seasons = resolve_seasons(&selection, &[]).expect("tokens resolve");
    assert_eq!(seasons, vec![2, 0]);
}

#[test]
fn all_token_wins_over_numbers() {
    assert_eq!(SeasonSelection::from_tokens(["2", "all"]), SeasonSelection::All);
    assert_eq!(
        SeasonSelection::from_tokens(Vec::<String>::new()),
        SeasonSelection::All
    );
}

#[test]
fn bad_season_tokens_are_rejected() {
    for bad in ["x", "1.5", "", "two"] {
        let selection = SeasonSelection::Seasons(vec![bad.to_string()]);
        let err = resolve_seasons(&selection, &[]).unwrap_err();
        assert!(
            matches!(err, StreakError::InvalidSeason(ref s) if s == bad),
            "token {bad:?} should be rejected"
        );
    }
}

#[test]
fn seasons_before_the_first_select_nothing() {
    let games = fixture_games();
    let selection = SeasonSelection::Seasons(vec!["0".into(), "-2".into(), "2".into()]);
    assert_eq!(resolve_seasons(&selection, &games).expect("integers resolve"), vec![1]);

    let selection = SeasonSelection::Seasons(vec!["0".into()]);
    assert!(resolve_seasons(&selection, &games).expect("zero resolves").is_empty());
}

#[test]
fn views_hold_head_to_head_games_in_order() {
    let games = drop_ties(&fixture_games());
    let views = filter_step(&games, &[0, 1], &names(&["Tacos", "Crabs"]), &names(&["Pies"]));
    assert_eq!(views.len(), 2);

    let tacos = views.get("Tacos").expect("tacos view");
    let keys: Vec<(u32, u32)> = tacos.games.iter().map(|g| (g.season, g.day)).collect();
    assert_eq!(
        keys,
        vec![
            (0, 0),
            (0, 1),
            (0, 2),
            (0, 3),
            (0, 4),
            (0, 5),
            (0, 10),
            (0, 11),
            (1, 0),
            (1, 1),
            (1, 2),
            (1, 3),
        ]
    );

    // Crabs never meet the Pies, but still get a view.
    let crabs = views.get("Crabs").expect("crabs view");
    assert!(crabs.games.is_empty());
}

#[test]
fn views_respect_season_selection() {
    let games = drop_ties(&fixture_games());
    let views = filter_step(&games, &[1], &names(&["Tacos"]), &names(&["Pies", "Crabs"]));
    let tacos = views.get("Tacos").expect("tacos view");
    assert!(tacos.games.iter().all(|g| g.season == 1));
    assert_eq!(tacos.games.len(), 5);
    assert!(tacos.game_on(1, 8).is_some());
    assert!(tacos.game_on(0, 0).is_none());
}
