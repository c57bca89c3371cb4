//! Typed commands run end to end against a controller

mod common;

use common::{harness, ScriptedEngine};
use gambit::cli::{execute_command, parse_input, CliError, Flow};
use gambit::game::{GameConfig, GameController, GameError};
use std::sync::Arc;

async fn run(controller: &mut GameController, line: &str) -> Result<Option<String>, CliError> {
    let command = parse_input(line)?;
    Ok(execute_command(controller, command).await?.message)
}

async fn started(replies: &[&str]) -> GameController {
    let mut h = harness(Arc::new(ScriptedEngine::playing(replies)));
    h.controller.new_game(GameConfig::default()).await.unwrap();
    h.controller
}

#[tokio::test]
async fn test_selecting_a_square_lists_targets() {
    let mut controller = started(&[]).await;
    let message = run(&mut controller, "e2").await.unwrap().unwrap();
    assert_eq!(message, "e2 can move to: e3 e4");

    let message = run(&mut controller, "e7").await.unwrap();
    assert_eq!(message, None);
    assert!(!controller.session().selection().is_active());
}

#[tokio::test]
async fn test_two_clicks_make_a_move() {
    let mut controller = started(&["e7e5"]).await;
    run(&mut controller, "g1").await.unwrap();
    run(&mut controller, "f3").await.unwrap();
    assert_eq!(controller.session().history(), ["Nf3", "e5"]);
}

#[tokio::test]
async fn test_moves_and_review_commands() {
    let mut controller = started(&["e7e5", "b8c6"]).await;
    run(&mut controller, "e2e4").await.unwrap();
    run(&mut controller, "g1-f3").await.unwrap();
    assert_eq!(controller.session().history(), ["e4", "e5", "Nf3", "Nc6"]);

    run(&mut controller, "back").await.unwrap();
    run(&mut controller, "back").await.unwrap();
    assert_eq!(controller.session().current_move_index(), 1);
    assert!(controller.session().is_reviewing());

    let moves = run(&mut controller, "moves").await.unwrap().unwrap();
    assert!(moves.contains("<e5>"));

    run(&mut controller, "forward").await.unwrap();
    assert_eq!(controller.session().current_move_index(), 2);
    run(&mut controller, "start").await.unwrap();
    assert_eq!(controller.session().current_move_index(), -1);
    run(&mut controller, "goto 1").await.unwrap();
    assert_eq!(controller.session().current_move_index(), 0);
    run(&mut controller, "end").await.unwrap();
    assert!(!controller.session().is_reviewing());
}

#[tokio::test]
async fn test_goto_extreme_ply_counts_clamp() {
    let mut controller = started(&["e7e5"]).await;
    run(&mut controller, "e2e4").await.unwrap();

    run(&mut controller, "goto -9223372036854775808").await.unwrap();
    assert_eq!(controller.session().current_move_index(), -1);

    run(&mut controller, "goto 9223372036854775807").await.unwrap();
    assert_eq!(controller.session().current_move_index(), 1);
}

#[tokio::test]
async fn test_export_commands() {
    let mut controller = started(&["e7e5"]).await;
    run(&mut controller, "e2e4").await.unwrap();

    let pgn = run(&mut controller, "pgn").await.unwrap().unwrap();
    assert!(pgn.contains("[White \"Human\"]"));
    assert!(pgn.ends_with("1. e4 e5 *\n"));

    let fen = run(&mut controller, "fen").await.unwrap().unwrap();
    assert_eq!(fen, controller.session().live_fen());
}

#[tokio::test]
async fn test_illegal_move_is_recoverable_error() {
    let mut controller = started(&[]).await;
    let err = run(&mut controller, "e2e5").await.unwrap_err();
    assert!(matches!(err, CliError::Game(GameError::IllegalMove { .. })));

    let err = run(&mut controller, "castle please").await.unwrap_err();
    assert!(matches!(err, CliError::Validation(_)));
}

#[tokio::test]
async fn test_settings_and_quit() {
    let mut controller = started(&[]).await;
    run(&mut controller, "volume 0.3").await.unwrap();
    run(&mut controller, "coords off").await.unwrap();
    run(&mut controller, "sound off").await.unwrap();

    let settings = controller.session().settings();
    assert_eq!(settings.sound_volume, 0.3);
    assert!(!settings.show_coordinates);
    assert!(!settings.sound_enabled);

    let output = execute_command(&mut controller, parse_input("quit").unwrap())
        .await
        .unwrap();
    assert_eq!(output.flow, Flow::Quit);
}

#[tokio::test]
async fn test_resign_then_new_game() {
    let mut controller = started(&[]).await;
    run(&mut controller, "resign").await.unwrap();
    assert_eq!(
        controller.session().game_result(),
        Some("Black wins by resignation")
    );

    run(&mut controller, "new").await.unwrap();
    assert!(!controller.session().game_over());
    assert!(controller.session().history().is_empty());
}
