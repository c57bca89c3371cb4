//! Properties of the pure session reducer

mod common;

use common::{mv, play_both_sides, step};
use gambit::adapters::{EngineError, FeedbackEvent};
use gambit::chess::{Board, Color, GameOutcome, Move, Square};
use gambit::game::{Effect, GameConfig, GameError, GameEvent, GameSession};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn new_game() -> GameSession {
    GameSession::new()
        .apply(GameEvent::NewGame(GameConfig::default()))
        .session
}

/// Play up to `plies` random legal moves for both sides
fn random_game(seed: u64, plies: usize) -> GameSession {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = new_game();
    for _ in 0..plies {
        if session.game_over() {
            break;
        }
        let moves = session.live_board().legal_moves();
        let choice = *moves.choose(&mut rng).expect("game not over");
        session = step(session, choice).session;
    }
    session
}

#[test]
fn test_select_e2_then_play_e4() {
    let session = new_game();
    let selected = session.apply(GameEvent::SelectSquare(Square::E2)).session;
    assert!(selected.selection().legal_destinations().contains(&Square::E4));

    let transition = selected.apply(GameEvent::ApplyMove(mv("e2e4")));
    let session = transition.session;
    assert_eq!(session.history(), ["e4"]);
    assert_eq!(session.current_move_index(), 0);
    assert!(!session.game_over());
    assert_eq!(transition.effects[0], Effect::Feedback(FeedbackEvent::Move));
}

#[test]
fn test_fools_mate_ends_game() {
    let moves: Vec<Move> = ["f2f3", "e7e5", "g2g4", "d8h4"].iter().map(|m| mv(m)).collect();
    let session = play_both_sides(new_game(), &moves[..3]);
    let transition = step(session, moves[3]);
    let session = transition.session;

    assert_eq!(session.history(), ["f3", "e5", "g4", "Qh4#"]);
    assert!(session.game_over());
    assert!(session.game_result().unwrap().contains("checkmate"));
    assert_eq!(session.game_result(), Some("Black wins by checkmate"));
    assert_eq!(session.outcome(), Some(GameOutcome::Black));
    assert!(!session.engine_thinking());

    let feedback = transition
        .effects
        .iter()
        .filter_map(|e| match e {
            Effect::Feedback(event) => Some(*event),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(feedback, vec![FeedbackEvent::Checkmate, FeedbackEvent::GameEnd]);
    assert!(transition.effects.iter().any(|e| matches!(
        e,
        Effect::RecordPosition {
            outcome: Some(GameOutcome::Black),
            ..
        }
    )));
    let pgn = transition
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::RecordGame { pgn, .. } => Some(pgn.clone()),
            _ => None,
        })
        .expect("game recorded");
    assert!(pgn.ends_with("1. f3 e5 2. g4 Qh4# 0-1\n"));
}

#[test]
fn test_replaying_history_reproduces_live_position() {
    for seed in 0..20 {
        let session = random_game(seed, 80);
        let last = session.history().len() as isize - 1;
        let reviewed = session
            .clone()
            .apply(GameEvent::GoToMove(last))
            .session;
        assert_eq!(reviewed.fen(), session.live_fen(), "seed {seed}");
        assert_eq!(
            Board::replay(session.start_board(), session.history())
                .unwrap()
                .to_fen(),
            session.live_fen()
        );
    }
}

#[test]
fn test_go_to_start_reproduces_initial_position() {
    for seed in [3, 7, 11] {
        let session = random_game(seed, 30);
        let start = session.apply(GameEvent::GoToMove(-1)).session;
        assert_eq!(start.fen(), Board::new().to_fen());
        assert_eq!(start.current_move_index(), -1);
    }

    // Far out of range indices are clamped
    let session = random_game(5, 10);
    let len = session.history().len() as isize;
    let clamped = session.clone().apply(GameEvent::GoToMove(-40)).session;
    assert_eq!(clamped.current_move_index(), -1);
    let clamped = clamped.apply(GameEvent::GoToMove(len + 40)).session;
    assert_eq!(clamped.current_move_index(), len - 1);
    assert_eq!(clamped.fen(), session.live_fen());
}

#[test]
fn test_navigation_uses_custom_start() {
    let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
    let session = GameSession::new()
        .apply(GameEvent::NewGame(GameConfig {
            start_fen: Some(fen.to_string()),
            ..GameConfig::default()
        }))
        .session;
    let session = play_both_sides(session, &[mv("e2e4"), mv("e8d7")]);
    let start = session.apply(GameEvent::GoToMove(-1)).session;
    assert_eq!(start.fen(), fen);
}

#[test]
fn test_navigation_never_touches_live_state() {
    let session = random_game(42, 20);
    let history = session.history().to_vec();
    let live = session.live_fen();

    let reviewed = session.apply(GameEvent::GoToMove(3)).session;
    assert_eq!(reviewed.history(), history.as_slice());
    assert_eq!(reviewed.live_fen(), live);
    assert!(reviewed.is_reviewing());
    assert_ne!(reviewed.fen(), live);
}

#[test]
fn test_rejected_moves_leave_session_unchanged() {
    let squares: Vec<Square> = (0..64).map(Square::new).collect();
    for seed in 0..5 {
        let session = random_game(seed, 12);
        if session.game_over() || session.engine_thinking() {
            continue;
        }
        let legal = session.live_board().legal_moves();

        for origin in squares.iter().step_by(3) {
            for destination in squares.iter().step_by(5) {
                let Ok(candidate) = Move::simple(*origin, *destination) else {
                    continue;
                };
                if legal
                    .iter()
                    .any(|m| m.origin == candidate.origin && m.destination == candidate.destination)
                {
                    continue;
                }

                let transition = session.clone().apply(GameEvent::ApplyMove(candidate));
                assert_eq!(
                    transition.error,
                    Some(GameError::IllegalMove {
                        origin: *origin,
                        destination: *destination
                    })
                );
                assert_eq!(transition.session.live_fen(), session.live_fen());
                assert_eq!(transition.session.history(), session.history());
                assert_eq!(
                    transition.session.current_move_index(),
                    session.current_move_index()
                );
                assert_eq!(transition.effects, vec![Effect::Feedback(FeedbackEvent::Illegal)]);
            }
        }
    }
}

#[test]
fn test_terminal_state_is_idempotent() {
    let moves: Vec<Move> = ["f2f3", "e7e5", "g2g4", "d8h4"].iter().map(|m| mv(m)).collect();
    let session = play_both_sides(new_game(), &moves);
    assert!(session.game_over());

    for attempt in ["e2e4", "a2a3", "f3f4", "g1h3"] {
        let transition = session.clone().apply(GameEvent::ApplyMove(mv(attempt)));
        assert_eq!(transition.error, Some(GameError::GameOver));
        assert!(transition.effects.is_empty());
        assert_eq!(transition.session, session);
    }

    let resigned = session.clone().apply(GameEvent::Resign);
    assert_eq!(resigned.session, session);
    let drawn = session.clone().apply(GameEvent::OfferDraw);
    assert_eq!(drawn.session, session);
}

#[test]
fn test_engine_thinking_spans_request_to_resolution() {
    let transition = new_game().apply(GameEvent::ApplyMove(mv("d2d4")));
    let (request, query) = transition.engine_request().expect("engine turn starts");
    assert_eq!(query.history, vec!["d4".to_string()]);
    let mut session = transition.session;
    assert!(session.engine_thinking());

    // Nothing the player does in the meantime resolves the turn
    for event in [
        GameEvent::SelectSquare(Square::E2),
        GameEvent::ApplyMove(mv("e2e4")),
        GameEvent::GoToMove(-1),
        GameEvent::FlipBoard,
        GameEvent::FlipBoard,
        GameEvent::RetryEngine,
        GameEvent::Tick { now_ms: 5 },
    ] {
        session = session.apply(event).session;
        assert!(session.engine_thinking());
    }

    let resolved = session.clone().apply(GameEvent::EngineMoveReceived {
        request,
        reply: gambit::adapters::EngineReply::new(mv("d7d5")),
    });
    assert!(!resolved.session.engine_thinking());
    // The display snaps back to the live position
    assert!(!resolved.session.is_reviewing());
    assert_eq!(resolved.session.fen(), resolved.session.live_fen());

    let failed = session.apply(GameEvent::EngineMoveFailed {
        request,
        error: EngineError::NoLegalMoves,
    });
    assert!(!failed.session.engine_thinking());
    assert_eq!(
        failed.error,
        Some(GameError::EngineFailure(EngineError::NoLegalMoves))
    );
}

#[test]
fn test_resign_credits_opponent() {
    let session = play_both_sides(new_game(), &[mv("e2e4"), mv("e7e5")]);
    let transition = session.apply(GameEvent::Resign);
    let session = &transition.session;
    assert!(session.game_over());
    assert_eq!(session.game_result(), Some("Black wins by resignation"));
    assert_eq!(session.outcome(), Some(GameOutcome::Black));
    assert!(transition
        .effects
        .contains(&Effect::Feedback(FeedbackEvent::GameEnd)));

    let as_black = GameSession::new()
        .apply(GameEvent::NewGame(GameConfig {
            player_color: Color::Black,
            ..GameConfig::default()
        }))
        .session
        .apply(GameEvent::Resign)
        .session;
    assert_eq!(as_black.game_result(), Some("White wins by resignation"));
}

#[test]
fn test_draw_by_repetition_reported_as_draw() {
    let shuffle: Vec<Move> = ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"]
        .iter()
        .map(|m| mv(m))
        .collect();
    let session = play_both_sides(new_game(), &shuffle);
    assert!(session.game_over());
    assert_eq!(session.game_result(), Some("Draw"));
    assert_eq!(session.outcome(), Some(GameOutcome::Draw));
}

#[test]
fn test_en_passant_plays_capture_feedback() {
    let moves: Vec<Move> = ["e2e4", "a7a6", "e4e5", "d7d5"].iter().map(|m| mv(m)).collect();
    let session = play_both_sides(new_game(), &moves);
    let transition = step(session, mv("e5d6"));
    assert_eq!(transition.effects[0], Effect::Feedback(FeedbackEvent::Capture));
    assert_eq!(transition.session.history().last().map(String::as_str), Some("exd6"));
}
