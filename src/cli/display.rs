use crate::chess::{color_name, Board, Color, Piece, Square};
use crate::game::{format_clock, GameSession};
use crate::storage::ArchivedGame;

/// Render the displayed position from the player's side of the board.
///
/// Uses Unicode pieces when `unicode` is set; the last move's squares are
/// bracketed.
pub fn render_board(session: &GameSession, unicode: bool) -> String {
    let board = session.displayed_board();
    let perspective = session.player_color();
    let show_coordinates = session.settings().show_coordinates;
    let highlight: Vec<Square> = if session.is_reviewing() {
        Vec::new()
    } else {
        session
            .last_move()
            .map(|m| vec![m.origin, m.destination])
            .unwrap_or_default()
    };

    if !unicode && highlight.is_empty() {
        return board.to_ascii(perspective, show_coordinates);
    }

    let ranks: Vec<u32> = match perspective {
        Color::White => (0..8).rev().collect(),
        Color::Black => (0..8).collect(),
    };
    let files: Vec<u32> = match perspective {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };
    let file_labels: String = files
        .iter()
        .map(|f| format!(" {} ", (b'a' + *f as u8) as char))
        .collect();

    let mut out = String::new();
    if show_coordinates {
        out.push_str(&format!("  {}\n", file_labels));
    }
    for rank in &ranks {
        if show_coordinates {
            out.push_str(&format!("{} ", rank + 1));
        }
        for file in &files {
            let square = Square::new(rank * 8 + file);
            let symbol = piece_symbol(board, square, unicode);
            if highlight.contains(&square) {
                out.push_str(&format!("[{}]", symbol));
            } else {
                out.push_str(&format!(" {} ", symbol));
            }
        }
        if show_coordinates {
            out.push_str(&format!(" {}", rank + 1));
        }
        out.push('\n');
    }
    if show_coordinates {
        out.push_str(&format!("  {}", file_labels));
    }
    out
}

fn piece_symbol(board: &Board, square: Square, unicode: bool) -> char {
    match board.piece_at(square) {
        Some(piece) if unicode => unicode_piece(piece),
        Some(piece) => piece.char(),
        None => '.',
    }
}

fn unicode_piece(piece: Piece) -> char {
    use crate::chess::Role;
    match (piece.color, piece.role) {
        (Color::White, Role::King) => '♔',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Pawn) => '♙',
        (Color::Black, Role::King) => '♚',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Pawn) => '♟',
    }
}

/// One-line summary of whose turn it is, clocks and the result
pub fn render_status(session: &GameSession) -> String {
    let live = session.live_board();
    let mut parts = Vec::new();

    if let Some(result) = session.game_result() {
        parts.push(format!("Game over: {}", result));
    } else if session.engine_thinking() {
        parts.push("Engine is thinking...".to_string());
    } else {
        let turn = live.turn();
        let whose = if turn == session.player_color() {
            "your move"
        } else {
            "engine to move"
        };
        parts.push(format!("{} to move ({})", color_name(turn), whose));
        if live.is_check() {
            parts.push("Check!".to_string());
        }
    }

    if let Some(clock) = session.clock() {
        parts.push(format!(
            "White {} | Black {}",
            format_clock(clock.white_ms),
            format_clock(clock.black_ms)
        ));
    }

    if session.is_reviewing() {
        parts.push(format!(
            "Reviewing ply {} of {}",
            session.current_move_index() + 1,
            session.history().len()
        ));
    }

    if let Some(error) = session.last_engine_error() {
        parts.push(format!("Engine error: {} (type 'retry')", error));
    }

    parts.join("  ·  ")
}

/// Numbered move list; the move currently shown is wrapped in `<>`
pub fn render_move_list(session: &GameSession) -> String {
    let pairs = session.move_pairs();
    if pairs.is_empty() {
        return "No moves yet.".to_string();
    }

    // Ply index of the first white move in the first pair
    let mut ply: isize = if session.start_board().turn() == Color::Black {
        -1
    } else {
        0
    };
    let current = session.current_move_index();
    let mark = |san: &str, index: isize| {
        if index == current {
            format!("<{}>", san)
        } else {
            san.to_string()
        }
    };

    let mut lines = Vec::new();
    for pair in pairs {
        let white = pair.white.as_deref().map_or("...".to_string(), |s| mark(s, ply));
        let black = pair
            .black
            .as_deref()
            .map(|s| mark(s, ply + 1))
            .unwrap_or_default();
        lines.push(format!("{:>3}. {:<10} {}", pair.number, white, black));
        ply += 2;
    }
    lines.join("\n")
}

pub fn display_session(session: &GameSession, unicode: bool) {
    println!();
    println!("{}", render_board(session, unicode));
    println!("{}", render_status(session));
}

/// Display archived games as a table
pub fn display_games_list(games: &[ArchivedGame]) {
    println!("{}", "=".repeat(72));
    println!("{:^72}", "ARCHIVED GAMES");
    println!("{}", "=".repeat(72));
    println!(
        "{:<10} {:<8} {:<6} {:<12} {}",
        "GAME ID", "OUTCOME", "MOVES", "RECORDED", "RESULT"
    );
    println!("{}", "-".repeat(72));

    for game in games {
        let id_short: String = game.id.chars().take(8).collect();
        let result = game
            .metadata
            .as_ref()
            .and_then(|m| m.get("result"))
            .and_then(|r| r.as_str())
            .unwrap_or("-");
        println!(
            "{:<10} {:<8} {:<6} {:<12} {}",
            id_short,
            game.outcome.pgn_token(),
            game.move_count,
            format_timestamp(game.recorded_at),
            result
        );
    }

    println!("{}", "-".repeat(72));
    println!("Total games: {}", games.len());
}

/// Format a Unix timestamp relative to now
pub fn format_timestamp(timestamp: i64) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    match UNIX_EPOCH.checked_add(std::time::Duration::from_secs(timestamp.max(0) as u64)) {
        Some(time) => {
            let elapsed = SystemTime::now().duration_since(time).unwrap_or_default();

            if elapsed.as_secs() < 60 {
                "Just now".to_string()
            } else if elapsed.as_secs() < 3600 {
                format!("{}m ago", elapsed.as_secs() / 60)
            } else if elapsed.as_secs() < 86400 {
                format!("{}h ago", elapsed.as_secs() / 3600)
            } else {
                format!("{}d ago", elapsed.as_secs() / 86400)
            }
        }
        None => "Unknown".to_string(),
    }
}

/// Check if terminal supports Unicode chess pieces
pub fn supports_unicode() -> bool {
    std::env::var("TERM")
        .map(|term| {
            term.contains("xterm")
                || term.contains("screen")
                || term.contains("tmux")
                || term == "alacritty"
                || term == "kitty"
        })
        .unwrap_or(false)
        || std::env::var("TERM_PROGRAM").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::Move;
    use crate::game::{GameConfig, GameEvent};

    fn played(moves: &[&str]) -> GameSession {
        let mut session = GameSession::new()
            .apply(GameEvent::NewGame(GameConfig::default()))
            .session;
        for (i, uci) in moves.iter().enumerate() {
            let mv: Move = uci.parse().unwrap();
            session = if i % 2 == 0 {
                session.apply(GameEvent::ApplyMove(mv)).session
            } else {
                let request = session.pending_request().unwrap();
                session
                    .apply(GameEvent::EngineMoveReceived {
                        request,
                        reply: crate::adapters::EngineReply::new(mv),
                    })
                    .session
            };
        }
        session
    }

    #[test]
    fn test_plain_board_without_highlight() {
        let session = GameSession::new();
        let text = render_board(&session, false);
        assert!(text.starts_with("  a b c d e f g h\n8 r n b q k b n r 8"));
    }

    #[test]
    fn test_last_move_is_highlighted() {
        let session = played(&["e2e4"]);
        let text = render_board(&session, false);
        assert!(text.contains("[P]"));
        assert!(text.contains("[.]"));
    }

    #[test]
    fn test_move_list_marks_current_move() {
        let session = played(&["e2e4", "e7e5", "g1f3"]);
        assert_eq!(
            render_move_list(&session),
            "  1. e4         e5\n  2. <Nf3>      "
        );

        let session = session.apply(GameEvent::GoToMove(0)).session;
        assert!(render_move_list(&session).starts_with("  1. <e4>"));
    }

    #[test]
    fn test_status_mentions_engine() {
        let session = played(&["e2e4"]);
        assert_eq!(render_status(&session), "Engine is thinking...");
    }
}
