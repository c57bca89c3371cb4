use super::session::GameSession;
use crate::chess::{color_name, move_pairs, write_pgn, Board, Color, MovePair, PgnTags};
use serde_json::json;
use tracing::error;

const HUMAN_NAME: &str = "Human";
const ENGINE_NAME: &str = "Engine";

impl GameSession {
    /// Show the position after move `index` (`-1` for the start).
    ///
    /// The index is clamped to the history; only the displayed board and
    /// `current_move_index` change.
    pub(crate) fn navigate(&mut self, index: isize) {
        let last = self.history.len() as isize - 1;
        let target = index.clamp(-1, last);
        let plies = (target + 1) as usize;

        match Board::replay(&self.start, &self.history[..plies]) {
            Ok(board) => {
                self.displayed = board;
                self.current_move_index = target;
            }
            // History only ever holds moves the rules library produced
            Err(e) => error!("Failed to replay history to move {}: {}", target, e),
        }
    }

    /// FEN of the displayed position
    pub fn fen(&self) -> String {
        self.displayed.to_fen()
    }

    /// FEN of the live position
    pub fn live_fen(&self) -> String {
        self.live.to_fen()
    }

    pub fn move_pairs(&self) -> Vec<MovePair> {
        move_pairs(&self.start, &self.history)
    }

    /// Whole game as PGN; the result is `*` while the game is running
    pub fn pgn(&self) -> String {
        let (white, black) = match self.player_color {
            Color::White => (HUMAN_NAME, ENGINE_NAME),
            Color::Black => (ENGINE_NAME, HUMAN_NAME),
        };
        let tags = PgnTags {
            white: white.to_string(),
            black: black.to_string(),
            result: self
                .outcome
                .map_or("*", |outcome| outcome.pgn_token())
                .to_string(),
            ..PgnTags::default()
        };
        write_pgn(&self.start, &self.history, &tags)
    }

    /// Extra context reported with a finished game
    pub fn game_metadata(&self) -> serde_json::Value {
        json!({
            "result": self.game_result,
            "player_color": color_name(self.player_color).to_lowercase(),
            "target_elo": self.target_elo,
            "move_count": self.history.len(),
            "start_fen": self.start.to_fen(),
            "time_control": self.time_control.map(|tc| tc.to_string()),
        })
    }
}
