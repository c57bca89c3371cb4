use super::error::ChessError;
use serde::{Deserialize, Serialize};
use shakmaty::Color;
use std::fmt;
use std::str::FromStr;

/// Final result of a game: the winning color, or a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    White,
    Black,
    Draw,
}

impl GameOutcome {
    pub fn winner(color: Color) -> Self {
        match color {
            Color::White => GameOutcome::White,
            Color::Black => GameOutcome::Black,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameOutcome::White => "white",
            GameOutcome::Black => "black",
            GameOutcome::Draw => "draw",
        }
    }

    /// Result token used in PGN movetext and the `Result` tag
    pub fn pgn_token(&self) -> &'static str {
        match self {
            GameOutcome::White => "1-0",
            GameOutcome::Black => "0-1",
            GameOutcome::Draw => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GameOutcome {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "white" => Ok(GameOutcome::White),
            "black" => Ok(GameOutcome::Black),
            "draw" => Ok(GameOutcome::Draw),
            other => Err(ChessError::InvalidNotation(format!(
                "'{other}' is not a game outcome (white, black or draw)"
            ))),
        }
    }
}
