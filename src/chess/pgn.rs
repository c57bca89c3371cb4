use super::board::Board;
use shakmaty::Color;

/// Standard starting position in FEN, used to decide whether a game needs
/// `SetUp`/`FEN` tags.
pub const STANDARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Tag values written in front of the movetext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnTags {
    pub event: String,
    pub site: String,
    pub white: String,
    pub black: String,
    /// `1-0`, `0-1`, `1/2-1/2` or `*`
    pub result: String,
}

impl Default for PgnTags {
    fn default() -> Self {
        Self {
            event: "Casual Game".to_string(),
            site: "?".to_string(),
            white: "?".to_string(),
            black: "?".to_string(),
            result: "*".to_string(),
        }
    }
}

/// A numbered pair of moves as shown in a move list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePair {
    pub number: u32,
    pub white: Option<String>,
    pub black: Option<String>,
}

/// Group a SAN history into numbered pairs, starting from `start`.
///
/// When the start position has Black to move the first pair has no White
/// move.
pub fn move_pairs(start: &Board, sans: &[String]) -> Vec<MovePair> {
    let mut pairs: Vec<MovePair> = Vec::new();
    let mut number = start.fullmove_number();
    let mut to_move = start.turn();

    for san in sans {
        match to_move {
            Color::White => pairs.push(MovePair {
                number,
                white: Some(san.clone()),
                black: None,
            }),
            Color::Black => match pairs.last_mut() {
                Some(pair) if pair.number == number && pair.black.is_none() => {
                    pair.black = Some(san.clone());
                }
                _ => pairs.push(MovePair {
                    number,
                    white: None,
                    black: Some(san.clone()),
                }),
            },
        }

        if to_move == Color::Black {
            number += 1;
        }
        to_move = to_move.other();
    }

    pairs
}

/// Render a full game as PGN text
pub fn write_pgn(start: &Board, sans: &[String], tags: &PgnTags) -> String {
    let mut out = String::new();
    out.push_str(&format!("[Event \"{}\"]\n", tags.event));
    out.push_str(&format!("[Site \"{}\"]\n", tags.site));
    out.push_str("[Date \"????.??.??\"]\n");
    out.push_str("[Round \"-\"]\n");
    out.push_str(&format!("[White \"{}\"]\n", tags.white));
    out.push_str(&format!("[Black \"{}\"]\n", tags.black));
    out.push_str(&format!("[Result \"{}\"]\n", tags.result));

    let fen = start.to_fen();
    if fen != STANDARD_FEN {
        out.push_str("[SetUp \"1\"]\n");
        out.push_str(&format!("[FEN \"{fen}\"]\n"));
    }
    out.push('\n');

    let mut tokens: Vec<String> = Vec::new();
    for pair in move_pairs(start, sans) {
        match (pair.white, pair.black) {
            (Some(white), black) => {
                tokens.push(format!("{}. {}", pair.number, white));
                if let Some(black) = black {
                    tokens.push(black);
                }
            }
            (None, Some(black)) => tokens.push(format!("{}... {}", pair.number, black)),
            (None, None) => {}
        }
    }
    tokens.push(tags.result.clone());
    out.push_str(&tokens.join(" "));
    out.push('\n');

    out
}
