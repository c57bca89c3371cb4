use super::error::ChessError;
use super::moves::{Move, MoveRecord};
use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Piece, Position, Square};
use std::collections::BTreeSet;
use std::fmt;

/// Halfmove clock value at which the fifty-move rule ends the game
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Immutable chess position backed by `shakmaty`.
///
/// Applying a move never mutates a board; it returns the successor so that
/// every snapshot in a game stays valid. The board also remembers the
/// repetition keys of the positions that led to it, which is what threefold
/// repetition needs.
#[derive(Debug, Clone)]
pub struct Board {
    position: Chess,
    repetitions: Vec<String>,
}

impl Board {
    /// Standard starting position
    pub fn new() -> Self {
        Self::from_chess(Chess::default())
    }

    pub fn from_fen(fen: &str) -> Result<Board, ChessError> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|e| ChessError::InvalidFen(format!("{e}")))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| ChessError::InvalidFen(format!("{e}")))?;
        Ok(Self::from_chess(position))
    }

    fn from_chess(position: Chess) -> Self {
        let key = repetition_key(&position);
        Self {
            position,
            repetitions: vec![key],
        }
    }

    pub fn to_fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    /// Side to move
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.board().piece_at(square)
    }

    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmoves().get()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmoves()
    }

    /// All legal moves in coordinate form
    pub fn legal_moves(&self) -> Vec<Move> {
        self.position
            .legal_moves()
            .iter()
            .filter_map(coordinates)
            .collect()
    }

    /// Destination squares reachable from `origin` for the side to move
    pub fn legal_destinations(&self, origin: Square) -> BTreeSet<Square> {
        self.legal_moves()
            .into_iter()
            .filter(|mv| mv.origin == origin)
            .map(|mv| mv.destination)
            .collect()
    }

    /// Validate `mv` against this position and return the successor board
    /// together with the move record. Promotion defaults to a queen when the
    /// move reaches the last rank without one.
    pub fn apply(&self, mv: &Move) -> Result<(Board, MoveRecord), ChessError> {
        let promotion = mv.promotion_or_queen();
        let legal = self.position.legal_moves();
        let found = legal.iter().find(|candidate| match coordinates(candidate) {
            Some(c) => {
                c.origin == mv.origin
                    && c.destination == mv.destination
                    && c.promotion.map_or(true, |role| role == promotion)
            }
            None => false,
        });

        match found {
            Some(rules_move) => Ok(self.play(rules_move)),
            None => Err(ChessError::IllegalMove(mv.to_string())),
        }
    }

    /// Apply a move written in short algebraic notation
    pub fn apply_san(&self, san: &str) -> Result<(Board, MoveRecord), ChessError> {
        let parsed: SanPlus = san
            .trim()
            .parse()
            .map_err(|_| ChessError::InvalidNotation(san.to_string()))?;
        let rules_move = parsed
            .san
            .to_move(&self.position)
            .map_err(|_| ChessError::IllegalMove(san.to_string()))?;
        Ok(self.play(&rules_move))
    }

    /// Replay a SAN list from `start`
    pub fn replay(start: &Board, sans: &[String]) -> Result<Board, ChessError> {
        sans.iter().try_fold(start.clone(), |board, san| {
            board.apply_san(san).map(|(next, _)| next)
        })
    }

    fn play(&self, rules_move: &shakmaty::Move) -> (Board, MoveRecord) {
        let san = San::from_move(&self.position, rules_move);
        let mut next = self.position.clone();
        next.play_unchecked(rules_move);

        let is_checkmate = next.is_checkmate();
        let is_check = next.is_check();
        let suffix = if is_checkmate {
            "#"
        } else if is_check {
            "+"
        } else {
            ""
        };

        let mut repetitions = self.repetitions.clone();
        repetitions.push(repetition_key(&next));

        // Legal moves always have coordinates in standard chess.
        let mv = coordinates(rules_move).unwrap_or(Move {
            origin: rules_move.from().unwrap_or_else(|| rules_move.to()),
            destination: rules_move.to(),
            promotion: rules_move.promotion(),
        });

        let record = MoveRecord {
            mv,
            san: format!("{san}{suffix}"),
            is_capture: rules_move.is_capture(),
            is_check,
            is_checkmate,
        };

        (
            Board {
                position: next,
                repetitions,
            },
            record,
        )
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock() >= FIFTY_MOVE_HALFMOVES
    }

    pub fn is_threefold_repetition(&self) -> bool {
        match self.repetitions.last() {
            Some(current) => self.repetitions.iter().filter(|k| *k == current).count() >= 3,
            None => false,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_fifty_move_draw()
            || self.is_threefold_repetition()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw() || self.position.legal_moves().is_empty()
    }

    /// ASCII diagram, rank 8 on top for White and rank 1 on top for Black
    pub fn to_ascii(&self, perspective: Color, show_coordinates: bool) -> String {
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
            .map(|f| ((b'a' + *f as u8) as char).to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let mut result = String::new();
        if show_coordinates {
            result.push_str(&format!("  {file_labels}\n"));
        }

        for rank in &ranks {
            if show_coordinates {
                result.push_str(&format!("{} ", rank + 1));
            }
            let row: Vec<String> = files
                .iter()
                .map(|file| match self.piece_at(Square::new(rank * 8 + file)) {
                    Some(piece) => piece.char().to_string(),
                    None => ".".to_string(),
                })
                .collect();
            result.push_str(&row.join(" "));
            if show_coordinates {
                result.push_str(&format!(" {}", rank + 1));
            }
            result.push('\n');
        }

        if show_coordinates {
            result.push_str(&format!("  {file_labels}"));
        }

        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.to_fen() == other.to_fen()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

/// Capitalized color name used in result strings
pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

fn coordinates(rules_move: &shakmaty::Move) -> Option<Move> {
    match UciMove::from_move(rules_move, CastlingMode::Standard) {
        UciMove::Normal {
            from,
            to,
            promotion,
        } => Some(Move {
            origin: from,
            destination: to,
            promotion,
        }),
        _ => None,
    }
}

// Placement, side to move, castling rights and en passant square
fn repetition_key(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal)
        .to_string()
        .split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}
