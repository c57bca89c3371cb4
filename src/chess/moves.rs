use super::error::ChessError;
use serde::{Deserialize, Serialize};
use shakmaty::{Role, Square};
use std::fmt;
use std::str::FromStr;

/// A move request expressed as origin and destination squares.
///
/// Castling is written as the king's two-square step (`e1g1`). The move is
/// only meaningful against the board it was built for; legality is decided
/// by [`Board::apply`](super::Board::apply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Move {
    pub origin: Square,
    pub destination: Square,
    pub promotion: Option<Role>,
}

impl Move {
    /// Create a new move with validation
    pub fn new(
        origin: Square,
        destination: Square,
        promotion: Option<Role>,
    ) -> Result<Self, ChessError> {
        if origin == destination {
            return Err(ChessError::InvalidMove(
                "Source and destination squares cannot be the same".to_string(),
            ));
        }

        if let Some(role) = promotion {
            if matches!(role, Role::King | Role::Pawn) {
                return Err(ChessError::InvalidMove(
                    "Cannot promote to King or Pawn".to_string(),
                ));
            }
        }

        Ok(Self {
            origin,
            destination,
            promotion,
        })
    }

    /// Create a simple move without promotion
    pub fn simple(origin: Square, destination: Square) -> Result<Self, ChessError> {
        Self::new(origin, destination, None)
    }

    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Promotion piece used when the caller leaves it unspecified
    pub fn promotion_or_queen(&self) -> Role {
        self.promotion.unwrap_or(Role::Queen)
    }
}

pub fn parse_square(s: &str) -> Result<Square, ChessError> {
    let lowered = s.trim().to_ascii_lowercase();
    lowered
        .parse::<Square>()
        .map_err(|_| ChessError::InvalidSquare(format!("'{s}' is not a square between a1 and h8")))
}

pub fn parse_promotion(c: char) -> Result<Role, ChessError> {
    match Role::from_char(c.to_ascii_lowercase()) {
        Some(role @ (Role::Queen | Role::Rook | Role::Bishop | Role::Knight)) => Ok(role),
        _ => Err(ChessError::InvalidPieceType(format!(
            "'{c}' is not a promotion piece (use q, r, b or n)"
        ))),
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}

// UCI-style coordinates: e2e4, e7e8q
impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() || !(s.len() == 4 || s.len() == 5) {
            return Err(ChessError::InvalidMove(format!(
                "Invalid move format '{s}'. Expected 'e2e4' or 'e7e8q' for promotion."
            )));
        }

        let origin = parse_square(&s[0..2])?;
        let destination = parse_square(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            Some(c) => Some(parse_promotion(c)?),
            None => None,
        };

        Self::new(origin, destination, promotion)
    }
}

impl TryFrom<String> for Move {
    type Error = ChessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Move> for String {
    fn from(mv: Move) -> Self {
        mv.to_string()
    }
}

/// What the rules library reports about a move it accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: Move,
    /// Short algebraic notation including the `+` / `#` suffix
    pub san: String,
    pub is_capture: bool,
    pub is_check: bool,
    pub is_checkmate: bool,
}
