use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid piece type: {0}")]
    InvalidPieceType(String),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid notation: {0}")]
    InvalidNotation(String),
}
