// Re-export all public items
pub use self::board::{color_name, Board, FIFTY_MOVE_HALFMOVES};
pub use self::error::ChessError;
pub use self::outcome::GameOutcome;
pub use self::moves::{parse_promotion, parse_square, Move, MoveRecord};
pub use self::pgn::{move_pairs, write_pgn, MovePair, PgnTags, STANDARD_FEN};

// Rules-library types that appear in the public API
pub use shakmaty::{Color, Piece, Role, Square};

// Define submodules
mod board;
mod error;
mod moves;
mod outcome;
mod pgn;
