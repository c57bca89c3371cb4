use crate::chess::{Board, Color, Square};
use std::collections::BTreeSet;

/// The origin square the player has picked and where it may go
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<Square>,
    legal_destinations: BTreeSet<Square>,
}

/// What a click on a square means given the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionIntent {
    /// Pick an own piece, replacing any earlier pick
    Select(Square),
    /// Click on the already selected square
    Deselect,
    /// Try to move the selected piece
    Attempt {
        origin: Square,
        destination: Square,
    },
    Ignore,
}

impl Selection {
    pub fn pick(square: Square, board: &Board) -> Self {
        Self {
            selected: Some(square),
            legal_destinations: board.legal_destinations(square),
        }
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn legal_destinations(&self) -> &BTreeSet<Square> {
        &self.legal_destinations
    }

    pub fn is_active(&self) -> bool {
        self.selected.is_some()
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.legal_destinations.clear();
    }

    /// Own pieces are only selectable when it is the player's turn on `board`
    pub fn interpret(&self, board: &Board, player: Color, square: Square) -> SelectionIntent {
        if self.selected == Some(square) {
            return SelectionIntent::Deselect;
        }

        let own_piece = board
            .piece_at(square)
            .map_or(false, |piece| piece.color == player);

        if own_piece && board.turn() == player {
            return SelectionIntent::Select(square);
        }

        match self.selected {
            Some(origin) => SelectionIntent::Attempt {
                origin,
                destination: square,
            },
            None => SelectionIntent::Ignore,
        }
    }
}
