use std::fmt;

use crate::board::{Board, mask_to_positions};
use crate::types::Color;

/// An immutable position. The side to move is always passed in explicitly,
/// so the same value can be queried from either player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    board: Board,
}

impl GameState {
    /// The standard four-stone start.
    pub fn initial() -> Self {
        Self::from_board(Board::new())
    }

    pub fn from_board(board: Board) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn empty_count(&self) -> u8 {
        self.board.empty_count()
    }

    /// Legal squares for `color`, in ascending (row-major) order.
    pub fn get_moves(&self, color: Color) -> Vec<u8> {
        mask_to_positions(self.board.legal_moves(color))
    }

    pub fn has_moves(&self, color: Color) -> bool {
        self.board.legal_moves(color) != 0
    }

    pub fn is_legal(&self, color: Color, position: u8) -> bool {
        self.board.flips(position as usize, color) != 0
    }

    /// Returns the position after `color` plays at `position`.
    ///
    /// Caller contract: `position` comes from `get_moves(color)` on this state.
    pub fn play(&self, color: Color, position: u8) -> Self {
        let mut board = self.board;
        let flips = board.place(position as usize, color);
        debug_assert!(flips != 0, "play() called with illegal move {position}");
        Self { board }
    }

    /// True when neither side has a legal move.
    pub fn terminal(&self) -> bool {
        !self.has_moves(Color::Black) && !self.has_moves(Color::White)
    }

    /// Black stones minus White stones.
    pub fn value(&self) -> i32 {
        let (black, white) = self.board.count();
        black as i32 - white as i32
    }

    /// CRC-32 of the cell array. Depends on board contents only.
    pub fn hash(&self) -> u32 {
        crc32fast::hash(&self.board.to_array())
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.board, f)
    }
}
