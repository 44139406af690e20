use crate::board::{Board, bit};
use crate::state::GameState;
use crate::types::Color;

/// Plays the lowest legal square for each side from the start until at most
/// `empties` squares remain, passing when forced. Returns the side to move.
pub(crate) fn late_game(empties: u8) -> (GameState, Color) {
    let mut state = GameState::initial();
    let mut color = Color::Black;
    loop {
        if state.terminal() || state.empty_count() <= empties {
            return (state, color);
        }
        if let Some(&p) = state.get_moves(color).first() {
            state = state.play(color, p);
        }
        color = -color;
    }
}

/// 40 black, 24 white, no empty squares.
pub(crate) fn full_board() -> GameState {
    GameState::from_board(Board::from_bitboards(u64::MAX >> 24, u64::MAX))
}

/// Black has no move; White's only move at a1 takes the whole board.
pub(crate) fn blocked_black() -> GameState {
    let black = bit(1);
    let white = u64::MAX ^ bit(0) ^ black;
    GameState::from_board(Board::from_bitboards(black, white))
}
