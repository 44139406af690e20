use std::fmt;

use once_cell::sync::Lazy;

use crate::types::Color;

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// For every square, the squares walked outward in each direction, nearest first.
static RAYS: Lazy<Vec<[Vec<u8>; 8]>> = Lazy::new(|| {
    (0..NUM_SQUARES)
        .map(|pos| {
            let (row, col) = pos_to_row_col(pos);
            std::array::from_fn(|d| {
                let (dr, dc) = DIRECTIONS[d];
                let mut ray = Vec::new();
                let (mut r, mut c) = (row + dr, col + dc);
                while in_bounds(r, c) {
                    ray.push((r as usize * BOARD_SIZE + c as usize) as u8);
                    r += dr;
                    c += dc;
                }
                ray
            })
        })
        .collect()
});

/// Reversi board state represented by two bitboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// d4=white, e4=black, d5=black, e5=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw masks. Overlapping squares are kept black.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    /// Returns legal move mask for the given side.
    pub fn legal_moves(&self, color: Color) -> u64 {
        let (me, opp) = self.sides(color);
        let mut empty = !(me | opp);
        let mut legal = 0u64;

        while empty != 0 {
            let pos = empty.trailing_zeros() as usize;
            if Self::collect_flips(pos, me, opp) != 0 {
                legal |= bit(pos);
            }
            empty &= empty - 1;
        }

        legal
    }

    /// Returns the stones `color` would flip by playing at `pos`.
    /// Zero means the move is illegal.
    pub fn flips(&self, pos: usize, color: Color) -> u64 {
        let (me, opp) = self.sides(color);
        Self::collect_flips(pos, me, opp)
    }

    /// Places one stone and flips captured stones.
    /// Returns flipped bit mask. Returns 0 when move is illegal.
    pub fn place(&mut self, pos: usize, color: Color) -> u64 {
        let (me, opp) = self.sides(color);

        let flips = Self::collect_flips(pos, me, opp);
        if flips == 0 {
            return 0;
        }

        let next_me = me | bit(pos) | flips;
        let next_opp = opp & !flips;

        match color {
            Color::Black => {
                self.black = next_me;
                self.white = next_opp;
            }
            Color::White => {
                self.white = next_me;
                self.black = next_opp;
            }
        }

        flips
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        NUM_SQUARES as u8 - black_count - white_count
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            let square = bit(pos);
            *cell = if (self.black & square) != 0 {
                1
            } else if (self.white & square) != 0 {
                2
            } else {
                0
            };
        }
        board
    }

    fn sides(&self, color: Color) -> (u64, u64) {
        match color {
            Color::Black => (self.black, self.white),
            Color::White => (self.white, self.black),
        }
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= NUM_SQUARES || ((me | opp) & bit(pos)) != 0 {
            return 0;
        }

        let mut flips = 0u64;

        for ray in &RAYS[pos] {
            let mut line = 0u64;
            for &sq in ray {
                let square = bit(sq as usize);
                if (opp & square) != 0 {
                    line |= square;
                } else {
                    if (me & square) != 0 {
                        flips |= line;
                    }
                    break;
                }
            }
        }

        flips
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for row in 0..BOARD_SIZE {
            write!(f, "{}", row + 1)?;
            for col in 0..BOARD_SIZE {
                let square = bit(row * BOARD_SIZE + col);
                let cell = if (self.black & square) != 0 {
                    'X'
                } else if (self.white & square) != 0 {
                    'O'
                } else {
                    '.'
                };
                write!(f, " {cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub(crate) fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

/// Expands a square mask into ascending square indices.
pub(crate) fn mask_to_positions(mut mask: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(mask.count_ones() as usize);
    while mask != 0 {
        out.push(mask.trailing_zeros() as u8);
        mask &= mask - 1;
    }
    out
}

fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32)
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
