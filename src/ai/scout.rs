use crate::ai::cache::Bound;
use crate::ai::search::Searcher;
use crate::state::GameState;
use crate::types::Color;

impl Searcher {
    /// Scout: the first child is searched exactly, every other child is first
    /// probed with [`Searcher::test`] and searched only if it can beat the
    /// incumbent. Returns the colored value, like the other entry points.
    pub fn scout(&mut self, state: &GameState, depth: i32, color: Color) -> i32 {
        color.sign() * self.scout_value(state, depth, color)
    }

    /// Does the Black-perspective value of `state`, with `color` to move,
    /// reach `score`? `inclusive` selects `>=` over `>`.
    ///
    /// Black maximizes, so one passing child is enough for Black and one
    /// failing child is enough to refute for White.
    pub fn test(&mut self, state: &GameState, color: Color, score: i32, inclusive: bool) -> bool {
        self.stats.generated += 1;
        if state.terminal() {
            let value = state.value();
            return if inclusive { value >= score } else { value > score };
        }

        self.stats.expanded += 1;
        let moves = state.get_moves(color);
        if moves.is_empty() {
            return self.test(state, -color, score, inclusive);
        }

        for p in moves {
            let holds = self.test(&state.play(color, p), -color, score, inclusive);
            match color {
                Color::Black if holds => return true,
                Color::White if !holds => return false,
                _ => {}
            }
        }

        color == Color::White
    }

    /// Black-perspective minimax value.
    fn scout_value(&mut self, state: &GameState, depth: i32, color: Color) -> i32 {
        self.stats.generated += 1;
        if state.terminal() {
            return state.value();
        }
        if let Some((value, Bound::Exact)) = self.probe(state, color) {
            return color.sign() * value;
        }

        let moves = state.get_moves(color);
        let score = match moves.split_first() {
            None => self.scout_value(state, depth, -color),
            Some((&first, rest)) => {
                let mut score = self.scout_value(&state.play(color, first), depth - 1, -color);
                for &p in rest {
                    let child = state.play(color, p);
                    let improves = match color {
                        Color::Black => self.test(&child, -color, score, false),
                        Color::White => !self.test(&child, -color, score, true),
                    };
                    if improves {
                        score = self.scout_value(&child, depth - 1, -color);
                    }
                }
                score
            }
        };

        self.stats.expanded += 1;
        self.remember(state, color, color.sign() * score, Bound::Exact);
        score
    }
}
