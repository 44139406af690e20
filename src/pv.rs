use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::ai::Algorithm;
use crate::ai::cache::CacheConfig;
use crate::ai::search::Searcher;
use crate::board::NUM_SQUARES;
use crate::error::SolverError;
use crate::state::GameState;
use crate::types::{Color, PositionReport, PvReport};

/// Terminates a move list in the integer PV format.
pub const PV_SENTINEL: i32 = -1;

/// A line of play from the initial position. `states[k]` is the position
/// after `k` moves and `movers[k]` the side to move there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalVariation {
    moves: Vec<u8>,
    states: Vec<GameState>,
    movers: Vec<Color>,
}

impl PrincipalVariation {
    /// Replays `moves` from the start, Black first. A side without a legal
    /// move passes implicitly before the next move is read.
    pub fn from_moves(moves: &[u8]) -> Result<Self, SolverError> {
        let mut state = GameState::initial();
        let mut color = Color::Black;
        let mut states = vec![state];
        let mut movers = Vec::with_capacity(moves.len() + 1);

        for (ply, &position) in moves.iter().enumerate() {
            if position as usize >= NUM_SQUARES {
                return Err(SolverError::OutOfRange(position.into()));
            }
            if !state.has_moves(color) {
                if !state.has_moves(-color) {
                    return Err(SolverError::GameOver(ply));
                }
                color = -color;
            }
            if !state.is_legal(color, position) {
                return Err(SolverError::IllegalMove { ply, position, color });
            }

            movers.push(color);
            state = state.play(color, position);
            states.push(state);
            color = -color;
        }

        if !state.has_moves(color) && state.has_moves(-color) {
            color = -color;
        }
        movers.push(color);

        Ok(Self {
            moves: moves.to_vec(),
            states,
            movers,
        })
    }

    /// Reads squares up to the `-1` sentinel.
    pub fn from_terminated(squares: &[i32]) -> Result<Self, SolverError> {
        let end = squares
            .iter()
            .position(|&sq| sq == PV_SENTINEL)
            .ok_or(SolverError::MissingSentinel)?;

        Self::from_squares(&squares[..end])
    }

    /// Replays integer squares with no sentinel. Negative squares, `-1`
    /// included, are out of range.
    pub fn from_squares(squares: &[i32]) -> Result<Self, SolverError> {
        let moves = squares
            .iter()
            .map(|&sq| u8::try_from(sq).map_err(|_| SolverError::OutOfRange(sq)))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_moves(&moves)
    }

    pub fn moves(&self) -> &[u8] {
        &self.moves
    }

    /// Number of moves in the line.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn final_state(&self) -> &GameState {
        &self.states[self.moves.len()]
    }

    /// The position after `ply` moves and the side to move there.
    pub fn position(&self, ply: usize) -> Option<(&GameState, Color)> {
        Some((self.states.get(ply)?, *self.movers.get(ply)?))
    }

    /// Positions from the final one back to the start, with their ply.
    pub fn backwards(&self) -> impl Iterator<Item = (usize, &GameState, Color)> + '_ {
        (0..self.states.len())
            .rev()
            .map(move |ply| (ply, &self.states[ply], self.movers[ply]))
    }
}

/// Driver settings. Every field has a default, so a partial JS object works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    pub use_cache: bool,
    pub cache: CacheConfig,
    /// Evaluate at most this many positions, starting from the end of the line.
    pub max_positions: Option<usize>,
}

/// Evaluates every position of `pv`, final position first, with a fresh
/// counter set and an empty cache for each one.
pub fn run(pv: &PrincipalVariation, algorithm: Algorithm, options: &RunOptions) -> PvReport {
    let mut searcher = if options.use_cache {
        Searcher::with_cache(options.cache)
    } else {
        Searcher::new()
    };
    let mut cache_disabled = false;
    let limit = options.max_positions.unwrap_or(usize::MAX);

    info!(
        algorithm = %algorithm,
        plies = pv.len(),
        use_cache = options.use_cache,
        "moving along principal variation"
    );

    let mut positions = Vec::new();
    for (ply, state, color) in pv.backwards().take(limit) {
        let (colored_value, seconds) = loop {
            searcher.reset_stats();
            searcher.clear_cache();
            let start = Instant::now();
            let value = searcher.evaluate(algorithm, state, color);
            let seconds = start.elapsed().as_secs_f64();

            match searcher.take_cache_error() {
                None => break (value, seconds),
                Some(err) => {
                    warn!(ply, error = %err, "disabling transposition cache and retrying");
                    searcher.disable_cache();
                    cache_disabled = true;
                }
            }
        };

        let stats = searcher.stats();
        let report = PositionReport {
            index: ply + 1,
            ply,
            mover: color,
            colored_value,
            value: color.sign() * colored_value,
            empties: state.empty_count(),
            expanded: stats.expanded,
            generated: stats.generated,
            seconds,
            generated_per_second: if seconds > 0.0 {
                stats.generated as f64 / seconds
            } else {
                0.0
            },
            cache_used: searcher.cache_active(),
        };
        debug!(
            index = report.index,
            mover = %color,
            value = report.value,
            expanded = report.expanded,
            generated = report.generated,
            seconds = report.seconds,
            "position evaluated"
        );
        positions.push(report);
    }

    let report = PvReport {
        algorithm: algorithm.name().to_string(),
        pv_length: pv.len(),
        cache_requested: options.use_cache,
        cache_disabled,
        positions,
    };
    info!(
        positions = report.positions.len(),
        generated = report.total_generated(),
        expanded = report.total_expanded(),
        "principal variation done"
    );
    report
}
