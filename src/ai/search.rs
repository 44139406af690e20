use tracing::warn;

use crate::ai::Algorithm;
use crate::ai::cache::{Bound, CacheConfig, TranspositionCache};
use crate::error::CacheError;
use crate::state::GameState;
use crate::types::{Color, SearchStats};

/// Largest possible stone differential. `[-SCORE_BOUND, SCORE_BOUND]` is a
/// full window: any alpha-beta variant searched with it returns exact values.
pub const SCORE_BOUND: i32 = 64;

/// Runs the exact searches and owns the node counters and the optional cache.
///
/// Every call recurses to the end of the game, so `depth` only counts plies
/// from the root. A pass keeps the depth unchanged.
#[derive(Debug, Default)]
pub struct Searcher {
    pub(super) stats: SearchStats,
    cache: Option<TranspositionCache>,
    cache_error: Option<CacheError>,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(config: CacheConfig) -> Self {
        Self {
            cache: Some(TranspositionCache::new(config)),
            ..Self::default()
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }

    /// True while a cache is attached and has not run out of room.
    pub fn cache_active(&self) -> bool {
        self.cache.is_some() && self.cache_error.is_none()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map_or(0, TranspositionCache::len)
    }

    pub fn clear_cache(&mut self) {
        if let Some(cache) = &mut self.cache {
            cache.clear();
        }
    }

    /// Drops the cache. Later searches run without it.
    pub fn disable_cache(&mut self) {
        self.cache = None;
        self.cache_error = None;
    }

    /// Returns the exhaustion that stopped the cache during the last search, if any.
    /// Once set, the cache is neither read nor written until it is disabled.
    pub fn take_cache_error(&mut self) -> Option<CacheError> {
        self.cache_error.take()
    }

    /// Runs `algorithm` with the full score window and returns the colored value.
    pub fn evaluate(&mut self, algorithm: Algorithm, state: &GameState, color: Color) -> i32 {
        match algorithm {
            Algorithm::Negamax => self.negamax(state, 0, color),
            Algorithm::AlphaBeta => self.negamax_ab(state, 0, -SCORE_BOUND, SCORE_BOUND, color),
            Algorithm::Scout => self.scout(state, 0, color),
            Algorithm::Negascout => self.negascout(state, 0, -SCORE_BOUND, SCORE_BOUND, color),
        }
    }

    /// Plain negamax over the whole remaining tree.
    pub fn negamax(&mut self, state: &GameState, depth: i32, color: Color) -> i32 {
        self.stats.generated += 1;
        if state.terminal() {
            return color.sign() * state.value();
        }
        if let Some((value, Bound::Exact)) = self.probe(state, color) {
            return value;
        }

        let moves = state.get_moves(color);
        let score = if moves.is_empty() {
            -self.negamax(state, depth, -color)
        } else {
            let mut best = -SCORE_BOUND - 1;
            for p in moves {
                let child = state.play(color, p);
                best = best.max(-self.negamax(&child, depth - 1, -color));
            }
            best
        };

        self.stats.expanded += 1;
        self.remember(state, color, score, Bound::Exact);
        score
    }

    /// Negamax with alpha-beta pruning. Exact when the true value lies in
    /// `[alpha, beta]`; otherwise a bound on the failing side.
    pub fn negamax_ab(
        &mut self,
        state: &GameState,
        depth: i32,
        alpha: i32,
        beta: i32,
        color: Color,
    ) -> i32 {
        self.stats.generated += 1;
        if state.terminal() {
            return color.sign() * state.value();
        }

        let (mut alpha, mut beta) = (alpha, beta);
        let window = (alpha, beta);
        if let Some((value, _)) = self.narrow(state, color, &mut alpha, &mut beta) {
            return value;
        }

        let moves = state.get_moves(color);
        if moves.is_empty() {
            alpha = -self.negamax_ab(state, depth, -beta, -alpha, -color);
        }
        for p in moves {
            let child = state.play(color, p);
            let value = -self.negamax_ab(&child, depth - 1, -beta, -alpha, -color);
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }

        self.stats.expanded += 1;
        self.remember(state, color, alpha, Bound::classify(alpha, window.0, window.1));
        alpha
    }

    /// Principal variation search: full window for the first child, null-window
    /// probes for the rest, re-searching only when a probe lands inside the window.
    /// Fail-hard like [`Searcher::negamax_ab`]: never returns less than `alpha`.
    pub fn negascout(
        &mut self,
        state: &GameState,
        depth: i32,
        alpha: i32,
        beta: i32,
        color: Color,
    ) -> i32 {
        self.pvs(state, depth, alpha, beta, color).0.max(alpha)
    }

    /// Fail-soft negascout. The flag is set when every child was searched to an
    /// exact value, in which case the score is exact whatever the window and a
    /// probe that lands inside the window needs no re-search.
    fn pvs(
        &mut self,
        state: &GameState,
        depth: i32,
        alpha: i32,
        beta: i32,
        color: Color,
    ) -> (i32, bool) {
        self.stats.generated += 1;
        if state.terminal() {
            return (color.sign() * state.value(), true);
        }

        let (mut alpha, mut beta) = (alpha, beta);
        let window = (alpha, beta);
        if let Some(settled) = self.narrow(state, color, &mut alpha, &mut beta) {
            return settled;
        }

        let moves = state.get_moves(color);
        let (best, exact) = if moves.is_empty() {
            let (value, exact) = self.pvs(state, depth, -beta, -alpha, -color);
            (-value, exact)
        } else {
            let count = moves.len();
            let mut best = -SCORE_BOUND - 1;
            let mut exact = true;
            for (i, p) in moves.into_iter().enumerate() {
                let child = state.play(color, p);
                let (value, child_exact) = if i == 0 {
                    self.pvs(&child, depth - 1, -beta, -alpha, -color)
                } else {
                    let (probe, probe_exact) =
                        self.pvs(&child, depth - 1, -alpha - 1, -alpha, -color);
                    if alpha < -probe && -probe < beta && !probe_exact {
                        self.pvs(&child, depth - 1, -beta, probe, -color)
                    } else {
                        (probe, probe_exact)
                    }
                };

                let score = -value;
                exact &= child_exact;
                best = best.max(score);
                alpha = alpha.max(score);
                if alpha >= beta {
                    exact &= i + 1 == count;
                    break;
                }
            }
            (best, exact)
        };

        self.stats.expanded += 1;
        let bound = if exact {
            Bound::Exact
        } else {
            Bound::classify(best, window.0, window.1)
        };
        self.remember(state, color, best, bound);
        (best, exact)
    }

    pub(super) fn probe(&self, state: &GameState, color: Color) -> Option<(i32, Bound)> {
        if self.cache_error.is_some() {
            return None;
        }
        self.cache.as_ref()?.probe(state, color)
    }

    pub(super) fn remember(&mut self, state: &GameState, color: Color, value: i32, bound: Bound) {
        if self.cache_error.is_some() {
            return;
        }
        let Some(cache) = &mut self.cache else {
            return;
        };
        if let Err(err) = cache.store(state, color, value, bound) {
            warn!(entries = cache.len(), error = %err, "transposition cache stopped");
            self.cache_error = Some(err);
        }
    }

    /// Tightens the window with a cached bound. Returns the cached value, and
    /// whether it is exact, when it settles the node on its own.
    fn narrow(
        &self,
        state: &GameState,
        color: Color,
        alpha: &mut i32,
        beta: &mut i32,
    ) -> Option<(i32, bool)> {
        let (value, bound) = self.probe(state, color)?;
        match bound {
            Bound::Exact => return Some((value, true)),
            Bound::Lower => *alpha = (*alpha).max(value),
            Bound::Upper => *beta = (*beta).min(value),
        }
        (*alpha >= *beta).then_some((value, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testutil::{blocked_black, full_board, late_game};

    fn full(searcher: &mut Searcher, algorithm: Algorithm, state: &GameState, color: Color) -> i32 {
        searcher.reset_stats();
        searcher.evaluate(algorithm, state, color)
    }

    #[test]
    fn terminal_state_returns_colored_value_without_expanding() {
        let state = full_board();
        let mut searcher = Searcher::new();

        for algorithm in Algorithm::ALL {
            assert_eq!(full(&mut searcher, algorithm, &state, Color::Black), state.value());
            assert_eq!(full(&mut searcher, algorithm, &state, Color::White), -state.value());
            assert_eq!(searcher.stats(), SearchStats { generated: 1, expanded: 0 });
        }
    }

    #[test]
    fn last_move_is_found_and_counted() {
        let (state, mover) = late_game(1);
        assert_eq!(state.empty_count(), 1);
        let color = if state.has_moves(mover) { mover } else { -mover };
        let mut searcher = Searcher::new();

        let value = searcher.negamax(&state, 0, color);
        let last = state.get_moves(color)[0];

        assert_eq!(value, color.sign() * state.play(color, last).value());
        assert_eq!(searcher.stats(), SearchStats { generated: 2, expanded: 1 });
    }

    #[test]
    fn alpha_beta_matches_negamax_on_late_positions() {
        let mut searcher = Searcher::new();
        for empties in 0..=7 {
            let (state, mover) = late_game(empties);
            for color in [mover, -mover] {
                let exact = full(&mut searcher, Algorithm::Negamax, &state, color);
                assert_eq!(
                    full(&mut searcher, Algorithm::AlphaBeta, &state, color),
                    exact,
                    "empties={empties} color={color}"
                );
            }
        }
    }

    #[test]
    fn negascout_matches_negamax_on_late_positions() {
        let mut searcher = Searcher::new();
        for empties in 0..=7 {
            let (state, mover) = late_game(empties);
            for color in [mover, -mover] {
                let exact = full(&mut searcher, Algorithm::Negamax, &state, color);
                assert_eq!(
                    full(&mut searcher, Algorithm::Negascout, &state, color),
                    exact,
                    "empties={empties} color={color}"
                );
            }
        }
    }

    #[test]
    fn narrow_window_returns_bound_on_the_failing_side() {
        let (state, color) = late_game(6);
        let mut searcher = Searcher::new();
        let exact = searcher.negamax(&state, 0, color);

        let high = searcher.negamax_ab(&state, 0, exact + 1, exact + 3, color);
        let low = searcher.negamax_ab(&state, 0, exact - 3, exact - 1, color);
        let null = searcher.negascout(&state, 0, exact - 1, exact, color);

        assert!(high <= exact + 1);
        assert!(low >= exact - 1);
        assert_eq!(null, exact);
    }

    #[test]
    fn negascout_fails_low_to_the_window_alpha() {
        for empties in [6, 7] {
            let (state, color) = late_game(empties);
            let mut searcher = Searcher::new();
            let exact = searcher.negamax(&state, 0, color);

            for (alpha, beta) in [(exact + 1, exact + 3), (exact + 5, exact + 9)] {
                assert_eq!(searcher.negascout(&state, 0, alpha, beta, color), alpha);
                assert_eq!(searcher.negamax_ab(&state, 0, alpha, beta, color), alpha);
            }
        }
    }

    #[test]
    fn pass_is_evaluated_as_the_opponent_moving_on_the_same_board() {
        let state = blocked_black();
        let mut searcher = Searcher::new();

        for algorithm in Algorithm::ALL {
            let via_pass = full(&mut searcher, algorithm, &state, Color::Black);
            let direct = full(&mut searcher, algorithm, &state, Color::White);

            assert_eq!(via_pass, -direct, "{algorithm}");
            // White fills the last square and owns every stone.
            assert_eq!(direct, 64, "{algorithm}");
        }
    }

    #[test]
    fn colors_are_zero_sum_where_the_mover_cannot_choose() {
        let mut searcher = Searcher::new();
        for empties in 0..=8 {
            let (state, mover) = late_game(empties);
            for color in [mover, -mover] {
                if state.has_moves(color) {
                    continue;
                }
                assert_eq!(
                    searcher.negamax(&state, 0, color),
                    -searcher.negamax(&state, 0, -color)
                );
            }
        }
    }

    #[test]
    fn negascout_never_expands_more_than_negamax() {
        let mut searcher = Searcher::new();
        for empties in 0..=8 {
            let (state, color) = late_game(empties);

            full(&mut searcher, Algorithm::Negamax, &state, color);
            let plain = searcher.stats().expanded;
            full(&mut searcher, Algorithm::Negascout, &state, color);
            let pvs = searcher.stats().expanded;

            assert!(pvs <= plain, "empties={empties}: {pvs} > {plain}");
        }
    }

    #[test]
    fn cache_does_not_change_values() {
        let mut plain = Searcher::new();
        let mut cached = Searcher::with_cache(CacheConfig {
            capacity: 1 << 16,
            min_empties: 0,
        });

        for empties in 0..=8 {
            let (state, color) = late_game(empties);
            for algorithm in Algorithm::ALL {
                cached.clear_cache();
                let expected = full(&mut plain, algorithm, &state, color);
                assert_eq!(full(&mut cached, algorithm, &state, color), expected, "{algorithm}");
                // Second pass is answered from the table.
                assert_eq!(full(&mut cached, algorithm, &state, color), expected, "{algorithm}");
            }
        }
        assert!(cached.cache_active());
        assert!(cached.cache_len() > 0);
    }

    #[test]
    fn cached_search_needs_fewer_nodes_on_repeat() {
        let (state, color) = late_game(7);
        let mut searcher = Searcher::with_cache(CacheConfig {
            capacity: 1 << 16,
            min_empties: 0,
        });

        full(&mut searcher, Algorithm::Negamax, &state, color);
        let first = searcher.stats().generated;
        full(&mut searcher, Algorithm::Negamax, &state, color);

        assert!(first > 1);
        assert_eq!(searcher.stats().generated, 1);
    }

    #[test]
    fn exhausted_cache_stops_without_changing_the_value() {
        let (state, color) = late_game(8);
        let expected = Searcher::new().negascout(&state, 0, -SCORE_BOUND, SCORE_BOUND, color);
        let mut searcher = Searcher::with_cache(CacheConfig {
            capacity: 1,
            min_empties: 0,
        });

        let value = searcher.negascout(&state, 0, -SCORE_BOUND, SCORE_BOUND, color);

        assert_eq!(value, expected);
        assert!(!searcher.cache_active());
        assert_eq!(
            searcher.take_cache_error(),
            Some(CacheError::Exhausted { capacity: 1 })
        );

        searcher.disable_cache();
        assert!(!searcher.cache_active());
        assert_eq!(searcher.cache_len(), 0);
    }

    #[test]
    fn reset_clears_counters() {
        let (state, color) = late_game(4);
        let mut searcher = Searcher::new();

        searcher.negamax(&state, 0, color);
        assert!(searcher.stats().generated > 0);
        searcher.reset_stats();

        assert_eq!(searcher.stats(), SearchStats::default());
    }
}
