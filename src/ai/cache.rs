use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::CacheError;
use crate::state::GameState;
use crate::types::Color;

const DEFAULT_CAPACITY: usize = 1 << 20;
const DEFAULT_MIN_EMPTIES: u8 = 4;

/// What a cached value says about the true score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// True score is at least the cached value.
    Lower,
    /// True score is at most the cached value.
    Upper,
}

impl Bound {
    /// Classifies a search result against the window it was searched with.
    pub fn classify(value: i32, alpha: i32, beta: i32) -> Self {
        if value <= alpha {
            Self::Upper
        } else if value >= beta {
            Self::Lower
        } else {
            Self::Exact
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries per side to move before the cache reports exhaustion.
    pub capacity: usize,
    /// Positions with fewer empty squares are never stored.
    pub min_empties: u8,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            min_empties: DEFAULT_MIN_EMPTIES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheEntry {
    board: Board,
    value: i32,
    bound: Bound,
}

/// Maps a position hash to a colored score bound, one table per side to move.
/// Hits require the stored board to match, so hash collisions read as misses.
#[derive(Debug, Clone)]
pub struct TranspositionCache {
    tables: [HashMap<u32, CacheEntry>; 2],
    config: CacheConfig,
}

impl TranspositionCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            tables: [HashMap::new(), HashMap::new()],
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.tables.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(HashMap::is_empty)
    }

    pub fn clear(&mut self) {
        for table in &mut self.tables {
            table.clear();
        }
    }

    pub fn probe(&self, state: &GameState, color: Color) -> Option<(i32, Bound)> {
        self.tables[color.index()]
            .get(&state.hash())
            .filter(|entry| entry.board == *state.board())
            .map(|entry| (entry.value, entry.bound))
    }

    /// Stores a colored value. Positions below the empties threshold are skipped.
    pub fn store(
        &mut self,
        state: &GameState,
        color: Color,
        value: i32,
        bound: Bound,
    ) -> Result<(), CacheError> {
        if state.empty_count() < self.config.min_empties {
            return Ok(());
        }

        let capacity = self.config.capacity;
        let table = &mut self.tables[color.index()];
        let key = state.hash();
        if !table.contains_key(&key) {
            if table.len() >= capacity {
                return Err(CacheError::Exhausted { capacity });
            }
            table.try_reserve(1)?;
        }

        table.insert(
            key,
            CacheEntry {
                board: *state.board(),
                value,
                bound,
            },
        );
        Ok(())
    }
}

impl Default for TranspositionCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
