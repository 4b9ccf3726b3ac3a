use serde::{Deserialize, Serialize};

pub const DEFAULT_ANI_WATCHLIST_POINTS: i32 = 50;
pub const DEFAULT_PATTERN_SIZE_LIMIT: usize = 256 * 1024;

/// Tunables for a scoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points added by an ANI watchlist hit. Watchlist rows carry no points of their own.
    pub ani_watchlist_points: i32,
    /// Compiled size budget, in bytes, for each OSI/RSI pattern.
    pub pattern_size_limit: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ani_watchlist_points: DEFAULT_ANI_WATCHLIST_POINTS,
            pattern_size_limit: DEFAULT_PATTERN_SIZE_LIMIT,
        }
    }
}
