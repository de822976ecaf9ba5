//! Scoring module - line-clear points, levels and gravity cadence
//!
//! - Clearing N rows awards `LINE_SCORES[N] * level` (level starts at 1).
//! - Level is `floor(lines / 10) + 1`.
//! - Gravity interval shrinks by a fixed step per level down to a floor;
//!   fast drop overrides it with a constant that is faster than any level.

use crate::types::{
    BASE_DROP_INTERVAL_MS, FAST_DROP_INTERVAL_MS, LEVEL_STEP_MS, LINES_PER_LEVEL, LINE_SCORES,
    MIN_DROP_INTERVAL_MS,
};

/// Points for clearing `rows` rows at once at `level`.
///
/// Counts above the table (only reachable on hand-built boards) score at the
/// four-row value.
pub fn calculate_line_score(rows: usize, level: u32) -> u32 {
    let base = LINE_SCORES[rows.min(LINE_SCORES.len() - 1)];
    base.saturating_mul(level)
}

/// Level for a cleared-lines total
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Level-derived gravity interval in milliseconds
pub fn base_drop_interval_ms(level: u32) -> u64 {
    let reduction = (level.saturating_sub(1) as u64).saturating_mul(LEVEL_STEP_MS);
    BASE_DROP_INTERVAL_MS
        .saturating_sub(reduction)
        .max(MIN_DROP_INTERVAL_MS)
}

/// Effective gravity interval, honouring the fast-drop flag
pub fn drop_interval_ms(level: u32, fast_drop: bool) -> u64 {
    if fast_drop {
        FAST_DROP_INTERVAL_MS
    } else {
        base_drop_interval_ms(level)
    }
}
