//! Weighted jackpot draw.

use chipjar_types::RewardTable;
use rand::{Rng, RngCore};

/// Draw one reward value from `table`.
///
/// Each value is returned with probability `weight / total_weight`.
pub fn select<R: RngCore>(table: &RewardTable, rng: &mut R) -> u64 {
    let roll = rng.gen_range(0.0..table.total_weight());
    select_at(table, roll)
}

/// Resolve a roll in `[0, total_weight)` to a reward value.
///
/// Walks the table in order, subtracting each weight, and returns the first entry that brings the
/// remainder to zero or below. A roll that floating-point drift leaves unresolved falls back to
/// the last entry.
pub fn select_at(table: &RewardTable, roll: f64) -> u64 {
    let mut remainder = roll;
    for entry in table.entries() {
        remainder -= entry.weight;
        if remainder <= 0.0 {
            return entry.value;
        }
    }
    table.last().value
}
