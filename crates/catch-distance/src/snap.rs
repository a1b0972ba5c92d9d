use catch_model::Difficulty;

use crate::point::CatchPoint;

/// Gap (ms) below which a movement counts as higher-snapped on Salads,
/// and on Platters after a hyperdash.
pub const SNAP_250_MS: f64 = 250.0;
/// Gap (ms) below which a movement counts as higher-snapped on Platters and Rains.
pub const SNAP_125_MS: f64 = 125.0;

/// Whether the gap from `previous` to `current` is higher-snapped for `difficulty`.
///
/// - Cup: no dashes or hyperdashes are allowed, so nothing is higher-snapped
/// - Salad: gaps under 250ms
/// - Platter: gaps under 125ms, or under 250ms when leaving a hyperdash
/// - Rain: gaps under 125ms
/// - Overdose and above: no snapping rules
pub fn is_higher_snapped(difficulty: Difficulty, current: &CatchPoint, previous: &CatchPoint) -> bool {
    let gap = current.time - previous.time;
    match difficulty {
        Difficulty::Normal => gap < SNAP_250_MS,
        Difficulty::Hard => {
            let threshold = if previous.is_hyperdash() {
                SNAP_250_MS
            } else {
                SNAP_125_MS
            };
            gap < threshold
        }
        Difficulty::Insane => gap < SNAP_125_MS,
        Difficulty::Easy | Difficulty::Expert | Difficulty::Ultra => false,
    }
}
