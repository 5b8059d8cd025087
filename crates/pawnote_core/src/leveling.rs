//! Pet experience and leveling engine.
//!
//! # Responsibility
//! - Convert arbitrary point deltas into a normalized (level, experience)
//!   state along the experience curve.
//!
//! # Invariants
//! - `level >= 1` always.
//! - After normalization, `points` lies in `[0, required_experience(level))`.
//! - A level-1 pet never holds negative experience; deficit past zero is
//!   discarded, not carried as debt.

use serde::{Deserialize, Serialize};

/// Base experience cost of advancing past level 1.
const BASE_EXPERIENCE: f64 = 100.0;
/// Growth exponent of the curve.
const LEVEL_EXPONENT: f64 = 1.5;

/// Normalized leveling state: a level plus experience within that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Always >= 1.
    pub level: u32,
    /// Experience inside the current level.
    pub points: i64,
}

impl LevelProgress {
    pub fn new(level: u32, points: i64) -> Self {
        Self { level, points }
    }
}

/// Experience required to advance past `level`.
///
/// The curve is `BASE_EXPERIENCE * level^LEVEL_EXPONENT`, floored so that
/// experience arithmetic stays exact in integers. Strictly increasing in
/// `level`; levels below 1 are treated as level 1.
pub fn required_experience(level: u32) -> i64 {
    let level = level.max(1);
    (BASE_EXPERIENCE * f64::from(level).powf(LEVEL_EXPONENT)).floor() as i64
}

/// Applies a point delta and renormalizes the leveling state.
///
/// Total function: every input produces a defined output, including
/// negative deltas (deductions) and deltas spanning several levels.
/// A zero delta over an already-normalized state is the identity.
pub fn apply_points(current: LevelProgress, delta: i64) -> LevelProgress {
    let mut level = current.level.max(1);
    let mut total = current.points.saturating_add(delta);

    while total >= required_experience(level) {
        total -= required_experience(level);
        level += 1;
    }

    while total < 0 && level > 1 {
        level -= 1;
        total += required_experience(level);
    }

    if total < 0 {
        total = 0;
    }

    LevelProgress::new(level, total)
}

#[cfg(test)]
mod tests {
    use super::{apply_points, required_experience, LevelProgress};

    #[test]
    fn curve_is_strictly_increasing() {
        for level in 1..200 {
            assert!(required_experience(level + 1) > required_experience(level));
        }
    }

    #[test]
    fn zero_delta_is_identity_for_normalized_state() {
        let state = LevelProgress::new(3, 17);
        assert_eq!(apply_points(state, 0), state);
    }

    #[test]
    fn single_level_up_carries_remainder() {
        // required_experience(1) = 100, so 80 + 250 = 330 -> level 2 with 230.
        let after = apply_points(LevelProgress::new(1, 80), 250);
        assert_eq!(after, LevelProgress::new(2, 230));
    }

    #[test]
    fn large_delta_spans_multiple_levels() {
        let after = apply_points(LevelProgress::new(1, 0), 10_000);
        assert!(after.level > 2);
        assert!(after.points >= 0);
        assert!(after.points < required_experience(after.level));
    }

    #[test]
    fn deduction_steps_down_a_level() {
        // Level 2 with 10 points, minus 50: borrow required_experience(1)=100,
        // landing on level 1 with 60.
        let after = apply_points(LevelProgress::new(2, 10), -50);
        assert_eq!(after, LevelProgress::new(1, 60));
    }

    #[test]
    fn level_one_floors_at_zero() {
        let after = apply_points(LevelProgress::new(1, 30), -1_000);
        assert_eq!(after, LevelProgress::new(1, 0));
    }

    #[test]
    fn round_trip_restores_state_without_clamping() {
        let start = LevelProgress::new(2, 150);
        let up = apply_points(start, 777);
        let back = apply_points(up, -777);
        assert_eq!(back, start);
    }

    #[test]
    fn sub_one_level_input_is_clamped() {
        let after = apply_points(LevelProgress::new(0, 0), 10);
        assert_eq!(after, LevelProgress::new(1, 10));
    }
}
