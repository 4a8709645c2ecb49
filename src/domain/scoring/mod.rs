//! PSI scoring model.
//!
//! Defines the fixed Presence/Skill/Intent weighting formula and the `Scores`
//! value object. The weighted PSI is computed with exact integer arithmetic
//! (hundredths) so that identical inputs always produce identical output, with
//! no floating-point accumulation error.

mod scores;

pub use scores::{Scores, ScoreValidationError};

/// Skill weight in hundredths (0.45).
pub const SKILL_WEIGHT: i64 = 45;

/// Presence weight in hundredths (0.25).
pub const PRESENCE_WEIGHT: i64 = 25;

/// Intent weight in hundredths (0.30).
pub const INTENT_WEIGHT: i64 = 30;

/// Sum of all weights in hundredths. Used as the divisor so the formula stays
/// correct even if the weights are retuned to something that does not sum to 1.
pub const WEIGHT_TOTAL: i64 = SKILL_WEIGHT + PRESENCE_WEIGHT + INTENT_WEIGHT;

/// Minimum component score.
pub const SCORE_MIN: i32 = 0;

/// Maximum component score.
pub const SCORE_MAX: i32 = 10;

/// Computes the weighted PSI value from the three component scores.
///
/// The multiply-accumulate runs in integer hundredths
/// (`skill*45 + presence*25 + intent*30`), is divided by the weight total, and
/// is rounded to one decimal place.
///
/// # Rounding contract
///
/// Ties round **half away from zero**: a third decimal digit of exactly 5
/// rounds up. `weighted_psi(8, 5, 6)` is 6.05 before rounding and returns 6.1.
/// This rule is pinned deliberately rather than inherited from any platform
/// default.
///
/// Pure and total over component scores in `[0, 10]`; the result is in
/// `[0.0, 10.0]`.
pub fn weighted_psi(presence: i32, skill: i32, intent: i32) -> f64 {
    let hundredths = i64::from(skill) * SKILL_WEIGHT
        + i64::from(presence) * PRESENCE_WEIGHT
        + i64::from(intent) * INTENT_WEIGHT;
    // psi in tenths = hundredths * 10 / WEIGHT_TOTAL, rounded half away from zero.
    let tenths = div_round_half_away(hundredths * 10, WEIGHT_TOTAL);
    tenths as f64 / 10.0
}

/// Integer division rounding half away from zero.
///
/// Inputs are non-negative here (scores are bounded below by zero), so the
/// away-from-zero tie-break reduces to rounding half up.
fn div_round_half_away(numerator: i64, denominator: i64) -> i64 {
    debug_assert!(numerator >= 0 && denominator > 0);
    (2 * numerator + denominator) / (2 * denominator)
}

/// Clamps a component score into the valid `[0, 10]` range.
pub fn clamp_score(value: i32) -> i32 {
    value.clamp(SCORE_MIN, SCORE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_psi_full_marks_is_ten() {
        assert_eq!(weighted_psi(10, 10, 10), 10.0);
    }

    #[test]
    fn weighted_psi_zero_marks_is_zero() {
        assert_eq!(weighted_psi(0, 0, 0), 0.0);
    }

    #[test]
    fn weighted_psi_matches_hand_computed_example() {
        // 6*0.45 + 8*0.25 + 7*0.30 = 2.7 + 2.0 + 2.1 = 6.8
        assert_eq!(weighted_psi(8, 6, 7), 6.8);
    }

    #[test]
    fn weighted_psi_exact_half_rounds_away_from_zero() {
        // 5*0.45 + 8*0.25 + 6*0.30 = 2.25 + 2.00 + 1.80 = 6.05 -> 6.1
        assert_eq!(weighted_psi(8, 5, 6), 6.1);
    }

    #[test]
    fn weighted_psi_has_exactly_one_decimal() {
        for presence in 0..=10 {
            for skill in 0..=10 {
                for intent in 0..=10 {
                    let psi = weighted_psi(presence, skill, intent);
                    let scaled = psi * 10.0;
                    assert_eq!(scaled, scaled.round(), "psi {psi} not one-decimal");
                }
            }
        }
    }

    #[test]
    fn weighted_psi_stays_in_range() {
        for presence in 0..=10 {
            for skill in 0..=10 {
                for intent in 0..=10 {
                    let psi = weighted_psi(presence, skill, intent);
                    assert!((0.0..=10.0).contains(&psi));
                }
            }
        }
    }

    #[test]
    fn clamp_score_bounds_values() {
        assert_eq!(clamp_score(-3), 0);
        assert_eq!(clamp_score(0), 0);
        assert_eq!(clamp_score(7), 7);
        assert_eq!(clamp_score(10), 10);
        assert_eq!(clamp_score(14), 10);
    }

    #[test]
    fn div_round_half_away_rounds_ties_up() {
        assert_eq!(div_round_half_away(605, 10), 61);
        assert_eq!(div_round_half_away(604, 10), 60);
        assert_eq!(div_round_half_away(606, 10), 61);
        assert_eq!(div_round_half_away(0, 10), 0);
    }
}
