//! Scores value object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{weighted_psi, SCORE_MAX, SCORE_MIN};

/// Error raised when a component score falls outside the valid range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("score '{field}' must be between {SCORE_MIN} and {SCORE_MAX}, got {actual}")]
pub struct ScoreValidationError {
    /// Which component was out of range.
    pub field: &'static str,
    /// The offending value.
    pub actual: i32,
}

/// The three PSI component scores plus an optional pre-computed composite.
///
/// `presence`, `skill` and `intent` are integers in `[0, 10]` once validated.
/// `psi` is a derived convenience value only: an upstream LLM may supply its
/// own estimate, but callers needing the canonical composite must use
/// [`Scores::weighted_psi`]. Immutable once embedded in a report, except for
/// the one-time `psi` backfill performed by the report generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub presence: i32,
    pub skill: i32,
    pub intent: i32,
    #[serde(default)]
    pub psi: Option<f64>,
}

impl Scores {
    /// Creates scores without a pre-computed composite.
    pub fn new(presence: i32, skill: i32, intent: i32) -> Self {
        Self {
            presence,
            skill,
            intent,
            psi: None,
        }
    }

    /// Creates scores carrying an explicit composite value.
    pub fn with_psi(presence: i32, skill: i32, intent: i32, psi: f64) -> Self {
        Self {
            presence,
            skill,
            intent,
            psi: Some(psi),
        }
    }

    /// Checks that every component score is within `[0, 10]`.
    ///
    /// Out-of-range values are an error here, not silently clamped: clamping
    /// is a defaulting concern and happens only in the fallback estimator.
    pub fn validate(&self) -> Result<(), ScoreValidationError> {
        for (field, actual) in [
            ("presence", self.presence),
            ("skill", self.skill),
            ("intent", self.intent),
        ] {
            if !(SCORE_MIN..=SCORE_MAX).contains(&actual) {
                return Err(ScoreValidationError { field, actual });
            }
        }
        Ok(())
    }

    /// Computes the canonical weighted composite from the three components.
    pub fn weighted_psi(&self) -> f64 {
        weighted_psi(self.presence, self.skill, self.intent)
    }

    /// Returns the supplied composite when present, else the weighted one.
    pub fn psi_value(&self) -> f64 {
        self.psi.unwrap_or_else(|| self.weighted_psi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_in_range_scores() {
        assert!(Scores::new(0, 10, 5).validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        let err = Scores::new(11, 5, 5).validate().unwrap_err();
        assert_eq!(err.field, "presence");
        assert_eq!(err.actual, 11);

        let err = Scores::new(5, -1, 5).validate().unwrap_err();
        assert_eq!(err.field, "skill");

        let err = Scores::new(5, 5, 12).validate().unwrap_err();
        assert_eq!(err.field, "intent");
    }

    #[test]
    fn psi_value_prefers_supplied_composite() {
        let scores = Scores::with_psi(8, 6, 7, 9.9);
        assert_eq!(scores.psi_value(), 9.9);
    }

    #[test]
    fn psi_value_falls_back_to_weighted() {
        let scores = Scores::new(8, 6, 7);
        assert_eq!(scores.psi_value(), 6.8);
    }

    #[test]
    fn scores_serialize_with_contract_field_names() {
        let json = serde_json::to_value(Scores::with_psi(7, 8, 6, 7.3)).unwrap();
        assert_eq!(json["presence"], 7);
        assert_eq!(json["skill"], 8);
        assert_eq!(json["intent"], 6);
        assert_eq!(json["psi"], 7.3);
    }

    #[test]
    fn scores_deserialize_without_psi() {
        let scores: Scores =
            serde_json::from_str(r#"{"presence":5,"skill":6,"intent":7}"#).unwrap();
        assert_eq!(scores.psi, None);
    }
}
