//! The validated shape of a text-evaluation PSI report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::scoring::{ScoreValidationError, Scores, SCORE_MAX, SCORE_MIN};

/// Errors surfaced by strict report validation.
///
/// Any of these sends the report generator down the fallback path; none of
/// them escape to the caller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReportValidationError {
    #[error(transparent)]
    Score(#[from] ScoreValidationError),

    #[error("synergy score must be between {SCORE_MIN} and {SCORE_MAX}, got {actual}")]
    SynergyOutOfRange { actual: i32 },

    #[error("doubles report is missing the partner field group")]
    MissingPartnerGroup,

    #[error("singles report unexpectedly carries partner fields")]
    UnexpectedPartnerGroup,

    #[error("payload does not match the report shape: {0}")]
    Shape(String),
}

/// A Presence/Skill/Intent report for a text evaluation.
///
/// Field names are part of the external contract: the structured form is
/// persisted as JSON and re-read later for history display. Constructed once
/// per evaluation submission and never mutated afterwards, except for the
/// one-time `scores.psi` backfill performed by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsiReport {
    pub scores: Scores,
    pub player_evaluation: String,
    #[serde(default)]
    pub player_strengths: Vec<String>,
    #[serde(default)]
    pub player_weaknesses: Vec<String>,
    #[serde(default)]
    pub actions_strengths: Vec<String>,
    #[serde(default)]
    pub actions_weaknesses: Vec<String>,
    pub course_forward: String,
    #[serde(default)]
    pub summary_bullets: Vec<String>,
}

impl PsiReport {
    /// Deserializes a normalized payload into a report, mapping shape
    /// mismatches onto [`ReportValidationError::Shape`].
    pub fn from_normalized(payload: serde_json::Value) -> Result<Self, ReportValidationError> {
        serde_json::from_value(payload).map_err(|e| ReportValidationError::Shape(e.to_string()))
    }

    /// Strict schema validation: component scores must be in range.
    pub fn validate(&self) -> Result<(), ReportValidationError> {
        self.scores.validate()?;
        Ok(())
    }

    /// Fills in the derived `psi` field when the LLM did not supply one.
    ///
    /// The only mutation a report sees after construction.
    pub fn ensure_psi(&mut self) {
        if self.scores.psi.is_none() {
            self.scores.psi = Some(self.scores.weighted_psi());
        }
    }

    /// The composite PSI value for this report.
    pub fn psi_value(&self) -> f64 {
        self.scores.psi_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> serde_json::Value {
        serde_json::json!({
            "scores": {"presence": 7, "skill": 8, "intent": 6},
            "player_evaluation": "Composed under pressure.",
            "player_strengths": ["Deep clears"],
            "player_weaknesses": ["Late to net"],
            "actions_strengths": ["Keep clear depth"],
            "actions_weaknesses": ["Net rush drills"],
            "course_forward": "Three net sessions weekly.",
            "summary_bullets": ["Solid base"]
        })
    }

    #[test]
    fn from_normalized_accepts_valid_payload() {
        let report = PsiReport::from_normalized(sample_payload()).unwrap();
        assert_eq!(report.scores.skill, 8);
        assert_eq!(report.player_strengths, vec!["Deep clears"]);
    }

    #[test]
    fn from_normalized_rejects_non_object_scores() {
        let mut payload = sample_payload();
        payload["scores"] = serde_json::json!("not an object");
        let err = PsiReport::from_normalized(payload).unwrap_err();
        assert!(matches!(err, ReportValidationError::Shape(_)));
    }

    #[test]
    fn from_normalized_rejects_missing_required_narrative() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("player_evaluation");
        assert!(PsiReport::from_normalized(payload).is_err());
    }

    #[test]
    fn list_fields_default_to_empty() {
        let payload = serde_json::json!({
            "scores": {"presence": 5, "skill": 5, "intent": 5},
            "player_evaluation": "x",
            "course_forward": "y"
        });
        let report = PsiReport::from_normalized(payload).unwrap();
        assert!(report.player_strengths.is_empty());
        assert!(report.summary_bullets.is_empty());
    }

    #[test]
    fn validate_rejects_out_of_range_score() {
        let mut report = PsiReport::from_normalized(sample_payload()).unwrap();
        report.scores.skill = 14;
        assert!(report.validate().is_err());
    }

    #[test]
    fn ensure_psi_backfills_once() {
        let mut report = PsiReport::from_normalized(sample_payload()).unwrap();
        assert!(report.scores.psi.is_none());
        report.ensure_psi();
        // 8*0.45 + 7*0.25 + 6*0.30 = 3.6 + 1.75 + 1.8 = 7.15 -> 7.2
        assert_eq!(report.scores.psi, Some(7.2));

        // A supplied value is never overwritten.
        report.scores.psi = Some(9.0);
        report.ensure_psi();
        assert_eq!(report.scores.psi, Some(9.0));
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = PsiReport::from_normalized(sample_payload()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        let back = PsiReport::from_normalized(json).unwrap();
        assert_eq!(report, back);
    }
}
