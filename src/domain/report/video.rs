//! The validated shape of a video-analysis report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::evaluation::GameFormat;
use crate::domain::scoring::{Scores, SCORE_MAX, SCORE_MIN};

use super::schema::ReportValidationError;

/// A narrative analysis section: named metric -> free-text observation.
///
/// These are narrative, not scored; no numeric bounds apply. A BTreeMap keeps
/// serialization order stable so persisted reports diff cleanly.
pub type NarrativeSection = BTreeMap<String, String>;

/// Doubles-only team performance observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamPerformance {
    #[serde(default)]
    pub coordination_rotation: Option<String>,
    #[serde(default)]
    pub court_coverage_split: Option<String>,
    #[serde(default)]
    pub communication_indicators: Option<String>,
    /// Teamwork composite, independent of either player's PSI.
    #[serde(default)]
    pub synergy_score: Option<i32>,
}

/// A PSI report derived from recorded video.
///
/// Superset of the text report: the same scores and narrative fields plus
/// three narrative analysis sections, and, for doubles sessions, team
/// performance and the partner_* field group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysisReport {
    pub scores: Scores,
    #[serde(default)]
    pub technical_analysis: NarrativeSection,
    #[serde(default)]
    pub movement_footwork: NarrativeSection,
    #[serde(default)]
    pub tactical_insights: NarrativeSection,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_performance: Option<TeamPerformance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_scores: Option<Scores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_evaluation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_strengths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_weaknesses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_actions_strengths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_actions_weaknesses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_course_forward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_summary_bullets: Option<Vec<String>>,
}

impl VideoAnalysisReport {
    /// Deserializes a normalized payload into a report.
    pub fn from_normalized(payload: serde_json::Value) -> Result<Self, ReportValidationError> {
        serde_json::from_value(payload).map_err(|e| ReportValidationError::Shape(e.to_string()))
    }

    /// True when the doubles-only partner group is populated.
    pub fn has_partner_group(&self) -> bool {
        self.partner_scores.is_some()
    }

    /// Strict schema validation against the session's game format.
    ///
    /// Component scores (partner's too, when present) must be in range, the
    /// synergy score must be in range when supplied, and the partner group
    /// must be present exactly when the session is doubles.
    pub fn validate(&self, game_format: GameFormat) -> Result<(), ReportValidationError> {
        self.scores.validate()?;
        if let Some(partner_scores) = &self.partner_scores {
            partner_scores.validate()?;
        }
        if let Some(team) = &self.team_performance {
            if let Some(synergy) = team.synergy_score {
                if !(SCORE_MIN..=SCORE_MAX).contains(&synergy) {
                    return Err(ReportValidationError::SynergyOutOfRange { actual: synergy });
                }
            }
        }
        match (game_format.is_doubles(), self.has_partner_group()) {
            (true, false) => Err(ReportValidationError::MissingPartnerGroup),
            (false, true) => Err(ReportValidationError::UnexpectedPartnerGroup),
            _ => Ok(()),
        }
    }

    /// Fills in the derived `psi` fields when the LLM did not supply them.
    pub fn ensure_psi(&mut self) {
        if self.scores.psi.is_none() {
            self.scores.psi = Some(self.scores.weighted_psi());
        }
        if let Some(partner_scores) = &mut self.partner_scores {
            if partner_scores.psi.is_none() {
                partner_scores.psi = Some(partner_scores.weighted_psi());
            }
        }
    }

    /// The composite PSI value for the primary player.
    pub fn psi_value(&self) -> f64 {
        self.scores.psi_value()
    }
}
