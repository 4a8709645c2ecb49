//! Report generation orchestrator.
//!
//! Drives prompt construction, the single LLM attempt, payload normalization,
//! validation, and the deterministic fallback. Both entry points are
//! infallible: every failure mode ends in a fallback report, with the reason
//! carried into the narrative text only, never into the scores.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::evaluation::{EvaluationInput, GameFormat, PlayerProfile, VideoSession};
use crate::domain::report::{
    fallback_report, fallback_video_report, normalize_payload, normalize_video_payload,
    recover_video_payload, PsiReport, VideoAnalysisReport,
};
use crate::ports::{GenerationRequest, LlmError, LlmProvider, ProviderInfo};

use super::prompt;

/// Generation settings for the video pipeline, matching the original
/// deployment's tuning.
const VIDEO_TEMPERATURE: f64 = 0.4;
const VIDEO_MAX_OUTPUT_TOKENS: u32 = 8192;

/// Outcome of one LLM invocation, before any JSON handling.
///
/// Every branch is explicit so the generator matches exhaustively instead of
/// funneling unlike failures through one catch-all error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmOutcome {
    /// The provider returned extractable text.
    Success(String),
    /// The provider's safety layer blocked the prompt or response.
    Blocked(String),
    /// Transport or provider failure (network, timeout, auth, unavailable).
    Transport(String),
    /// The provider answered but no text could be extracted.
    Unparseable(String),
}

/// Orchestrates PSI report generation.
///
/// Stateless between calls. Constructed with an explicit provider, or with
/// none at all, in which case every report is the deterministic fallback.
pub struct ReportGenerator {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl ReportGenerator {
    /// Creates a generator backed by the given provider.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Creates a generator with no provider; all reports come from the
    /// fallback estimator.
    pub fn without_provider() -> Self {
        Self { provider: None }
    }

    /// Provider information, when a provider is configured.
    pub fn provider_info(&self) -> Option<ProviderInfo> {
        self.provider.as_ref().map(|p| p.provider_info())
    }

    /// Generates a PSI report from coach-entered session notes.
    ///
    /// Never fails: any provider, decode, or validation problem yields the
    /// fallback report, with the failure reason appended to its evaluation
    /// text.
    pub async fn generate_report(
        &self,
        evaluation: &EvaluationInput,
        player: Option<&PlayerProfile>,
    ) -> PsiReport {
        let prompt = prompt::text_report_prompt(evaluation, player);

        let Some(provider) = &self.provider else {
            warn!("no LLM provider configured, using fallback report");
            return fallback_report(evaluation, None);
        };

        let text = match self
            .invoke(provider.as_ref(), GenerationRequest::new(prompt))
            .await
        {
            LlmOutcome::Success(text) => text,
            LlmOutcome::Blocked(reason) => {
                warn!(%reason, "prompt blocked, using fallback report");
                return fallback_report(evaluation, Some(&format!("blocked: {reason}")));
            }
            LlmOutcome::Transport(reason) => {
                warn!(%reason, "LLM request failed, using fallback report");
                return fallback_report(evaluation, Some(&reason));
            }
            LlmOutcome::Unparseable(reason) => {
                warn!(%reason, "LLM response had no text, using fallback report");
                return fallback_report(evaluation, Some(&reason));
            }
        };

        let payload: Value = match serde_json::from_str(&text) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "LLM response was not valid JSON, using fallback report");
                return fallback_report(evaluation, Some(&err.to_string()));
            }
        };

        let normalized = normalize_payload(payload, evaluation);
        let mut report = match PsiReport::from_normalized(normalized) {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "normalized payload did not fit the report schema");
                return fallback_report(evaluation, Some(&err.to_string()));
            }
        };

        if let Err(err) = report.validate() {
            warn!(error = %err, "report failed validation, using fallback report");
            return fallback_report(evaluation, Some(&err.to_string()));
        }

        report.ensure_psi();
        debug!("text report generated from LLM response");
        report
    }

    /// Generates a video analysis report for a recorded session.
    ///
    /// The doubles prompt and the partner field group apply only when the
    /// session is doubles AND a partner profile is supplied; otherwise the
    /// report stays singles-shaped. Malformed LLM output goes through the
    /// recovery ladder before the canned fallback is declared.
    pub async fn generate_video_report(
        &self,
        session: &VideoSession,
        player: &PlayerProfile,
        partner: Option<&PlayerProfile>,
    ) -> VideoAnalysisReport {
        let effective_format = match partner {
            Some(_) if session.game_format.is_doubles() => GameFormat::Doubles,
            _ => GameFormat::Singles,
        };
        let prompt = match (effective_format, partner) {
            (GameFormat::Doubles, Some(partner)) => {
                prompt::video_doubles_prompt(session, player, partner)
            }
            _ => prompt::video_singles_prompt(session, player),
        };

        let Some(provider) = &self.provider else {
            warn!("no LLM provider configured, using fallback video report");
            return fallback_video_report(session, player, partner);
        };

        let request = GenerationRequest::new(prompt)
            .with_temperature(VIDEO_TEMPERATURE)
            .with_max_output_tokens(VIDEO_MAX_OUTPUT_TOKENS)
            .with_json_response();

        let text = match self.invoke(provider.as_ref(), request).await {
            LlmOutcome::Success(text) => text,
            LlmOutcome::Blocked(reason) => {
                warn!(%reason, "video prompt blocked, using fallback video report");
                return fallback_video_report(session, player, partner);
            }
            LlmOutcome::Transport(reason) => {
                warn!(%reason, "video LLM request failed, using fallback video report");
                return fallback_video_report(session, player, partner);
            }
            LlmOutcome::Unparseable(reason) => {
                warn!(%reason, "video LLM response had no text, using fallback video report");
                return fallback_video_report(session, player, partner);
            }
        };

        let (payload, rung) = recover_video_payload(&text, effective_format);
        debug!(?rung, "video payload recovered");

        let normalized = normalize_video_payload(payload, effective_format);
        let mut report = match VideoAnalysisReport::from_normalized(normalized) {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "video payload did not fit the report schema");
                return fallback_video_report(session, player, partner);
            }
        };

        if let Err(err) = report.validate(effective_format) {
            warn!(error = %err, "video report failed validation, using fallback video report");
            return fallback_video_report(session, player, partner);
        }

        report.ensure_psi();
        report
    }

    /// One provider attempt, classified into an explicit outcome.
    async fn invoke(&self, provider: &dyn LlmProvider, request: GenerationRequest) -> LlmOutcome {
        match provider.generate(request).await {
            Ok(response) => match response.extract_text() {
                Ok(text) => LlmOutcome::Success(text),
                Err(err) => LlmOutcome::Unparseable(err.to_string()),
            },
            Err(LlmError::Blocked { reason }) => LlmOutcome::Blocked(reason),
            Err(err) => LlmOutcome::Transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::llm::{MockError, MockLlmProvider};

    fn generator_with(provider: MockLlmProvider) -> ReportGenerator {
        ReportGenerator::new(Arc::new(provider))
    }

    fn evaluation() -> EvaluationInput {
        EvaluationInput::new()
            .with_note(crate::domain::evaluation::NoteField::Presence, "8")
            .with_note(crate::domain::evaluation::NoteField::Intent, "6")
    }

    const GOOD_TEXT_PAYLOAD: &str = r#"{
        "scores": {"presence": 8, "skill": 6, "intent": 7},
        "player_evaluation": "Composed throughout the session.",
        "player_strengths": ["Deep clears"],
        "player_weaknesses": ["Late recovery"],
        "actions_strengths": ["Keep clear depth"],
        "actions_weaknesses": ["Footwork drills"],
        "course_forward": "Three sessions per week.",
        "summary_bullets": ["One", "Two", "Three", "Four", "Five"]
    }"#;

    #[tokio::test]
    async fn success_path_backfills_psi() {
        let generator = generator_with(MockLlmProvider::new().with_text(GOOD_TEXT_PAYLOAD));
        let report = generator.generate_report(&evaluation(), None).await;

        assert_eq!(report.scores.presence, 8);
        assert_eq!(report.scores.skill, 6);
        assert_eq!(report.scores.intent, 7);
        assert_eq!(report.scores.psi, Some(6.8));
        assert_eq!(report.player_evaluation, "Composed throughout the session.");
    }

    #[tokio::test]
    async fn no_provider_yields_fallback_without_reason() {
        let generator = ReportGenerator::without_provider();
        let report = generator.generate_report(&evaluation(), None).await;

        assert!(report
            .player_evaluation
            .starts_with("AI service unavailable."));
        assert!(!report.player_evaluation.contains("Reason"));
        // Note-derived scores: presence 8, skill default 5, intent 6.
        assert_eq!(report.scores.presence, 8);
        assert_eq!(report.scores.skill, 5);
        assert_eq!(report.scores.intent, 6);
        assert_eq!(report.scores.psi, Some(6.1));
    }

    #[tokio::test]
    async fn transport_failure_reason_reaches_narrative_only() {
        let generator = generator_with(MockLlmProvider::new().with_error(MockError::Network {
            message: "connection reset".to_string(),
        }));
        let report = generator.generate_report(&evaluation(), None).await;

        assert!(report.player_evaluation.contains("connection reset"));
        // Scores come from the notes, never from the reason string.
        assert_eq!(report.scores.presence, 8);
    }

    #[tokio::test]
    async fn blocked_prompt_yields_fallback() {
        let generator = generator_with(MockLlmProvider::new().with_error(MockError::Blocked {
            reason: "SAFETY".to_string(),
        }));
        let report = generator.generate_report(&evaluation(), None).await;

        assert!(report.player_evaluation.contains("blocked: SAFETY"));
    }

    #[tokio::test]
    async fn invalid_json_yields_fallback() {
        let generator = generator_with(MockLlmProvider::new().with_text("not json at all"));
        let report = generator.generate_report(&evaluation(), None).await;

        assert!(report
            .player_evaluation
            .starts_with("AI service unavailable."));
    }

    #[tokio::test]
    async fn out_of_range_scores_fail_validation_and_fall_back() {
        let payload = r#"{
            "scores": {"presence": 14, "skill": 6, "intent": 7},
            "player_evaluation": "x",
            "course_forward": "y"
        }"#;
        let generator = generator_with(MockLlmProvider::new().with_text(payload));
        let report = generator.generate_report(&evaluation(), None).await;

        // Normalization does not clamp; 14 is rejected downstream.
        assert!(report
            .player_evaluation
            .starts_with("AI service unavailable."));
        assert_eq!(report.scores.presence, 8);
    }

    #[tokio::test]
    async fn video_report_uses_recovery_ladder_for_fenced_json() {
        let fenced = format!(
            "```json\n{}\n```",
            r#"{"scores": {"presence": 7, "skill": 8, "intent": 7, "psi": 7.5},
                "player_evaluation": "Strong session."}"#
        );
        let generator = generator_with(MockLlmProvider::new().with_text(fenced));
        let session = VideoSession::new(GameFormat::Singles);
        let player = PlayerProfile::new("Mei", "advanced", "female");

        let report = generator.generate_video_report(&session, &player, None).await;
        assert_eq!(report.scores.presence, 7);
        assert_eq!(report.scores.skill, 8);
        assert_eq!(report.player_evaluation, "Strong session.");
        assert!(!report.has_partner_group());
    }

    #[tokio::test]
    async fn video_doubles_without_partner_profile_stays_singles_shaped() {
        let generator = ReportGenerator::without_provider();
        let session = VideoSession::new(GameFormat::Doubles);
        let player = PlayerProfile::new("Mei", "advanced", "female");

        let report = generator.generate_video_report(&session, &player, None).await;
        assert!(!report.has_partner_group());
        assert!(report.team_performance.is_none());
    }

    #[tokio::test]
    async fn video_request_carries_generation_settings() {
        let provider = MockLlmProvider::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        });
        let generator = ReportGenerator::new(Arc::new(provider.clone()));
        let session = VideoSession::new(GameFormat::Singles);
        let player = PlayerProfile::default();

        generator.generate_video_report(&session, &player, None).await;

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, Some(VIDEO_TEMPERATURE));
        assert_eq!(calls[0].max_output_tokens, Some(VIDEO_MAX_OUTPUT_TOKENS));
        assert_eq!(
            calls[0].response_mime_type.as_deref(),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn single_attempt_no_retry() {
        let provider = MockLlmProvider::new().with_error(MockError::Network {
            message: "flaky".to_string(),
        });
        let generator = ReportGenerator::new(Arc::new(provider.clone()));

        generator.generate_report(&evaluation(), None).await;
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn prompt_reaches_provider_with_player_details() {
        let provider = MockLlmProvider::new().with_text(GOOD_TEXT_PAYLOAD);
        let generator = ReportGenerator::new(Arc::new(provider.clone()));
        let player = PlayerProfile::new("Mei", "advanced", "female");

        generator.generate_report(&evaluation(), Some(&player)).await;

        let calls = provider.get_calls();
        assert!(calls[0].prompt.contains("Athlete: Mei"));
        assert!(calls[0].prompt.contains("- Presence: 8"));
    }
}
