//! LLM Provider Port - Interface for generative model integrations.
//!
//! This port abstracts the generative model used to draft PSI reports,
//! so the report pipeline never couples to a specific vendor SDK. The
//! response shape mirrors the candidates/content/parts structure that
//! generation APIs return, and [`GenerationResponse::extract_text`]
//! walks both the direct-text and the candidate shapes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for LLM text generation.
///
/// Implementations connect to an external generation service and translate
/// between the provider-specific API and our domain types.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate content for a single prompt.
    ///
    /// One attempt per call; the report pipeline treats any error as a
    /// signal to fall back, so implementations should not retry internally.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for LLM generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// The full prompt text.
    pub prompt: String,
    /// Temperature for response randomness.
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    pub max_output_tokens: Option<u32>,
    /// MIME type the model should respond with (e.g. "application/json").
    pub response_mime_type: Option<String>,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_output_tokens: None,
            response_mime_type: None,
        }
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the maximum output tokens.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    /// Requests a JSON response from the model.
    pub fn with_json_response(mut self) -> Self {
        self.response_mime_type = Some("application/json".to_string());
        self
    }
}

/// Response from LLM generation.
///
/// Providers either fill `text` directly or return one or more candidates
/// whose content parts carry the text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Direct text content, when the provider exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Generation candidates, best first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
}

/// A single generation candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The candidate's content, absent when generation produced nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CandidateContent>,
}

/// Content of a candidate, made up of ordered parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<ContentPart>,
}

/// One part of candidate content. Only textual parts carry report data;
/// other kinds deserialize with `text: None` and are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl GenerationResponse {
    /// Creates a response carrying direct text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            candidates: Vec::new(),
        }
    }

    /// Creates a response carrying a single one-part candidate.
    pub fn from_candidate_text(text: impl Into<String>) -> Self {
        Self {
            text: None,
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![ContentPart {
                        text: Some(text.into()),
                    }],
                }),
            }],
        }
    }

    /// Extracts the generated text.
    ///
    /// Prefers the direct `text` field when non-empty, otherwise walks the
    /// candidates in order and concatenates the textual parts of the first
    /// candidate that has any. Errors when no text exists anywhere.
    pub fn extract_text(&self) -> Result<String, LlmError> {
        if let Some(text) = &self.text {
            if !text.is_empty() {
                return Ok(text.clone());
            }
        }

        for candidate in &self.candidates {
            let Some(content) = &candidate.content else {
                continue;
            };
            let texts: Vec<&str> = content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .filter(|t| !t.is_empty())
                .collect();
            if !texts.is_empty() {
                return Ok(texts.concat());
            }
        }

        Err(LlmError::parse("unable to extract text from response"))
    }
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini").
    pub name: String,
    /// Model identifier (e.g., "gemini-1.5-flash").
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The prompt or response was blocked by the provider's safety layer.
    #[error("blocked: {reason}")]
    Blocked {
        /// Block reason reported by the provider.
        reason: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,
}

impl LlmError {
    /// Creates a blocked error.
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::Blocked {
            reason: reason.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true when the error came from the provider's safety layer
    /// rather than from infrastructure.
    pub fn is_blocked(&self) -> bool {
        matches!(self, LlmError::Blocked { .. })
    }
}
