//! Mock LLM Provider for testing.
//!
//! Provides a configurable mock implementation of the LlmProvider port,
//! allowing the report pipeline to be tested without calling a real API.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockLlmProvider::new()
//!     .with_text(r#"{"scores": {"presence": 8, "skill": 7, "intent": 9}}"#);
//!
//! let response = provider.generate(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{
    GenerationRequest, GenerationResponse, LlmError, LlmProvider, ProviderInfo,
};

/// Mock LLM provider for testing.
///
/// Configurable to return specific responses or inject errors, consumed in
/// order. Records every request for verification.
#[derive(Debug, Clone, Default)]
pub struct MockLlmProvider {
    /// Pre-configured replies (consumed in order).
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

/// A configured mock reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return a successful response.
    Success(GenerationResponse),
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate a safety block.
    Blocked { reason: String },
    /// Simulate a network error.
    Network { message: String },
    /// Simulate a timeout.
    Timeout { timeout_secs: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
}

impl From<MockError> for LlmError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Blocked { reason } => LlmError::blocked(reason),
            MockError::Network { message } => LlmError::network(message),
            MockError::Timeout { timeout_secs } => LlmError::Timeout { timeout_secs },
            MockError::Unavailable { message } => LlmError::unavailable(message),
            MockError::AuthenticationFailed => LlmError::AuthenticationFailed,
        }
    }
}

impl MockLlmProvider {
    /// Creates a new mock provider with no configured replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response carrying the given text as a candidate.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_response(GenerationResponse::from_candidate_text(text))
    }

    /// Queues a full response.
    pub fn with_response(self, response: GenerationResponse) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Success(response));
        self
    }

    /// Queues an error reply.
    pub fn with_error(self, error: MockError) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Error(error));
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Gets the next reply or a default success.
    fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                MockReply::Success(GenerationResponse::from_text("Mock response"))
            })
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        self.calls.lock().unwrap().push(request);

        match self.next_reply() {
            MockReply::Success(response) => Ok(response),
            MockReply::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model-1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest::new("prompt")
    }

    #[tokio::test]
    async fn returns_configured_text() {
        let provider = MockLlmProvider::new().with_text("configured");

        let response = provider.generate(request()).await.unwrap();
        assert_eq!(response.extract_text().unwrap(), "configured");
    }

    #[tokio::test]
    async fn returns_replies_in_order() {
        let provider = MockLlmProvider::new().with_text("first").with_text("second");

        let r1 = provider.generate(request()).await.unwrap();
        let r2 = provider.generate(request()).await.unwrap();

        assert_eq!(r1.extract_text().unwrap(), "first");
        assert_eq!(r2.extract_text().unwrap(), "second");
    }

    #[tokio::test]
    async fn returns_default_after_exhausted() {
        let provider = MockLlmProvider::new();
        let response = provider.generate(request()).await.unwrap();
        assert_eq!(response.extract_text().unwrap(), "Mock response");
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let provider = MockLlmProvider::new().with_error(MockError::Blocked {
            reason: "SAFETY".to_string(),
        });

        let err = provider.generate(request()).await.unwrap_err();
        assert!(err.is_blocked());
    }

    #[tokio::test]
    async fn records_calls() {
        let provider = MockLlmProvider::new().with_text("a").with_text("b");

        assert_eq!(provider.call_count(), 0);
        provider.generate(GenerationRequest::new("one")).await.unwrap();
        provider.generate(GenerationRequest::new("two")).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        let calls = provider.get_calls();
        assert_eq!(calls[0].prompt, "one");
        assert_eq!(calls[1].prompt, "two");
    }

    #[test]
    fn mock_error_converts_to_llm_error() {
        let err: LlmError = MockError::Timeout { timeout_secs: 30 }.into();
        assert!(matches!(err, LlmError::Timeout { timeout_secs: 30 }));

        let err: LlmError = MockError::AuthenticationFailed.into();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }
}
