//! Ports - Interfaces between the report pipeline and the outside world.
//!
//! The single port here is the LLM provider the report generator calls.
//! Adapters in `crate::adapters` implement it for concrete services.

mod llm;

pub use llm::{
    Candidate, CandidateContent, ContentPart, GenerationRequest, GenerationResponse, LlmError,
    LlmProvider, ProviderInfo,
};
