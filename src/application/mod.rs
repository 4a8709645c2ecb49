//! Application layer - orchestration of the report pipeline.

mod generator;
mod prompt;

pub use generator::{LlmOutcome, ReportGenerator};
pub use prompt::{text_report_prompt, video_doubles_prompt, video_singles_prompt};
