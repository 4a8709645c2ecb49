//! PSI report pipeline.
//!
//! The report types, the normalization of untrusted LLM payloads into those
//! types, the JSON recovery ladder for the video pipeline, the deterministic
//! fallback estimator, and the text renderer.

mod fallback;
mod normalizer;
mod recovery;
mod renderer;
mod schema;
mod video;

pub use fallback::{fallback_report, fallback_scores, fallback_video_report};
pub use normalizer::{normalize_payload, normalize_video_payload};
pub use recovery::{recover_video_payload, RecoveryRung};
pub use renderer::{ensure_items, render_text, truncate_words};
pub use schema::{PsiReport, ReportValidationError};
pub use video::{NarrativeSection, TeamPerformance, VideoAnalysisReport};
