//! Domain layer - the PSI report model and its pure pipeline stages.

pub mod evaluation;
pub mod report;
pub mod scoring;
