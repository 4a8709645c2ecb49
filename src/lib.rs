//! PSI Coach - Automated badminton performance reports
//!
//! This crate turns coach-entered evaluation notes into a validated
//! Presence/Skill/Intent (PSI) performance report by calling an LLM provider,
//! with a deterministic local fallback when the provider is unavailable or
//! returns output that cannot be recovered.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
