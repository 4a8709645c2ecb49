//! Adapters - Concrete implementations of the ports.

pub mod llm;
