//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is loaded
//! with the `PSI_COACH_` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use psi_coach::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! if config.llm.is_configured() {
//!     println!("Using model {}", config.llm.model);
//! }
//! ```

mod error;
mod llm;

pub use error::{ConfigError, ValidationError};
pub use llm::LlmConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// LLM provider configuration (Gemini)
    #[serde(default)]
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PSI_COACH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PSI_COACH__LLM__API_KEY=...` -> `llm.api_key = ...`
    /// - `PSI_COACH__LLM__MODEL=gemini-1.5-pro` -> `llm.model = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PSI_COACH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.llm.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("PSI_COACH__LLM__API_KEY");
        env::remove_var("PSI_COACH__LLM__MODEL");
        env::remove_var("PSI_COACH__LLM__TIMEOUT_SECS");
    }

    #[test]
    fn test_load_with_no_variables_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(!config.llm.is_configured());
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("PSI_COACH__LLM__API_KEY", "key-123");
        env::set_var("PSI_COACH__LLM__MODEL", "gemini-1.5-pro");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(config.llm.is_configured());
        assert_eq!(config.llm.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_custom_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("PSI_COACH__LLM__TIMEOUT_SECS", "30");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.llm.timeout_secs, 30);
    }
}
