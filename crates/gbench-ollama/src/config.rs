//! Ollama configuration

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the Ollama client.
///
/// Everything the client needs is carried here explicitly, so tests and
/// callers can inject their own values instead of relying on ambient
/// constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the Ollama API.
    pub host: String,
    /// Model name used for generation.
    pub model: String,
    /// Per-request timeout for generation calls.
    pub timeout: Duration,
    /// Attempts made for a generation call before giving up on connection
    /// failures.
    pub max_retries: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "llama3.2:latest".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }
}

impl OllamaConfig {
    /// Create configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let host = env::var("OLLAMA_HOST").unwrap_or(defaults.host);
        let model = env::var("OLLAMA_MODEL").unwrap_or(defaults.model);

        Self {
            host,
            model,
            ..defaults
        }
    }

    /// Set the API host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the model used for generation.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of generation attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}
