//! Ollama API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use gbench_core::{Error, LlmProvider, Result};

use crate::config::OllamaConfig;

/// Timeout for the lightweight tags endpoint used by health checks and
/// model listings.
const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal Ollama API client for LLM inference.
///
/// Cheap to clone; the underlying HTTP client is shared.
#[derive(Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    /// Create a new client from configuration.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/{endpoint}", self.config.host.trim_end_matches('/'))
    }

    /// Generate a text completion from Ollama.
    ///
    /// Connection failures are retried up to the configured maximum with
    /// exponential backoff (1s, 2s, 4s, ...). Timeouts are not retried; they
    /// surface immediately. A successful but empty generation is an error,
    /// not an empty string.
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        temperature: f32,
    ) -> Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            system: system.map(str::to_string),
            stream: false,
            options: GenerateOptions { temperature },
        };
        let url = self.api_url("generate");

        for attempt in 0..self.config.max_retries {
            debug!(
                "ollama request (attempt {}/{})",
                attempt + 1,
                self.config.max_retries
            );

            let sent = self
                .client
                .post(&url)
                .timeout(self.config.timeout)
                .json(&request)
                .send()
                .await;

            let response = match sent {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    warn!("ollama request timed out: {e}");
                    return Err(Error::Timeout(format!(
                        "ollama request timed out after {}s",
                        self.config.timeout.as_secs()
                    )));
                }
                Err(e) if e.is_connect() => {
                    warn!("ollama connection failed: {e}");
                    if attempt + 1 < self.config.max_retries {
                        tokio::time::sleep(Duration::from_secs(1 << attempt)).await;
                        continue;
                    }
                    return Err(Error::Connection(format!(
                        "cannot connect to Ollama at {}. Ensure Ollama is running: 'ollama serve'",
                        self.config.host
                    )));
                }
                Err(e) => {
                    error!("ollama request failed: {e}");
                    return Err(Error::Backend(format!("ollama request failed: {e}")));
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(Error::Backend(format!(
                    "ollama request failed with status {status}: {body}"
                )));
            }

            let parsed: GenerateResponse = response
                .json()
                .await
                .map_err(|e| Error::Backend(format!("invalid response from ollama: {e}")))?;

            let generated = parsed.response.trim();
            if generated.is_empty() {
                return Err(Error::EmptyResponse);
            }

            debug!("ollama generated {} chars", generated.chars().count());
            return Ok(generated.to_string());
        }

        Err(Error::Backend("max retries exceeded".to_string()))
    }

    /// Check whether the Ollama server is reachable and the configured
    /// model is available.
    ///
    /// Never raises; any failure comes back as `false` so callers can offer
    /// a recovery path ("ollama pull ...") instead of an error trace.
    pub async fn check_health(&self) -> bool {
        let models = match self.fetch_models().await {
            Ok(models) => models,
            Err(e) => {
                error!("ollama health check failed: {e}");
                return false;
            }
        };

        if !model_available(&self.config.model, &models) {
            warn!(
                "model '{}' not found, available: {:?}",
                self.config.model, models
            );
            return false;
        }

        debug!("ollama health check passed (model: {})", self.config.model);
        true
    }

    /// List the models the server reports as available. Empty on any
    /// failure.
    pub async fn list_models(&self) -> Vec<String> {
        match self.fetch_models().await {
            Ok(models) => models,
            Err(e) => {
                error!("failed to list models: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.api_url("tags"))
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    Error::Connection(format!(
                        "cannot connect to Ollama at {}",
                        self.config.host
                    ))
                } else if e.is_timeout() {
                    Error::Timeout("ollama tags request timed out".to_string())
                } else {
                    Error::Backend(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(Error::Backend(format!(
                "ollama tags request failed with status {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| Error::Backend(format!("invalid tags response: {e}")))?;

        Ok(tags.models.into_iter().map(|tag| tag.name).collect())
    }
}

/// Whether `requested` is satisfied by one of the `available` model names.
///
/// A model counts as found on an exact match, or when an available name
/// shares the base name before the version/tag delimiter (requesting
/// `llama3.2:latest` is satisfied by `llama3.2`). The prefix check is
/// deliberately loose and can match unrelated models sharing a prefix; see
/// the tests.
pub(crate) fn model_available(requested: &str, available: &[String]) -> bool {
    let base = requested.split(':').next().unwrap_or(requested);
    available
        .iter()
        .any(|name| name == requested || name.starts_with(base))
}

#[async_trait]
impl LlmProvider for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        temperature: f32,
    ) -> Result<String> {
        OllamaClient::generate(self, prompt, system, temperature).await
    }

    async fn check_health(&self) -> bool {
        OllamaClient::check_health(self).await
    }

    async fn list_models(&self) -> Vec<String> {
        OllamaClient::list_models(self).await
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}
