//! LLM provider trait

use async_trait::async_trait;

use crate::Result;

/// Interface between the evaluation loop and an inference backend.
///
/// The analyzer and optimizer are generic over this trait so tests can run
/// the whole loop against a scripted fake without a network in sight.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for `prompt`, optionally steered by a system
    /// prompt, at the given sampling temperature.
    ///
    /// Returns the non-empty generated text, or an error with a distinct
    /// kind for connection, timeout, and backend failures.
    async fn generate(&self, prompt: &str, system: Option<&str>, temperature: f32) -> Result<String>;

    /// Whether the backend is reachable and the configured model is present.
    ///
    /// Never raises; failures come back as `false` so callers can offer a
    /// recovery path instead of a stack trace.
    async fn check_health(&self) -> bool;

    /// Names of the models the backend reports as available. Empty on any
    /// failure.
    async fn list_models(&self) -> Vec<String>;

    /// The model this provider generates with.
    fn model_id(&self) -> &str;
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A scripted in-memory provider for exercising the loop in tests.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::{Error, Result};

    use super::LlmProvider;

    /// Replays a fixed sequence of generation outcomes, then falls back to a
    /// default response if one was set.
    #[derive(Clone, Default)]
    pub struct ScriptedProvider {
        script: Arc<Mutex<VecDeque<Result<String>>>>,
        fallback: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedProvider {
        /// Provider that answers every call with the same text.
        pub fn with_response(response: &str) -> Self {
            Self {
                fallback: Some(response.to_string()),
                ..Self::default()
            }
        }

        /// Provider that replays `responses` in order and panics past the end.
        pub fn with_sequence(responses: Vec<Result<String>>) -> Self {
            Self {
                script: Arc::new(Mutex::new(responses.into())),
                fallback: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(
            &self,
            _prompt: &str,
            _system: Option<&str>,
            _temperature: f32,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(next) = self.script.lock().unwrap().pop_front() {
                return next;
            }
            match &self.fallback {
                Some(text) => Ok(text.clone()),
                None => Err(Error::Backend("scripted provider ran out of responses".into())),
            }
        }

        async fn check_health(&self) -> bool {
            true
        }

        async fn list_models(&self) -> Vec<String> {
            vec!["llama3.2:latest".to_string(), "qwen2.5:32b".to_string()]
        }

        fn model_id(&self) -> &str {
            "llama3.2:latest"
        }
    }
}
