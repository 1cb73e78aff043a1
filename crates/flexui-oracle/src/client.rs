//! HTTP oracle over an OpenAI-compatible chat-completions endpoint

use crate::wire::{completions_url, ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use flexui_core::{Oracle, OracleError, OracleSettings};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Upstream error bodies are truncated to this many bytes
const MAX_ERROR_BODY: usize = 2048;

/// Chat-completions oracle
#[derive(Clone)]
pub struct ChatCompletionsOracle {
    client: reqwest::Client,
    settings: OracleSettings,
    endpoint: String,
    api_key: String,
}

impl fmt::Debug for ChatCompletionsOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletionsOracle")
            .field("endpoint", &self.endpoint)
            .field("model", &self.settings.model)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionsOracle {
    /// Create oracle with an explicit key
    ///
    /// # Errors
    /// Returns [`OracleError::Transport`] if the HTTP client cannot be built
    pub fn new(settings: OracleSettings, api_key: impl Into<String>) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(OracleError::transport)?;
        Ok(Self {
            client,
            endpoint: completions_url(&settings.base_url),
            settings,
            api_key: api_key.into(),
        })
    }

    /// Create oracle reading the key from `settings.api_key_env`
    ///
    /// # Errors
    /// Returns [`OracleError::MissingCredentials`] if the variable is unset
    /// or blank
    pub fn from_settings(settings: &OracleSettings) -> Result<Self, OracleError> {
        let api_key = settings
            .api_key()
            .ok_or_else(|| OracleError::MissingCredentials(settings.api_key_env.clone()))?;
        Self::new(settings.clone(), api_key)
    }

    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, err: &reqwest::Error) -> OracleError {
        if err.is_timeout() {
            OracleError::Timeout(self.settings.timeout_secs)
        } else {
            OracleError::transport(err)
        }
    }
}

#[async_trait]
impl Oracle for ChatCompletionsOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let body = ChatCompletionRequest::single_turn(&self.settings, prompt);
        debug!(endpoint = %self.endpoint, model = %self.settings.model, "sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(OracleError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| self.map_send_error(&e))?;
        let content = parsed.into_content().ok_or(OracleError::EmptyResponse)?;
        debug!(reply_len = content.len(), "completion received");
        Ok(content)
    }
}
