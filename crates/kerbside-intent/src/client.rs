//! HTTP client for the Backboard assistant API.
//!
//! Three calls: create assistant (lazy, cached per client instance with
//! single-flight initialization), create conversation thread (not
//! retried), and send message (retried with bounded linear backoff).
//! The send call uses a form-encoded body per the Backboard message API.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::error::IntentError;
use crate::extract::shorten_error_text;

/// Connection settings for [`BackboardClient`], taken from the application
/// config.
#[derive(Debug, Clone)]
pub struct BackboardConfig {
    pub base_url: String,
    pub api_key: String,
    pub llm_provider: String,
    pub model_name: String,
    pub send_timeout_secs: u64,
    pub send_retries: u32,
    pub retry_backoff_secs: u64,
}

/// Client for the Backboard assistant API.
///
/// The assistant id is created on first use and cached for the lifetime of
/// the client; concurrent first calls are collapsed by the `OnceCell` so
/// the assistant is only ever created once per instance.
pub struct BackboardClient {
    client: Client,
    base_url: Url,
    api_key: String,
    llm_provider: String,
    model_name: String,
    send_retries: u32,
    retry_backoff_secs: u64,
    assistant_id: OnceCell<String>,
}

#[derive(Debug, Deserialize)]
struct AssistantResponse {
    #[serde(default)]
    assistant_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ThreadResponse {
    #[serde(default)]
    thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    content: Option<String>,
}

impl BackboardClient {
    /// Creates a client from config.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`IntentError::UnexpectedStatus`] if the
    /// base URL does not parse.
    pub fn new(config: &BackboardConfig) -> Result<Self, IntentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.send_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("kerbside/0.1 (intent resolver)")
            .build()?;

        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| IntentError::UnexpectedStatus {
            call: "configure",
            status: 0,
            body: format!("invalid base URL '{}': {e}", config.base_url),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            llm_provider: config.llm_provider.clone(),
            model_name: config.model_name.clone(),
            send_retries: config.send_retries,
            retry_backoff_secs: config.retry_backoff_secs,
            assistant_id: OnceCell::new(),
        })
    }

    /// Returns the cached assistant id, creating the assistant on first use.
    ///
    /// # Errors
    ///
    /// Creation failures are returned as-is and nothing is cached, so the
    /// next call retries from scratch.
    pub async fn ensure_assistant(&self) -> Result<&str, IntentError> {
        self.assistant_id
            .get_or_try_init(|| self.create_assistant())
            .await
            .map(String::as_str)
    }

    async fn create_assistant(&self) -> Result<String, IntentError> {
        let url = self.endpoint(&["assistants"]);
        let payload = serde_json::json!({
            "name": "Kerbside AI Search",
            "description": "Parse natural language parking/search requests into strict JSON for an accessibility parking locator.",
            "llm_provider": self.llm_provider,
            "llm_model_name": self.model_name,
            "tools": [],
        });

        let response = self
            .client
            .post(url)
            .header("X-API-Key", &self.api_key)
            .json(&payload)
            .send()
            .await?;
        let body: AssistantResponse = Self::check_created("create assistant", response).await?;

        body.assistant_id
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .ok_or(IntentError::MissingField {
                call: "create assistant",
                field: "assistant_id",
            })
    }

    /// Creates a conversation thread under the assistant. Never retried:
    /// a failure here fails the whole resolution attempt.
    ///
    /// # Errors
    ///
    /// [`IntentError::UnexpectedStatus`] for non-2xx answers,
    /// [`IntentError::MissingField`] when the id is absent.
    pub async fn create_thread(&self, assistant_id: &str) -> Result<String, IntentError> {
        let url = self.endpoint(&["assistants", assistant_id, "threads"]);
        let response = self
            .client
            .post(url)
            .header("X-API-Key", &self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let body: ThreadResponse = Self::check_created("create thread", response).await?;

        body.thread_id
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .ok_or(IntentError::MissingField {
                call: "create thread",
                field: "thread_id",
            })
    }

    /// Sends a message to the thread and returns the model's text reply.
    ///
    /// Retried up to the configured count with linear backoff
    /// (`backoff_secs * attempt_number`); the last error wins when all
    /// attempts are exhausted.
    ///
    /// # Errors
    ///
    /// [`IntentError::Http`] or [`IntentError::UnexpectedStatus`] after all
    /// retries are spent.
    pub async fn send_message(&self, thread_id: &str, content: &str) -> Result<String, IntentError> {
        let attempts = self.send_retries.saturating_add(1).max(1);
        let mut last_err: Option<IntentError> = None;

        for attempt in 1..=attempts {
            match self.send_message_once(thread_id, content).await {
                Ok(reply) => return Ok(reply),
                Err(err) => {
                    if attempt < attempts {
                        let delay = self.retry_backoff_secs.saturating_mul(u64::from(attempt));
                        tracing::warn!(
                            attempt,
                            attempts,
                            delay_secs = delay,
                            error = %err,
                            "backboard send failed, retrying after backoff"
                        );
                        tokio::time::sleep(Duration::from_secs(delay)).await;
                    }
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or(IntentError::MissingField {
            call: "send message",
            field: "content",
        }))
    }

    async fn send_message_once(
        &self,
        thread_id: &str,
        content: &str,
    ) -> Result<String, IntentError> {
        let url = self.endpoint(&["threads", thread_id, "messages"]);
        let form = [
            ("content", content),
            ("stream", "false"),
            ("memory", "off"),
            ("send_to_llm", "true"),
            ("llm_provider", self.llm_provider.as_str()),
            ("model_name", self.model_name.as_str()),
        ];

        let response = self
            .client
            .post(url)
            .header("X-API-Key", &self.api_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(IntentError::UnexpectedStatus {
                call: "send message",
                status: status.as_u16(),
                body: shorten_error_text(&body),
            });
        }

        let body: MessageResponse =
            response.json().await.map_err(IntentError::Http)?;
        Ok(body.content.unwrap_or_default().trim().to_owned())
    }

    async fn check_created<T: serde::de::DeserializeOwned>(
        call: &'static str,
        response: reqwest::Response,
    ) -> Result<T, IntentError> {
        let status = response.status();
        if !matches!(status.as_u16(), 200 | 201) {
            let body = response.text().await.unwrap_or_default();
            return Err(IntentError::UnexpectedStatus {
                call,
                status: status.as_u16(),
                body: shorten_error_text(&body),
            });
        }
        response.json().await.map_err(IntentError::Http)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> BackboardConfig {
        BackboardConfig {
            base_url: base_url.to_owned(),
            api_key: "test-key".to_owned(),
            llm_provider: "openrouter".to_owned(),
            model_name: "test-model".to_owned(),
            send_timeout_secs: 5,
            send_retries: 1,
            retry_backoff_secs: 0,
        }
    }

    #[test]
    fn endpoints_preserve_the_api_base_path() {
        let client = BackboardClient::new(&config("https://app.backboard.io/api")).expect("client");
        assert_eq!(
            client.endpoint(&["assistants"]).as_str(),
            "https://app.backboard.io/api/assistants"
        );
        assert_eq!(
            client.endpoint(&["threads", "t-1", "messages"]).as_str(),
            "https://app.backboard.io/api/threads/t-1/messages"
        );
    }

    #[test]
    fn trailing_slashes_in_the_base_url_are_normalised() {
        let client =
            BackboardClient::new(&config("https://app.backboard.io/api///")).expect("client");
        assert_eq!(
            client.endpoint(&["assistants"]).as_str(),
            "https://app.backboard.io/api/assistants"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(BackboardClient::new(&config("not a url")).is_err());
    }
}
