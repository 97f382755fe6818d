// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat-completions endpoints.
//!
//! Provides [`ChatClient`] which handles authentication, request timeouts,
//! and bounded retry with exponential backoff on transient failures.

use std::time::Duration;

use intervue_core::IntervueError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// Timeout and retry settings for a [`ChatClient`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first.
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            max_retries: 1,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): initial, 2x, 4x, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Chat-completions client bound to one base URL and credential.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    endpoint: String,
    policy: RetryPolicy,
}

impl ChatClient {
    /// `base_url` is the API root (e.g. `https://api.openai.com/v1/`).
    pub fn new(base_url: &str, api_key: &str, policy: RetryPolicy) -> Result<Self, IntervueError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                IntervueError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(policy.timeout)
            .build()
            .map_err(|e| IntervueError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            policy,
        })
    }

    /// `GET {base}/models`, used as a cheap reachability probe.
    pub async fn probe(&self) -> Result<reqwest::StatusCode, reqwest::Error> {
        let url = self.endpoint.replace("/chat/completions", "/models");
        Ok(self.client.get(url).send().await?.status())
    }

    /// Sends a completion request, retrying transient failures.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, IntervueError> {
        let mut last_error = None;

        for attempt in 0..=self.policy.max_retries {
            if attempt > 0 {
                let delay = self.policy.backoff(attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying chat completion");
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&self.endpoint).json(request).send().await {
                Ok(response) => response,
                Err(e) if is_transient_transport(&e) => {
                    warn!(error = %e, attempt, "transport error");
                    last_error = Some(self.transport_error("HTTP request failed", e));
                    continue;
                }
                Err(e) => return Err(self.transport_error("HTTP request failed", e)),
            };

            let status = response.status();
            debug!(status = %status, attempt, endpoint = %self.endpoint, "completion response received");

            if status.is_success() {
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(e) if e.is_timeout() => {
                        warn!(error = %e, attempt, "timed out reading completion body");
                        last_error = Some(self.transport_error("failed to read response body", e));
                        continue;
                    }
                    Err(e) => return Err(self.transport_error("failed to read response body", e)),
                };
                return serde_json::from_str(&body).map_err(|e| IntervueError::Provider {
                    message: format!("failed to parse chat completion: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            let error = IntervueError::provider(describe_failure(status, &body));

            if is_transient_status(status) {
                warn!(status = %status, "transient provider error");
                last_error = Some(error);
                continue;
            }

            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| {
            IntervueError::provider("chat completion failed after retries")
        }))
    }

    /// Timeouts keep their own variant wherever in the exchange they happen.
    fn transport_error(&self, context: &str, error: reqwest::Error) -> IntervueError {
        if error.is_timeout() {
            IntervueError::Timeout {
                duration: self.policy.timeout,
            }
        } else {
            IntervueError::Provider {
                message: format!("{context}: {error}"),
                source: Some(Box::new(error)),
            }
        }
    }
}

fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!(
            "API error {status} ({}): {}",
            api_err.error.type_.as_deref().unwrap_or("unknown"),
            api_err.error.message
        ),
        Err(_) => format!("API returned {status}: {body}"),
    }
}

/// HTTP statuses worth retrying.
fn is_transient_status(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 529)
}

fn is_transient_transport(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(5),
            max_retries,
            initial_backoff: Duration::from_millis(10),
        }
    }

    fn test_client(base_url: &str, max_retries: u32) -> ChatClient {
        ChatClient::new(&format!("{base_url}/v1/"), "test-api-key", fast_policy(max_retries))
            .unwrap()
    }

    fn success_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        })
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            initial_backoff: Duration::from_millis(100),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn complete_success_sends_single_user_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "Hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Hi there!")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 1);
        let result = client
            .complete(&ChatRequest::single_user("gpt-4o-mini", "Hello"))
            .await
            .unwrap();

        assert_eq!(result.choices[0].message.content.as_deref(), Some("Hi there!"));
        assert_eq!(result.usage.unwrap().total_tokens, Some(17));
    }

    #[tokio::test]
    async fn complete_retries_on_429() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"type": "rate_limit_error", "message": "Rate limited"}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("After retry")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 1);
        let result = client
            .complete(&ChatRequest::single_user("gpt-4o-mini", "Hello"))
            .await
            .unwrap();
        assert_eq!(
            result.choices[0].message.content.as_deref(),
            Some("After retry")
        );
    }

    #[tokio::test]
    async fn complete_fails_fast_on_400() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"type": "invalid_request_error", "message": "Bad model"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 3);
        let err = client
            .complete(&ChatRequest::single_user("nope", "Hello"))
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("invalid_request_error"), "got: {err}");
    }

    #[tokio::test]
    async fn complete_exhausts_retries_on_503() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"type": "overloaded_error", "message": "Service overloaded"}
            })))
            .expect(3)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 2);
        let err = client
            .complete(&ChatRequest::single_user("gpt-4o", "Hello"))
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("overloaded_error"), "got: {err}");
    }

    #[tokio::test]
    async fn malformed_body_is_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), 0);
        let err = client
            .complete(&ChatRequest::single_user("gpt-4o", "Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, IntervueError::Provider { .. }));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body("late"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(
            &server.uri(),
            "k",
            RetryPolicy {
                timeout: Duration::from_millis(50),
                max_retries: 0,
                initial_backoff: Duration::from_millis(1),
            },
        )
        .unwrap();
        let err = client
            .complete(&ChatRequest::single_user("gpt-4o", "Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, IntervueError::Timeout { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn timeouts_map_to_timeout_variant() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = ChatClient::new(
            &server.uri(),
            "k",
            RetryPolicy {
                timeout: Duration::from_millis(50),
                max_retries: 0,
                initial_backoff: Duration::from_millis(1),
            },
        )
        .unwrap();
        let timed_out = client.client.get(server.uri()).send().await.unwrap_err();
        assert!(timed_out.is_timeout());

        let err = client.transport_error("failed to read response body", timed_out);
        assert!(
            matches!(err, IntervueError::Timeout { duration } if duration == Duration::from_millis(50))
        );
    }
}
