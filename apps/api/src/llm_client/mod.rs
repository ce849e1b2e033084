//! LLM Client: the single point of entry for all Claude API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! All LLM interactions MUST go through this module.
//!
//! Call statistics and the rate-limit gate live in `LlmStats`, owned by the
//! client instance created in `main` and shared through `AppState`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all drafting calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 8192;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Call statistics + rate-limit gate
// ────────────────────────────────────────────────────────────────────────────

/// Usage counters and the minimum-interval gate for one client.
pub struct LlmStats {
    total_calls: AtomicU64,
    failed_calls: AtomicU64,
    retries: AtomicU64,
    input_tokens: AtomicU64,
    output_tokens: AtomicU64,
    last_call_at: std::sync::Mutex<Option<DateTime<Utc>>>,
    min_interval: Duration,
    /// Instant the previous request was sent; callers queue on this lock.
    gate: Mutex<Option<Instant>>,
}

/// Serializable view of `LlmStats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmStatsSnapshot {
    pub total_calls: u64,
    pub failed_calls: u64,
    pub retries: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub last_call_at: Option<DateTime<Utc>>,
    pub min_interval_ms: u64,
}

impl LlmStats {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            total_calls: AtomicU64::new(0),
            failed_calls: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            input_tokens: AtomicU64::new(0),
            output_tokens: AtomicU64::new(0),
            last_call_at: std::sync::Mutex::new(None),
            min_interval,
            gate: Mutex::new(None),
        }
    }

    /// Waits until `min_interval` has passed since the previous request, then claims the slot.
    pub async fn acquire_slot(&self) {
        let mut last = self.gate.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("LLM rate gate: waiting {}ms", wait.as_millis());
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
        if let Ok(mut at) = self.last_call_at.lock() {
            *at = Some(Utc::now());
        }
    }

    pub fn record_success(&self, usage: &Usage) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        self.input_tokens
            .fetch_add(usage.input_tokens as u64, Ordering::Relaxed);
        self.output_tokens
            .fetch_add(usage.output_tokens as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        self.failed_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LlmStatsSnapshot {
        LlmStatsSnapshot {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            failed_calls: self.failed_calls.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            input_tokens: self.input_tokens.load(Ordering::Relaxed),
            output_tokens: self.output_tokens.load(Ordering::Relaxed),
            last_call_at: self.last_call_at.lock().ok().and_then(|at| *at),
            min_interval_ms: self.min_interval.as_millis() as u64,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Anthropic Messages API with retry logic.
/// Clones share the HTTP connection pool and the same `LlmStats`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    stats: Arc<LlmStats>,
}

impl LlmClient {
    pub fn new(api_key: String, min_interval: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(180))
                .build()?,
            api_key,
            stats: Arc::new(LlmStats::new(min_interval)),
        })
    }

    pub fn stats(&self) -> &LlmStats {
        &self.stats
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let result = self.call_with_retries(prompt, system).await;
        match &result {
            Ok(response) => self.stats.record_success(&response.usage),
            Err(_) => self.stats.record_failure(),
        }
        result
    }

    /// Calls the LLM and returns the text of the first text block.
    pub async fn call_text(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        response
            .text()
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    async fn call_with_retries(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                self.stats.record_retry();
                tokio::time::sleep(delay).await;
            }

            self.stats.acquire_slot().await;

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_picks_first_text_block() {
        let response: LlmResponse = serde_json::from_str(
            r#"{"content":[{"type":"tool_use"},{"type":"text","text":"DRAFT"}],
                "usage":{"input_tokens":10,"output_tokens":20}}"#,
        )
        .unwrap();
        assert_eq!(response.text(), Some("DRAFT"));
    }

    #[test]
    fn test_stats_accumulate() {
        let stats = LlmStats::new(Duration::ZERO);
        stats.record_success(&Usage {
            input_tokens: 100,
            output_tokens: 400,
        });
        stats.record_failure();
        stats.record_retry();

        let snap = stats.snapshot();
        assert_eq!(snap.total_calls, 2);
        assert_eq!(snap.failed_calls, 1);
        assert_eq!(snap.retries, 1);
        assert_eq!(snap.input_tokens, 100);
        assert_eq!(snap.output_tokens, 400);
    }

    #[test]
    fn test_separate_clients_have_separate_stats() {
        let a = LlmClient::new("key-a".into(), Duration::ZERO).unwrap();
        let b = LlmClient::new("key-b".into(), Duration::ZERO).unwrap();
        a.stats().record_failure();
        assert_eq!(a.stats().snapshot().total_calls, 1);
        assert_eq!(b.stats().snapshot().total_calls, 0);
        // Clones share.
        let a2 = a.clone();
        assert_eq!(a2.stats().snapshot().total_calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_gate_spaces_calls() {
        let stats = LlmStats::new(Duration::from_millis(500));
        let start = tokio::time::Instant::now();
        stats.acquire_slot().await;
        stats.acquire_slot().await;
        stats.acquire_slot().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(stats.snapshot().last_call_at.is_some());
    }
}
