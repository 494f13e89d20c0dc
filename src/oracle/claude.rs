//! Anthropic Messages API oracle.
//!
//! One HTTP call per summary over a shared connection pool; concurrent
//! section calls multiplex on HTTP/2. Each call carries its own timeout —
//! a timed-out call fails that call only, never the pipeline.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::{section_prompt, Oracle, OracleError, Result, TableText};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Claude-backed summarization oracle.
pub struct ClaudeOracle {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeOracle {
    /// Create an oracle using `ANTHROPIC_API_KEY` from the environment.
    ///
    /// Fails fast with [`OracleError::MissingCredentials`] so a
    /// misconfigured run stops before any call is attempted.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            OracleError::MissingCredentials("ANTHROPIC_API_KEY is not set".to_string())
        })?;
        Self::new(api_key, DEFAULT_MODEL.to_string())
    }

    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .use_rustls_tls()
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| OracleError::Request(e.to_string()))?;

        Ok(Self { client, api_key, model, max_tokens: DEFAULT_MAX_TOKENS })
    }
}

#[async_trait::async_trait]
impl Oracle for ClaudeOracle {
    async fn summarize(
        &self,
        section_name: &str,
        text: &str,
        tables: &[TableText],
    ) -> Result<String> {
        let prompt = section_prompt(section_name, text, tables);
        debug!(section = section_name, prompt_len = prompt.len(), "issuing oracle call");

        let request_body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{
                "role": "user",
                "content": prompt,
            }]
        });

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout
                } else {
                    OracleError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OracleError::Api { status: status.as_u16(), message });
        }

        let api_response: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        api_response["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                OracleError::MalformedResponse("response has no content[0].text".to_string())
            })
    }
}
