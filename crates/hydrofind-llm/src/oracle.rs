//! Oracle HTTP client: an OpenAI/OpenRouter-compatible chat-completions
//! call, grounded in
//! `hydro_find/ai/openrouter_client.py`'s
//! `OpenRouterClient.generate_response` (temperature 0.2, one-shot, no
//! internal retry; headers identify the calling application).

use hydrofind_shared::HydroError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct OracleClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OracleClient {
    pub fn new(base_url: String, api_key: String, model: String, timeout_secs: u64, max_tokens: u32) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("reqwest client builds with a static config");
        Self { http, base_url, api_key, model, max_tokens }
    }

    /// One-shot chat completion. Returns `None` if the oracle answers with
    /// empty content (treated the same as "no answer" throughout
    /// `LLMGateway`, never as an error).
    pub async fn complete(&self, system_prompt: &str, user_query: &str) -> Result<Option<String>, HydroError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_query },
            ],
            temperature: TEMPERATURE,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "http://localhost")
            .header("X-Title", "hydrofind")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    HydroError::transient_upstream(format!("oracle request failed: {e}"))
                } else {
                    HydroError::Http(e)
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS || response.status().is_server_error() {
            return Err(HydroError::transient_upstream(format!(
                "oracle returned {}",
                response.status()
            )));
        }
        if !response.status().is_success() {
            return Err(HydroError::Internal(format!("oracle returned {}", response.status())));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| HydroError::Internal(format!("malformed oracle response envelope: {e}")))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(content)
    }
}
