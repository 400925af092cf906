use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}

/// Blocking client for an OpenAI-compatible chat completions endpoint.
pub struct LlmClient {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::blocking::Client,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl LlmClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            anyhow::bail!("LLM endpoint not configured. Set [llm] endpoint in clipforge.toml");
        }
        let endpoint = config.endpoint.trim_end_matches('/').to_string();

        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            std::env::var("CLIPFORGE_LLM_KEY")
                .context("LLM API key not configured. Set [llm] api_key or CLIPFORGE_LLM_KEY")?
        };

        if config.model.trim().is_empty() {
            anyhow::bail!("LLM model not configured. Set [llm] model in clipforge.toml");
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    /// Send a single-turn chat completion and return the response text.
    pub fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::info!("Sending chat completion request to {} ({})", self.endpoint, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .context("Failed to send chat completion request")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .unwrap_or_else(|_| "unable to read response body".to_string());
            anyhow::bail!("LLM endpoint returned HTTP {}: {}", status.as_u16(), error_body);
        }

        let body = response
            .text()
            .context("Failed to read chat completion response")?;
        parse_completion(&body)
    }
}

/// Extract the first choice's content from a chat completion response body.
fn parse_completion(body: &str) -> Result<String> {
    let chat_response: ChatResponse =
        serde_json::from_str(body).context("Failed to parse chat completion response")?;

    if let Some(usage) = &chat_response.usage {
        tracing::info!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens
        );
    }

    let choice = chat_response
        .choices
        .into_iter()
        .next()
        .context("No choices in chat completion response")?;

    if let Some(reason) = &choice.finish_reason {
        if reason != "stop" {
            tracing::warn!("Chat completion finish_reason: {}", reason);
        }
    }

    Ok(choice.message.content.trim().to_string())
}
