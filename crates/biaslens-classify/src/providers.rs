//! External LLM provider calls (non-streaming).
//!
//! Groq and OpenAI speak the chat-completions format; Anthropic the Messages API.

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::error::ClassifyError;
use crate::types::{ChatMessage, LLMProvider, ResolvedProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Send a conversation and return the assistant's full reply text.
///
/// All three providers accept the same `{model, messages, temperature,
/// max_tokens}` body; they differ in endpoint, auth headers and reply shape.
pub async fn complete_llm(
    client: &Client,
    resolved: &ResolvedProvider,
    messages: &[ChatMessage],
    temperature: f64,
    max_tokens: usize,
) -> Result<String, ClassifyError> {
    let body = json!({
        "model": resolved.model,
        "messages": messages,
        "temperature": temperature,
        "max_tokens": max_tokens,
    });

    let request = match resolved.provider {
        LLMProvider::Groq => client.post(GROQ_URL).bearer_auth(&resolved.api_key),
        LLMProvider::OpenAI => client.post(OPENAI_URL).bearer_auth(&resolved.api_key),
        LLMProvider::Anthropic => client
            .post(ANTHROPIC_URL)
            .header("x-api-key", &resolved.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION),
    };

    debug!("Requesting completion from {} with model {}", resolved.provider, resolved.model);
    let response = request.json(&body).send().await?;
    let parsed = read_json(response).await?;

    match resolved.provider {
        LLMProvider::Anthropic => extract_anthropic_content(&parsed),
        LLMProvider::Groq | LLMProvider::OpenAI => extract_openai_content(&parsed),
    }
}

async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, ClassifyError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClassifyError::Api {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json()
        .await
        .map_err(|e| ClassifyError::Parse(format!("invalid API response: {}", e)))
}

fn extract_openai_content(parsed: &serde_json::Value) -> Result<String, ClassifyError> {
    match parsed["choices"][0]["message"]["content"].as_str() {
        Some(content) if !content.trim().is_empty() => Ok(content.to_string()),
        _ => Err(ClassifyError::EmptyResponse),
    }
}

fn extract_anthropic_content(parsed: &serde_json::Value) -> Result<String, ClassifyError> {
    let text: String = parsed["content"]
        .as_array()
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b["type"] == "text")
                .filter_map(|b| b["text"].as_str())
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(ClassifyError::EmptyResponse)
    } else {
        Ok(text)
    }
}
