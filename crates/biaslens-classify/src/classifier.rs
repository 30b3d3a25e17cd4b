//! Bias classifier: prompt template + article text → BiasRecord.

use std::path::Path;

use async_trait::async_trait;
use biaslens_core::BiasRecord;
use reqwest::Client;
use tracing::debug;

use crate::config::LLMConfig;
use crate::error::ClassifyError;
use crate::providers;
use crate::types::ChatMessage;

/// Anything that can score an article's text for bias.
///
/// Implementations make a single attempt; retries and timeouts belong to the caller.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, article_text: &str) -> Result<BiasRecord, ClassifyError>;

    /// Short label for logs and stats.
    fn name(&self) -> String;
}

/// Fixed instruction prepended to every article.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Load the template file. Trailing whitespace is stripped from each line.
    pub fn load(path: &Path) -> biaslens_core::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let text = raw.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
        if text.trim().is_empty() {
            return Err(biaslens_core::Error::Config(format!(
                "prompt template {} is empty",
                path.display()
            )));
        }
        Ok(Self { text })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Template followed by a newline and the article text.
    pub fn render(&self, article_text: &str) -> String {
        format!("{}\n{}", self.text, article_text)
    }
}

/// Classifier backed by an external chat-completion API.
pub struct LlmClassifier {
    client: Client,
    config: LLMConfig,
    template: PromptTemplate,
}

impl LlmClassifier {
    pub fn new(config: LLMConfig, template: PromptTemplate) -> Self {
        Self {
            client: Client::new(),
            config,
            template,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.resolve_provider().is_some()
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, article_text: &str) -> Result<BiasRecord, ClassifyError> {
        let resolved = self
            .config
            .resolve_provider()
            .ok_or(ClassifyError::NoProvider)?;

        let messages = [ChatMessage::user(self.template.render(article_text))];
        let reply = providers::complete_llm(
            &self.client,
            &resolved,
            &messages,
            self.config.temperature,
            self.config.max_tokens,
        )
        .await?;

        debug!("Model {} replied with {} bytes", resolved.model, reply.len());
        parse_bias_response(&reply)
    }

    fn name(&self) -> String {
        match self.config.resolve_provider() {
            Some(r) => format!("{}:{}", r.provider, r.model),
            None => "unconfigured".into(),
        }
    }
}

/// Parse a model reply into a complete BiasRecord.
///
/// Accepts bare JSON, a fenced ```json block, or JSON embedded in prose
/// (the outermost `{...}` span is used).
pub fn parse_bias_response(reply: &str) -> Result<BiasRecord, ClassifyError> {
    let value = serde_json::from_str::<serde_json::Value>(reply.trim())
        .ok()
        .or_else(|| {
            let start = reply.find('{')?;
            let end = reply.rfind('}')?;
            (start < end)
                .then(|| serde_json::from_str(&reply[start..=end]).ok())
                .flatten()
        })
        .ok_or_else(|| ClassifyError::Parse(truncate(reply, 120)))?;

    BiasRecord::from_json_strict(&value).map_err(|v| ClassifyError::Schema(v.to_string()))
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
