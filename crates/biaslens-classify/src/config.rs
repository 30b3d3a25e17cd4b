//! Classifier model configuration (`llm-config.json`) and provider selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{LLMProvider, ResolvedProvider};

pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Key and model for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
}

impl ProviderSettings {
    fn with_model(model: &str) -> Self {
        Self {
            api_key: None,
            model: model.to_string(),
        }
    }
}

/// Which provider classifies articles, and how.
///
/// ```json
/// {"preferred": "auto", "groq": {"api_key": "...", "model": "llama-3.3-70b-versatile"}}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// `auto`, `groq`, `anthropic` or `openai`.
    pub preferred: String,
    pub groq: ProviderSettings,
    pub anthropic: ProviderSettings,
    pub openai: ProviderSettings,
    /// Sampling temperature; 0 keeps scores reproducible.
    pub temperature: f64,
    pub max_tokens: usize,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred: "auto".into(),
            groq: ProviderSettings::with_model(DEFAULT_GROQ_MODEL),
            anthropic: ProviderSettings::with_model(DEFAULT_ANTHROPIC_MODEL),
            openai: ProviderSettings::with_model(DEFAULT_OPENAI_MODEL),
            temperature: 0.0,
            max_tokens: 1024,
        }
    }
}

/// Auto mode tries providers in this order.
const AUTO_ORDER: [LLMProvider; 3] = [LLMProvider::Groq, LLMProvider::Anthropic, LLMProvider::OpenAI];

impl LLMConfig {
    /// Read `path` if present, then fill missing keys from the environment.
    ///
    /// An unreadable or invalid file is logged and replaced by defaults.
    pub fn load(path: &Path) -> Self {
        let mut config = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring invalid LLM config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => {
                debug!("No LLM config at {}; using defaults", path.display());
                Self::default()
            }
        };

        for provider in AUTO_ORDER {
            let settings = config.settings_mut(provider);
            if settings.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
                settings.api_key = env_key(provider);
            }
        }
        config
    }

    pub fn settings(&self, provider: LLMProvider) -> &ProviderSettings {
        match provider {
            LLMProvider::Groq => &self.groq,
            LLMProvider::Anthropic => &self.anthropic,
            LLMProvider::OpenAI => &self.openai,
        }
    }

    fn settings_mut(&mut self, provider: LLMProvider) -> &mut ProviderSettings {
        match provider {
            LLMProvider::Groq => &mut self.groq,
            LLMProvider::Anthropic => &mut self.anthropic,
            LLMProvider::OpenAI => &mut self.openai,
        }
    }

    /// The provider to call: the preferred one if it has a key, or the first
    /// keyed provider in auto mode.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        let keyed = |provider: LLMProvider| {
            let settings = self.settings(provider);
            settings.api_key.clone().map(|api_key| ResolvedProvider {
                provider,
                model: settings.model.clone(),
                api_key,
            })
        };

        match self.preferred.to_ascii_lowercase().as_str() {
            "auto" => AUTO_ORDER.into_iter().find_map(|p| keyed(p)),
            other => match other.parse::<LLMProvider>() {
                Ok(provider) => keyed(provider),
                Err(_) => {
                    warn!("Unknown preferred provider {:?}", self.preferred);
                    None
                }
            },
        }
    }

    /// Summary for status endpoints. Keys are reported only as present or absent.
    pub fn to_response(&self) -> serde_json::Value {
        let resolved = self.resolve_provider();
        let configured: serde_json::Map<String, serde_json::Value> = AUTO_ORDER
            .iter()
            .map(|p| (p.to_string(), self.settings(*p).api_key.is_some().into()))
            .collect();
        serde_json::json!({
            "preferred": self.preferred,
            "configured": configured,
            "activeProvider": resolved.as_ref().map(|r| r.provider.to_string()),
            "activeModel": resolved.map(|r| r.model),
        })
    }
}

fn env_key(provider: LLMProvider) -> Option<String> {
    let var = match provider {
        LLMProvider::Groq => "GROQ_API_KEY",
        LLMProvider::Anthropic => "ANTHROPIC_API_KEY",
        LLMProvider::OpenAI => "OPENAI_API_KEY",
    };
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(groq: bool, anthropic: bool, openai: bool) -> LLMConfig {
        let mut config = LLMConfig::default();
        config.groq.api_key = groq.then(|| "gsk".to_string());
        config.anthropic.api_key = anthropic.then(|| "sk-ant".to_string());
        config.openai.api_key = openai.then(|| "sk".to_string());
        config
    }

    #[test]
    fn test_auto_order() {
        let resolved = keyed(true, true, true).resolve_provider().unwrap();
        assert_eq!(resolved.provider, LLMProvider::Groq);
        assert_eq!(resolved.model, DEFAULT_GROQ_MODEL);

        let resolved = keyed(false, true, true).resolve_provider().unwrap();
        assert_eq!(resolved.provider, LLMProvider::Anthropic);

        assert!(keyed(false, false, false).resolve_provider().is_none());
    }

    #[test]
    fn test_explicit_preference_needs_key() {
        let mut config = keyed(true, false, false);
        config.preferred = "OpenAI".into();
        assert!(config.resolve_provider().is_none());

        config.openai.api_key = Some("sk".into());
        assert_eq!(config.resolve_provider().unwrap().provider, LLMProvider::OpenAI);

        config.preferred = "mistral".into();
        assert!(config.resolve_provider().is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm-config.json");
        std::fs::write(
            &path,
            r#"{"preferred": "groq", "groq": {"api_key": "gsk-file", "model": "llama-3.1-8b-instant"}}"#,
        )
        .unwrap();

        let config = LLMConfig::load(&path);
        assert_eq!(config.groq.model, "llama-3.1-8b-instant");
        assert_eq!(config.groq.api_key.as_deref(), Some("gsk-file"));
        assert_eq!(config.anthropic.model, DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm-config.json");
        std::fs::write(&path, "not json").unwrap();
        let config = LLMConfig::load(&path);
        assert_eq!(config.preferred, "auto");
        assert_eq!(config.groq.model, DEFAULT_GROQ_MODEL);
    }

    #[test]
    fn test_response_hides_keys() {
        let response = keyed(true, false, false).to_response();
        assert_eq!(response["configured"]["groq"], true);
        assert_eq!(response["configured"]["openai"], false);
        assert_eq!(response["activeProvider"], "groq");
        assert!(!response.to_string().contains("gsk"));
    }
}
