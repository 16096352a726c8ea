use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{DashboardError, Result};
use crate::llm::api::{default_base_url, LlmApiClient};
use crate::models::ChatMessage;

/// The generative-model collaborator. Implementations return the raw
/// response text; callers treat it as untrusted and validate it.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &str) -> Result<String>;

    async fn converse(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    config: Option<Arc<LlmConfig>>,
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided");
        };

        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => {
                if let Some(base_url) = &config.base_url {
                    LlmBackend::OpenAICompatible {
                        base_url: base_url.clone(),
                    }
                } else {
                    LlmBackend::Unavailable {
                        reason: format!("Unknown provider in model: {}", config.model),
                    }
                }
            }
        };

        Self {
            backend,
            config: Some(Arc::new(config.clone())),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, LlmBackend::Unavailable { .. })
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn config(&self) -> Option<&LlmConfig> {
        self.config.as_deref()
    }

    /// Endpoint requests will go to, if the provider is usable.
    pub fn base_url(&self) -> Option<&str> {
        match &self.backend {
            LlmBackend::Unavailable { .. } => None,
            LlmBackend::OpenAICompatible { base_url } => Some(base_url.as_str()),
            _ => {
                let config = self.config()?;
                match &config.base_url {
                    Some(url) => Some(url.as_str()),
                    None => {
                        let (provider, _) = parse_llm_provider_model(&config.model);
                        Some(default_base_url(provider))
                    }
                }
            }
        }
    }

    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let client = self.client()?;
        client.complete(prompt).await
    }

    fn client(&self) -> Result<LlmApiClient> {
        if !self.is_available() {
            return Err(DashboardError::LlmUnavailable(self.unavailable_reason()));
        }

        let config = self
            .config()
            .ok_or_else(|| DashboardError::LlmUnavailable("No config available".to_string()))?;

        LlmApiClient::new(config)
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "LLM provider is not configured".to_string(),
        }
    }
}

#[async_trait]
impl ModelClient for LlmProvider {
    fn is_available(&self) -> bool {
        LlmProvider::is_available(self)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(prompt).await
    }

    async fn converse(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String> {
        let client = self.client()?;
        client.converse(system_instruction, history, message).await
    }
}
