use serde::Deserialize;
use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub graph: GraphConfig,
    pub analysis: AnalysisConfig,
    pub llm: Option<LlmConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per storage key.
    pub data_dir: PathBuf,
}

/// Relationship graph canvas settings
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub width: f64,
    pub height: f64,
    pub label_wrap: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 400.0,
            label_wrap: 20,
        }
    }
}

/// How much report text is handed to the model for narratives and chat
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub narrative_excerpt_chars: usize,
    pub chat_excerpt_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            narrative_excerpt_chars: 4000,
            chat_excerpt_chars: 6000,
        }
    }
}

/// LLM configuration for chat/completion models
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: env::var("DIWBOARD_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".diwboard")),
            },
            graph: GraphConfig {
                width: parse_env_or("GRAPH_WIDTH", 500.0),
                height: parse_env_or("GRAPH_HEIGHT", 400.0),
                label_wrap: parse_env_or("GRAPH_LABEL_WRAP", 20),
            },
            analysis: AnalysisConfig {
                narrative_excerpt_chars: parse_env_or("NARRATIVE_EXCERPT_CHARS", 4000),
                chat_excerpt_chars: parse_env_or("CHAT_EXCERPT_CHARS", 6000),
            },
            llm: env::var("LLM_MODEL").ok().map(|model| LlmConfig {
                model,
                api_key: env::var("LLM_API_KEY").ok(),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
                max_retries: parse_env_or("LLM_MAX_RETRIES", 3),
            }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}
