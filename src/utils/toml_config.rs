//! TOML-based configuration for the assistant
//!
//! Everything is read from `sabor.toml`; every field has a default so an
//! empty (or missing) file is a valid configuration. Selected values can then
//! be overridden from the environment, which is where the API key always
//! comes from.
//!
//! # Example
//!
//! ```toml
//! [llm]
//! chat_model = "gpt-4o-mini"
//! temperature = 0.7
//!
//! [vector_store]
//! directory = "./vector_db"
//! collection_name = "restaurante_knowledge"
//!
//! [rag]
//! top_k = 3
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::AppError;

/// Root configuration structure loaded from sabor.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaborConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub rag: RagConfig,

    #[serde(default)]
    pub costs: CostConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API, shared by chat and embeddings
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            chat_model: default_chat_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

// ============= Embedding Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Chunks sent per embedding request while indexing
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_batch_size() -> usize {
    100
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            batch_size: default_batch_size(),
        }
    }
}

// ============= Vector Store Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_vector_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_collection_name")]
    pub collection_name: String,
}

fn default_vector_directory() -> PathBuf {
    PathBuf::from("./vector_db")
}

fn default_collection_name() -> String {
    "restaurante_knowledge".to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            directory: default_vector_directory(),
            collection_name: default_collection_name(),
        }
    }
}

// ============= RAG Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagConfig {
    #[serde(default = "default_knowledge_base_path")]
    pub knowledge_base_path: PathBuf,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Fragments retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Answer with the fallback text, without calling the model, when
    /// retrieval finds nothing
    #[serde(default)]
    pub skip_generation_without_context: bool,
}

fn default_knowledge_base_path() -> PathBuf {
    PathBuf::from("./knowledge_base")
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    50
}

fn default_top_k() -> usize {
    3
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            knowledge_base_path: default_knowledge_base_path(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            skip_generation_without_context: false,
        }
    }
}

// ============= Cost Configuration =============

/// USD per 1,000 tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    #[serde(default = "default_chat_cost")]
    pub chat_per_1k: f64,

    #[serde(default = "default_embedding_cost")]
    pub embedding_per_1k: f64,
}

fn default_chat_cost() -> f64 {
    0.00015
}

fn default_embedding_cost() -> f64 {
    0.00002
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            chat_per_1k: default_chat_cost(),
            embedding_per_1k: default_embedding_cost(),
        }
    }
}

// ============= Assistant Persona =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_restaurant_name")]
    pub restaurant_name: String,

    #[serde(default = "default_city")]
    pub city: String,

    /// WhatsApp / phone number offered whenever the assistant cannot help
    #[serde(default = "default_contact_phone")]
    pub contact_phone: String,

    /// Replaces the built-in system prompt entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_restaurant_name() -> String {
    "El Buen Sabor".to_string()
}

fn default_city() -> String {
    "Bogotá, Colombia".to_string()
}

fn default_contact_phone() -> String {
    "300-123-4567".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            restaurant_name: default_restaurant_name(),
            city: default_city(),
            contact_phone: default_contact_phone(),
            system_prompt: None,
        }
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' is not set")]
    MissingEnvVar(String),

    #[error("Environment variable '{name}' has an invalid value '{value}'")]
    InvalidEnvVar { name: String, value: String },
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl SaborConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound(path)) => {
                debug!(path = %path.display(), "No configuration file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SaborConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides, looking each variable up through
    /// `lookup` (normally `|k| std::env::var(k).ok()`), then re-validate.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OPENAI_CHAT_MODEL") {
            self.llm.chat_model = v;
        }
        if let Some(v) = lookup("OPENAI_EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Some(v) = lookup("OPENAI_TEMPERATURE") {
            self.llm.temperature = parse_env("OPENAI_TEMPERATURE", v)?;
        }
        if let Some(v) = lookup("OPENAI_MAX_TOKENS") {
            self.llm.max_tokens = parse_env("OPENAI_MAX_TOKENS", v)?;
        }
        if let Some(v) = lookup("OPENAI_API_BASE") {
            self.llm.api_base = v;
        }
        if let Some(v) = lookup("VECTOR_STORE_DIRECTORY") {
            self.vector_store.directory = PathBuf::from(v);
        }
        if let Some(v) = lookup("VECTOR_COLLECTION_NAME") {
            self.vector_store.collection_name = v;
        }
        if let Some(v) = lookup("KNOWLEDGE_BASE_PATH") {
            self.rag.knowledge_base_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("TOP_K_RESULTS") {
            self.rag.top_k = parse_env("TOP_K_RESULTS", v)?;
        }

        self.validate()
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rag.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "rag.chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(ConfigError::ValidationError(format!(
                "rag.chunk_overlap ({}) must be smaller than rag.chunk_size ({})",
                self.rag.chunk_overlap, self.rag.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "rag.top_k must be greater than 0".to_string(),
            ));
        }
        if self.embedding.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.batch_size must be greater than 0".to_string(),
            ));
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "llm.max_tokens must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "llm.temperature must be between 0 and 2, got {}",
                self.llm.temperature
            )));
        }

        for (field, value) in [
            ("llm.chat_model", &self.llm.chat_model),
            ("llm.api_base", &self.llm.api_base),
            ("llm.api_key_env", &self.llm.api_key_env),
            ("embedding.model", &self.embedding.model),
            ("vector_store.collection_name", &self.vector_store.collection_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        Ok(())
    }

    /// Resolve the API key from the variable named by `llm.api_key_env`.
    pub fn api_key<F>(&self, lookup: F) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.llm.api_key_env)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(self.llm.api_key_env.clone()))
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value,
    })
}
