//! Retrieve, assemble context, generate.
//!
//! # Example
//!
//! ```rust,ignore
//! let engine = RagEngine::from_config(manager, llm, &config);
//! let result = engine.query("¿Cuánto cuesta el ajiaco?", None, false).await;
//! println!("{}", result.answer);
//! ```

use crate::db::VectorStoreManager;
use crate::llm::{GenerationParams, LLMClient};
use crate::rag::embeddings::estimate_cost;
use crate::rag::prompt::{build_context, PromptTemplates, APOLOGY_ANSWER};
use crate::types::{QueryResult, SearchResult, SourceRef};
use crate::utils::toml_config::SaborConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Emit a pipeline progress event at `info` when verbose, `debug` otherwise.
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+);
        } else {
            debug!($($arg)+);
        }
    };
}

/// Knobs of the query pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RagSettings {
    pub top_k: usize,
    pub params: GenerationParams,
    pub chat_cost_per_1k: f64,
    pub skip_generation_without_context: bool,
}

impl RagSettings {
    pub fn from_config(config: &SaborConfig) -> Self {
        Self {
            top_k: config.rag.top_k,
            params: GenerationParams {
                temperature: config.llm.temperature,
                max_tokens: config.llm.max_tokens,
            },
            chat_cost_per_1k: config.costs.chat_per_1k,
            skip_generation_without_context: config.rag.skip_generation_without_context,
        }
    }
}

impl Default for RagSettings {
    fn default() -> Self {
        Self::from_config(&SaborConfig::default())
    }
}

/// Output of a single generation attempt. Failures are carried in `error`.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub answer: String,
    pub model: String,
    pub tokens_used: u64,
    pub cost: f64,
    pub elapsed: Duration,
    pub error: Option<String>,
}

pub struct RagEngine {
    store: Arc<VectorStoreManager>,
    llm: Arc<dyn LLMClient>,
    templates: PromptTemplates,
    settings: RagSettings,
}

impl RagEngine {
    pub fn new(
        store: Arc<VectorStoreManager>,
        llm: Arc<dyn LLMClient>,
        templates: PromptTemplates,
        settings: RagSettings,
    ) -> Self {
        Self {
            store,
            llm,
            templates,
            settings,
        }
    }

    pub fn from_config(
        store: Arc<VectorStoreManager>,
        llm: Arc<dyn LLMClient>,
        config: &SaborConfig,
    ) -> Self {
        Self::new(
            store,
            llm,
            PromptTemplates::new(&config.assistant),
            RagSettings::from_config(config),
        )
    }

    pub fn store(&self) -> &Arc<VectorStoreManager> {
        &self.store
    }

    pub fn settings(&self) -> &RagSettings {
        &self.settings
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Nearest fragments for `query`; never fails.
    pub async fn retrieve(&self, query: &str, k: usize) -> Vec<SearchResult> {
        self.store.search_similar(query, k).await
    }

    pub fn build_context(&self, results: &[SearchResult]) -> String {
        build_context(results)
    }

    pub fn build_prompt(&self, query: &str, context: &str) -> Vec<crate::types::ChatMessage> {
        self.templates.build_prompt(query, context)
    }

    /// Ask the model. Any failure becomes the apology answer with the error
    /// description attached.
    pub async fn generate(&self, query: &str, context: &str) -> Generation {
        let model = self.llm.model_name().to_string();
        let start = Instant::now();

        if context.is_empty() && self.settings.skip_generation_without_context {
            debug!("No context retrieved, answering with fallback text");
            return Generation {
                answer: self.templates.no_context_message(query),
                model,
                tokens_used: 0,
                cost: 0.0,
                elapsed: start.elapsed(),
                error: None,
            };
        }

        let messages = self.build_prompt(query, context);
        match self.llm.complete(&messages, &self.settings.params).await {
            Ok(completion) => Generation {
                answer: completion.text,
                cost: estimate_cost(completion.tokens_used, self.settings.chat_cost_per_1k),
                tokens_used: completion.tokens_used,
                model,
                elapsed: start.elapsed(),
                error: None,
            },
            Err(e) => {
                warn!(model = %model, error = %e, "Generation failed");
                Generation {
                    answer: APOLOGY_ANSWER.to_string(),
                    model,
                    tokens_used: 0,
                    cost: 0.0,
                    elapsed: start.elapsed(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Full round: retrieve, build context, generate.
    ///
    /// `k` defaults to the configured top-k. Sources carry raw distances.
    pub async fn query(&self, text: &str, k: Option<usize>, verbose: bool) -> QueryResult {
        let start = Instant::now();
        let k = k.unwrap_or(self.settings.top_k);
        progress!(verbose, query = text, k, "RAG query");

        let retrieval_start = Instant::now();
        let documents = self.retrieve(text, k).await;
        progress!(
            verbose,
            found = documents.len(),
            elapsed_ms = retrieval_start.elapsed().as_millis() as u64,
            "Retrieved documents"
        );

        let context = self.build_context(&documents);
        progress!(verbose, model = self.llm.model_name(), "Generating answer");
        let generation = self.generate(text, &context).await;

        let result = QueryResult {
            query: text.to_string(),
            answer: generation.answer,
            sources: documents.iter().map(SourceRef::from).collect(),
            model: generation.model,
            tokens_used: generation.tokens_used,
            cost: generation.cost,
            total_time: start.elapsed(),
            error: generation.error,
        };

        progress!(
            verbose,
            tokens = result.tokens_used,
            cost = result.cost,
            total_ms = result.total_time.as_millis() as u64,
            success = result.is_success(),
            "Query finished"
        );

        result
    }
}
