//! Embedding service contract and its OpenAI-compatible implementation.

use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Embeddings for a batch of texts, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingBatch {
    pub embeddings: Vec<Vec<f32>>,
    pub tokens_used: u64,
}

/// Turns text into dense vectors.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// `AppError::EmptyInput` if the text is blank after [`clean_text`],
    /// without contacting the service.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts in one call. Output position *i* always
    /// corresponds to input position *i*.
    ///
    /// # Errors
    ///
    /// `AppError::EmptyInput` for an empty list, or naming the position of
    /// the first blank entry.
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch>;

    fn model_name(&self) -> &str;
}

/// Normalise text before embedding: newlines become spaces, then trim.
pub fn clean_text(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}

/// `tokens / 1000 * cost_per_1k`.
pub fn estimate_cost(tokens: u64, cost_per_1k: f64) -> f64 {
    tokens as f64 / 1000.0 * cost_per_1k
}

/// Clean every entry, rejecting an empty list or any blank entry.
pub fn prepare_batch(texts: &[String]) -> Result<Vec<String>> {
    if texts.is_empty() {
        return Err(AppError::EmptyInput(
            "embedding batch contains no texts".to_string(),
        ));
    }

    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let cleaned = clean_text(text);
            if cleaned.is_empty() {
                Err(AppError::EmptyInput(format!(
                    "embedding batch entry {} is blank",
                    i
                )))
            } else {
                Ok(cleaned)
            }
        })
        .collect()
}

// ============= OpenAI-compatible client =============

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u64,
}

/// `POST {api_base}/embeddings` client.
pub struct OpenAIEmbeddings {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAIEmbeddings {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
        }
    }

    async fn request(&self, input: Vec<String>) -> Result<EmbeddingBatch> {
        let expected = input.len();
        let url = format!("{}/embeddings", self.api_base);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "model": self.model, "input": input }))
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalService(format!("Embedding request to {} failed: {}", url, e))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Embedding API error {}: {}",
                status, text
            )));
        }

        let mut body: EmbeddingResponse = resp.json().await.map_err(|e| {
            AppError::ExternalService(format!("Invalid embedding response: {}", e))
        })?;

        if body.data.len() != expected {
            return Err(AppError::ExternalService(format!(
                "Embedding API returned {} vectors for {} inputs",
                body.data.len(),
                expected
            )));
        }

        body.data.sort_by_key(|d| d.index);
        let tokens_used = body.usage.map(|u| u.total_tokens).unwrap_or(0);
        debug!(count = expected, tokens_used, model = %self.model, "Embedded batch");

        Ok(EmbeddingBatch {
            embeddings: body.data.into_iter().map(|d| d.embedding).collect(),
            tokens_used,
        })
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Err(AppError::EmptyInput("text to embed is blank".to_string()));
        }

        self.request(vec![cleaned])
            .await?
            .embeddings
            .pop()
            .ok_or_else(|| AppError::ExternalService("Embedding API returned no vector".into()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        let input = prepare_batch(texts)?;
        self.request(input).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
