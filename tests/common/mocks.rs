//! Test doubles for the embedding and generation services.
//!
//! Shared across integration test files so none of them needs network
//! access.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use sabor::llm::{Completion, GenerationParams, LLMClient};
use sabor::rag::embeddings::{clean_text, prepare_batch, EmbeddingBatch, EmbeddingService};
use sabor::types::{AppError, ChatMessage, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Words the keyword embedder knows about, one dimension each.
pub const VOCABULARY: &[&str] = &[
    "ajiaco",
    "bandeja",
    "paisa",
    "cuesta",
    "vale",
    "horario",
    "abre",
    "domicilio",
    "domicilios",
    "reserva",
    "reservas",
    "tarjeta",
    "vegetariana",
    "vegetarianas",
];

/// Deterministic embedder: each dimension counts one vocabulary word.
///
/// Texts sharing keywords end up close under cosine distance, which is all
/// retrieval tests need.
#[derive(Default)]
pub struct KeywordEmbedder {
    embed_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vectorize(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        VOCABULARY
            .iter()
            .map(|term| words.iter().filter(|w| *w == term).count() as f32)
            .collect()
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingService for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Err(AppError::EmptyInput("text to embed is blank".into()));
        }
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vectorize(&cleaned))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        let cleaned = prepare_batch(texts)?;
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(EmbeddingBatch {
            tokens_used: cleaned.iter().map(|t| t.split_whitespace().count() as u64).sum(),
            embeddings: cleaned.iter().map(|t| Self::vectorize(t)).collect(),
        })
    }

    fn model_name(&self) -> &str {
        "keyword-test"
    }
}

/// Embedder whose every call fails, as an unreachable service would.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingService for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(AppError::ExternalService("connection refused".into()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<EmbeddingBatch> {
        Err(AppError::ExternalService("connection refused".into()))
    }

    fn model_name(&self) -> &str {
        "failing-test"
    }
}

/// LLM client that plays back a script of replies and records every prompt.
///
/// Once the script runs out it keeps answering with `fallback`.
pub struct ScriptedLLM {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    fallback: String,
    tokens_per_call: u64,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLLM {
    pub fn new(fallback: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: fallback.to_string(),
            tokens_per_call: 100,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Replies in order; `Err` entries become `ExternalService` failures.
    pub fn with_script(fallback: &str, script: Vec<std::result::Result<&str, &str>>) -> Self {
        let client = Self::new(fallback);
        *client.script.lock() = script
            .into_iter()
            .map(|r| r.map(String::from).map_err(String::from))
            .collect();
        client
    }

    pub fn failing() -> Self {
        Self::with_script("", vec![Err("service unavailable"); 16])
    }

    pub fn with_tokens(mut self, tokens: u64) -> Self {
        self.tokens_per_call = tokens;
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn last_prompt(&self) -> Option<Vec<ChatMessage>> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl LLMClient for ScriptedLLM {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<Completion> {
        self.prompts.lock().push(messages.to_vec());

        let next = self.script.lock().pop_front();
        match next.unwrap_or_else(|| Ok(self.fallback.clone())) {
            Ok(text) => Ok(Completion {
                text,
                tokens_used: self.tokens_per_call,
            }),
            Err(message) => Err(AppError::ExternalService(message)),
        }
    }

    fn model_name(&self) -> &str {
        "scripted-test"
    }
}
