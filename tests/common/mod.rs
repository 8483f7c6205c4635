#![allow(dead_code)]

pub mod mocks;

use mocks::KeywordEmbedder;
use sabor::db::{LocalVectorStore, VectorStoreManager};
use sabor::llm::LLMClient;
use sabor::rag::embeddings::EmbeddingService;
use sabor::rag::prompt::PromptTemplates;
use sabor::rag::{RagEngine, RagSettings};
use sabor::types::Chunk;
use std::path::PathBuf;
use std::sync::Arc;

pub const COLLECTION: &str = "restaurante_knowledge";

/// The two menu fragments used throughout the end-to-end tests.
pub fn menu_chunks() -> Vec<Chunk> {
    vec![
        Chunk::new("Ajiaco cuesta $12.000", "menu.txt", 0),
        Chunk::new("Bandeja Paisa vale $15.000", "menu.txt", 1),
    ]
}

pub async fn manager_with(
    path: Option<PathBuf>,
    embedder: Arc<dyn EmbeddingService>,
) -> Arc<VectorStoreManager> {
    let store = Arc::new(LocalVectorStore::open(path).await.unwrap());
    Arc::new(
        VectorStoreManager::new(store, embedder, COLLECTION, 0.00002)
            .await
            .unwrap(),
    )
}

pub async fn keyword_manager() -> Arc<VectorStoreManager> {
    manager_with(None, Arc::new(KeywordEmbedder::new())).await
}

pub fn engine_with(
    manager: Arc<VectorStoreManager>,
    llm: Arc<dyn LLMClient>,
    settings: RagSettings,
) -> RagEngine {
    RagEngine::new(manager, llm, PromptTemplates::default(), settings)
}
