//! # Sabor - restaurant Q&A over retrieval-augmented generation
//!
//! Answers natural-language questions about a small knowledge base (menu,
//! hours, delivery, policies) by retrieving the most relevant fragments and
//! grounding a language model on them.
//!
//! ## Overview
//!
//! Sabor can be used in two ways:
//!
//! 1. **As a CLI** - Run the `sabor` binary (`index`, `chat`, `ask`, ...)
//! 2. **As a library** - Wire the components into your own Rust project
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use sabor::{
//!     LocalVectorStore, OpenAIEmbeddings, Provider, RagEngine, SaborConfig, VectorStoreManager,
//! };
//! use std::sync::Arc;
//!
//! let config = SaborConfig::load_or_default("sabor.toml")?;
//! let api_key = config.api_key(|k| std::env::var(k).ok())?;
//!
//! let store = Arc::new(LocalVectorStore::open(Some(config.vector_store.directory.clone())).await?);
//! let embedder = Arc::new(OpenAIEmbeddings::new(
//!     api_key.clone(),
//!     config.llm.api_base.clone(),
//!     config.embedding.model.clone(),
//! ));
//! let manager = Arc::new(
//!     VectorStoreManager::new(store, embedder, &config.vector_store.collection_name, config.costs.embedding_per_1k)
//!         .await?,
//! );
//! let llm = Provider::OpenAI {
//!     api_key,
//!     api_base: config.llm.api_base.clone(),
//!     model: config.llm.chat_model.clone(),
//! }
//! .create_client();
//!
//! let engine = RagEngine::from_config(manager, llm, &config);
//! let result = engine.query("¿Cuánto cuesta el ajiaco?", None, false).await;
//! println!("{}", result.answer);
//! ```
//!
//! ## Modules
//!
//! - [`rag`] - Loading, chunking, embeddings, prompts and the query engine
//! - [`db`] - Vector store trait, embedded backend and collection manager
//! - [`llm`] - Chat-completion clients
//! - [`session`] - Interactive session state and usage stats
//! - [`utils`] - TOML configuration
//! - [`cli`] - Command-line parsing and terminal output
//! - [`types`] - Shared data types and the error enum

pub mod cli;
pub mod db;
pub mod llm;
pub mod rag;
pub mod session;
pub mod types;
pub mod utils;

pub use db::{LocalVectorStore, VectorStore, VectorStoreManager};
pub use llm::{Completion, GenerationParams, LLMClient, OpenAIClient, Provider};
pub use rag::embeddings::{EmbeddingBatch, EmbeddingService, OpenAIEmbeddings};
pub use rag::{IndexOptions, IndexSummary, RagEngine, RagSettings};
pub use session::{ChatSession, Command, SessionEvent, SessionStats};
pub use types::{AppError, Chunk, QueryResult, Result, SearchResult};
pub use utils::toml_config::{ConfigError, SaborConfig};
