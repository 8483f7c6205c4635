//! Retrieval Augmented Generation (RAG) Pipeline
//!
//! # Module Structure
//!
//! - [`loader`] - Knowledge-base files on disk
//! - [`chunker`] - Overlapping character windows
//! - [`embeddings`] - Embedding service contract and HTTP client
//! - [`prompt`] - System/user prompt templates and context assembly
//! - [`engine`] - Retrieve → context → generate
//! - [`indexing`] - Load, embed and store the knowledge base
//!
//! # RAG Pipeline
//!
//! 1. **Ingestion** - Documents are loaded and chunked
//! 2. **Storage** - Chunks are embedded in batches and upserted
//! 3. **Retrieval** - Query embedded, nearest chunks retrieved
//! 4. **Generation** - LLM answers grounded on the retrieved chunks

pub mod chunker;
pub mod embeddings;
pub mod engine;
pub mod indexing;
pub mod loader;
pub mod prompt;

pub use engine::{Generation, RagEngine, RagSettings};
pub use indexing::{index_knowledge_base, IndexOptions, IndexSummary};
