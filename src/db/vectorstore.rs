//! Vector Store Abstraction Layer
//!
//! A single trait the rest of the application talks to, so the embedded
//! engine can be swapped (or mocked in tests) without touching the pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    VectorStoreManager                     │
//! │   add_documents │ search_similar │ stats │ reset          │
//! └───────────────────────────────────────────────────────────┘
//!                             │
//! ┌───────────────────────────────────────────────────────────┐
//! │                     VectorStore Trait                     │
//! │   get_or_create_collection │ upsert │ query │ count │ ... │
//! └───────────────────────────────────────────────────────────┘
//!                             ▲
//!                   ┌─────────┴─────────┐
//!                   │  LocalVectorStore │
//!                   │  (sabor-vector)   │
//!                   └───────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sabor::db::{LocalVectorStore, VectorStore};
//!
//! let store = LocalVectorStore::open(Some("./vector_db".into())).await?;
//! store.get_or_create_collection("restaurante_knowledge").await?;
//! store.upsert("restaurante_knowledge", &records).await?;
//! let results = store.query("restaurante_knowledge", &query_embedding, 3).await?;
//! ```

use crate::types::{Result, SearchResult, VectorRecord};
use async_trait::async_trait;
use std::path::PathBuf;

/// Abstract trait for vector database operations.
///
/// # Implementors
///
/// - `LocalVectorStore` - embedded `sabor-vector` engine (default)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Get the name of this vector store provider.
    fn provider_name(&self) -> &'static str;

    /// Directory the store persists to, if any.
    fn location(&self) -> Option<PathBuf>;

    /// Create the collection if it does not exist yet. Idempotent.
    async fn get_or_create_collection(&self, name: &str) -> Result<()>;

    /// Insert or replace records by ID.
    ///
    /// The batch is all-or-nothing: if any record is rejected nothing is
    /// written.
    ///
    /// # Returns
    ///
    /// Number of records written.
    async fn upsert(&self, collection: &str, records: &[VectorRecord]) -> Result<usize>;

    /// Find the `k` nearest records.
    ///
    /// # Returns
    ///
    /// Results sorted by ascending distance.
    async fn query(&self, collection: &str, embedding: &[f32], k: usize)
        -> Result<Vec<SearchResult>>;

    /// Count records in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;

    /// Delete a collection and all its data.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Delete every collection in the store.
    async fn reset(&self) -> Result<()>;
}
