//! Local vector store backed by the embedded `sabor-vector` engine.
//!
//! # Features
//!
//! - **No native dependencies**: compiles on any platform Rust supports
//! - **Embedded**: no separate server process
//! - **Persistent**: every write lands on disk and is reloaded on open
//! - **Exact**: brute-force cosine search, no approximation
//!
//! # Example
//!
//! ```rust,ignore
//! let store = LocalVectorStore::open(Some("./vector_db".into())).await?;
//! store.get_or_create_collection("documents").await?;
//! store.upsert("documents", &records).await?;
//! let results = store.query("documents", &embedding, 3).await?;
//! ```

use crate::types::{AppError, Result, SearchResult, VectorRecord};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::vectorstore::VectorStore;
use sabor_vector::{Config, MetadataValue, Record, SearchHit, VectorDb, VectorMetadata};

const SOURCE_KEY: &str = "source";
const CHUNK_INDEX_KEY: &str = "chunk_index";

/// Embedded vector store.
pub struct LocalVectorStore {
    /// The underlying vector database (VectorDb is Clone and uses Arc internally)
    db: VectorDb,
    /// Storage path (None for in-memory)
    path: Option<PathBuf>,
}

impl LocalVectorStore {
    /// Open a store.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory to persist data to. If None, operates in-memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the on-disk data cannot be loaded.
    pub async fn open(path: Option<PathBuf>) -> Result<Self> {
        let config = match path {
            Some(ref p) => Config::persistent(p.clone()),
            None => Config::memory(),
        };

        let db = VectorDb::open(config).await.map_err(|e| {
            AppError::Database(format!("Failed to open vector store: {}", e))
        })?;

        Ok(Self { db, path })
    }

    /// In-memory store, mostly for tests.
    pub async fn in_memory() -> Result<Self> {
        Self::open(None).await
    }
}

fn to_record(record: &VectorRecord) -> Record {
    let metadata = VectorMetadata::from_pairs([
        (SOURCE_KEY, MetadataValue::from(record.metadata.source.as_str())),
        (CHUNK_INDEX_KEY, MetadataValue::from(record.metadata.chunk_index)),
    ]);

    Record::new(record.id.clone(), record.embedding.clone())
        .with_document(record.content.clone())
        .with_metadata(metadata)
}

fn to_search_result(hit: SearchHit) -> Result<SearchResult> {
    let metadata = hit
        .metadata
        .as_ref()
        .ok_or_else(|| AppError::Database(format!("Record '{}' has no metadata", hit.id)))?;

    let source = metadata
        .get_string(SOURCE_KEY)
        .ok_or_else(|| AppError::Database(format!("Record '{}' has no source", hit.id)))?
        .to_string();

    let chunk_index = metadata
        .get_int(CHUNK_INDEX_KEY)
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| AppError::Database(format!("Record '{}' has no chunk index", hit.id)))?;

    Ok(SearchResult {
        content: hit.document.unwrap_or_default(),
        source,
        chunk_index,
        distance: hit.distance,
    })
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    fn provider_name(&self) -> &'static str {
        "sabor-vector"
    }

    fn location(&self) -> Option<PathBuf> {
        self.path.clone()
    }

    async fn get_or_create_collection(&self, name: &str) -> Result<()> {
        self.db.get_or_create_collection(name).await?;
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: &[VectorRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let records: Vec<Record> = records.iter().map(to_record).collect();
        let count = self.db.upsert(collection, records).await?;
        debug!(collection, count, "Upserted records");
        Ok(count)
    }

    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        self.db
            .query(collection, embedding, k)
            .await?
            .into_iter()
            .map(to_search_result)
            .collect()
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        Ok(self.db.count(collection)?)
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.db.delete_collection(name).await?;
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        self.db.reset().await?;
        Ok(())
    }
}
