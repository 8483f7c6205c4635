//! Named-collection manager: the piece of the pipeline that turns chunks into
//! stored vectors and queries back into chunks.

use crate::rag::embeddings::{estimate_cost, EmbeddingService};
use crate::types::{
    AppError, Chunk, CollectionStats, IndexingReport, Result, SearchResult, VectorRecord,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::vectorstore::VectorStore;

/// Owns one collection inside a [`VectorStore`] and the embedder used to
/// fill and query it.
pub struct VectorStoreManager {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingService>,
    collection_name: String,
    embedding_cost_per_1k: f64,
}

impl VectorStoreManager {
    /// Bind to `collection_name`, creating it if needed.
    pub async fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingService>,
        collection_name: impl Into<String>,
        embedding_cost_per_1k: f64,
    ) -> Result<Self> {
        let collection_name = collection_name.into();
        store.get_or_create_collection(&collection_name).await?;

        info!(
            collection = %collection_name,
            provider = store.provider_name(),
            "Vector store ready"
        );

        Ok(Self {
            store,
            embedder,
            collection_name,
            embedding_cost_per_1k,
        })
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingService> {
        &self.embedder
    }

    /// Embed and store `chunks` in order, `batch_size` at a time.
    ///
    /// A batch whose embedding call or upsert fails is skipped and the run
    /// carries on; `added` in the report counts only stored records.
    pub async fn add_documents(&self, chunks: &[Chunk], batch_size: usize) -> Result<IndexingReport> {
        if batch_size == 0 {
            return Err(AppError::Configuration(
                "batch_size must be greater than 0".to_string(),
            ));
        }

        let start = Instant::now();
        let mut report = IndexingReport {
            requested: chunks.len(),
            ..Default::default()
        };
        let total_batches = chunks.len().div_ceil(batch_size);

        for (batch_no, batch) in chunks.chunks(batch_size).enumerate() {
            match self.add_batch(batch).await {
                Ok((added, tokens)) => {
                    report.added += added;
                    report.tokens_used += tokens;
                    debug!(
                        batch = batch_no + 1,
                        total_batches, added, tokens, "Stored batch"
                    );
                }
                Err(e) => {
                    report.failed_batches += 1;
                    warn!(
                        batch = batch_no + 1,
                        total_batches,
                        size = batch.len(),
                        error = %e,
                        "Skipping batch"
                    );
                }
            }
        }

        report.estimated_cost = estimate_cost(report.tokens_used, self.embedding_cost_per_1k);
        report.elapsed = start.elapsed();

        if report.added < report.requested {
            warn!(
                added = report.added,
                requested = report.requested,
                failed_batches = report.failed_batches,
                "Not every chunk was indexed"
            );
        }

        info!(
            collection = %self.collection_name,
            added = report.added,
            tokens = report.tokens_used,
            cost = report.estimated_cost,
            "Indexing finished"
        );

        Ok(report)
    }

    async fn add_batch(&self, batch: &[Chunk]) -> Result<(usize, u64)> {
        let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
        let embedded = self.embedder.embed_batch(&texts).await?;

        if embedded.embeddings.len() != batch.len() {
            return Err(AppError::ExternalService(format!(
                "expected {} embeddings, got {}",
                batch.len(),
                embedded.embeddings.len()
            )));
        }

        let records: Vec<VectorRecord> = batch
            .iter()
            .zip(embedded.embeddings)
            .map(|(chunk, embedding)| VectorRecord::from_chunk(chunk, embedding))
            .collect();

        let added = self.store.upsert(&self.collection_name, &records).await?;
        Ok((added, embedded.tokens_used))
    }

    /// The `k` chunks nearest to `query`, ascending by distance.
    ///
    /// Blank queries and any failure along the way yield an empty list.
    pub async fn search_similar(&self, query: &str, k: usize) -> Vec<SearchResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        match self.try_search(query, k).await {
            Ok(results) => {
                debug!(query, k, found = results.len(), "Similarity search");
                results
            }
            Err(e) => {
                warn!(query, error = %e, "Similarity search failed");
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let embedding = self.embedder.embed(query).await?;
        let mut results = self.store.query(&self.collection_name, &embedding, k).await?;
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(results)
    }

    pub async fn get_collection_stats(&self) -> Result<CollectionStats> {
        let total_documents = self.store.count(&self.collection_name).await?;
        Ok(CollectionStats {
            collection_name: self.collection_name.clone(),
            total_documents,
            persist_directory: self
                .store
                .location()
                .map(|p| p.to_string_lossy().into_owned()),
        })
    }

    /// Drop the collection and recreate it empty.
    pub async fn delete_collection(&self) -> Result<()> {
        self.store.delete_collection(&self.collection_name).await?;
        self.store
            .get_or_create_collection(&self.collection_name)
            .await?;
        info!(collection = %self.collection_name, "Collection cleared");
        Ok(())
    }

    /// Drop every collection in the store, then recreate ours empty.
    pub async fn reset_database(&self) -> Result<()> {
        self.store.reset().await?;
        self.store
            .get_or_create_collection(&self.collection_name)
            .await?;
        warn!(collection = %self.collection_name, "Vector database reset");
        Ok(())
    }
}
