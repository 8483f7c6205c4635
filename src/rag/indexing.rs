//! Knowledge-base indexing job.
//!
//! load → (reset) → count before → embed and store → count after.

use crate::db::VectorStoreManager;
use crate::rag::chunker::TextChunker;
use crate::rag::loader::load_and_split;
use crate::types::{AppError, IndexingReport, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct IndexOptions {
    pub knowledge_base_path: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub batch_size: usize,
    /// Wipe the whole store before indexing. Needed after files were edited
    /// or removed, since stale chunk ids would otherwise survive.
    pub reset: bool,
}

/// What an indexing run did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSummary {
    pub chunks: usize,
    pub documents_before: usize,
    pub documents_after: usize,
    pub report: IndexingReport,
}

impl IndexSummary {
    /// True when every chunk made it into the store.
    pub fn is_complete(&self) -> bool {
        self.report.added == self.chunks
    }
}

/// Run a full indexing pass.
///
/// # Errors
///
/// Fails before touching the store if the parameters are invalid or the
/// knowledge base cannot be loaded. Individual batch failures do not fail
/// the job; they show up in the report.
pub async fn index_knowledge_base(
    manager: &VectorStoreManager,
    options: &IndexOptions,
) -> Result<IndexSummary> {
    let chunker = TextChunker::new(options.chunk_size, options.chunk_overlap)?;
    if options.batch_size == 0 {
        return Err(AppError::Configuration(
            "batch_size must be greater than 0".to_string(),
        ));
    }
    let chunks = load_and_split(&options.knowledge_base_path, &chunker)?;

    if options.reset {
        manager.reset_database().await?;
    }

    let documents_before = manager.get_collection_stats().await?.total_documents;
    info!(
        chunks = chunks.len(),
        documents_before,
        "Indexing knowledge base"
    );

    let report = manager.add_documents(&chunks, options.batch_size).await?;
    let documents_after = manager.get_collection_stats().await?.total_documents;

    if report.added == 0 {
        warn!("No documents were added");
    }
    info!(documents_after, "Indexing verified");

    Ok(IndexSummary {
        chunks: chunks.len(),
        documents_before,
        documents_after,
        report,
    })
}
