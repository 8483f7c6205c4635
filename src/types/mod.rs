use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============= Knowledge Base Types =============

/// A whole knowledge-base file as read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    /// File name, e.g. `menu.txt`.
    pub source: String,
    pub path: String,
}

/// A fragment of a document, the unit that gets embedded and stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub source: String,
    /// Zero-based position among the chunks of the same source.
    pub chunk_index: usize,
}

impl Chunk {
    pub fn new(content: impl Into<String>, source: impl Into<String>, chunk_index: usize) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            chunk_index,
        }
    }

    /// Deterministic record ID. Re-indexing the same source and position
    /// overwrites the previous record.
    pub fn record_id(&self) -> String {
        VectorRecord::id_for(&self.source, self.chunk_index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: String,
    pub chunk_index: usize,
}

/// What the vector store persists for each chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl VectorRecord {
    pub fn id_for(source: &str, chunk_index: usize) -> String {
        format!("{}_chunk{}", source, chunk_index)
    }

    pub fn from_chunk(chunk: &Chunk, embedding: Vec<f32>) -> Self {
        Self {
            id: chunk.record_id(),
            embedding,
            content: chunk.content.clone(),
            metadata: ChunkMetadata {
                source: chunk.source.clone(),
                chunk_index: chunk.chunk_index,
            },
        }
    }
}

// ============= Retrieval Types =============

/// A stored chunk returned by a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    pub source: String,
    pub chunk_index: usize,
    /// Cosine distance, lower is more similar.
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub source: String,
    pub chunk_index: usize,
    pub distance: f32,
}

impl From<&SearchResult> for SourceRef {
    fn from(result: &SearchResult) -> Self {
        Self {
            source: result.source.clone(),
            chunk_index: result.chunk_index,
            distance: result.distance,
        }
    }
}

/// Outcome of a full retrieve-then-generate round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub model: String,
    pub tokens_used: u64,
    pub cost: f64,
    #[serde(with = "duration_secs")]
    pub total_time: Duration,
    /// Set when generation failed and `answer` holds the apology text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Stats for the configured collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub collection_name: String,
    pub total_documents: usize,
    pub persist_directory: Option<String>,
}

/// Summary of one `add_documents` run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexingReport {
    pub requested: usize,
    pub added: usize,
    pub failed_batches: usize,
    pub tokens_used: u64,
    pub estimated_cost: f64,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

// ============= Chat Types =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sabor_vector::Error> for AppError {
    fn from(err: sabor_vector::Error) -> Self {
        match err {
            sabor_vector::Error::CollectionNotFound(name) => {
                AppError::NotFound(format!("Collection '{}' not found", name))
            }
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Serialize a `Duration` as fractional seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
