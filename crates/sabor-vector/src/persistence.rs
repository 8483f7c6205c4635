//! Persistence layer for sabor-vector.
//!
//! Layout under the database directory:
//!
//! ```text
//! collections.json          list of collection names
//! {name}/metadata.json      name, dimensions
//! {name}/vectors.json       every record (id, vector, document, metadata)
//! ```

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::index::FlatIndex;
use crate::types::Record;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

const COLLECTIONS_FILE: &str = "collections.json";
const METADATA_FILE: &str = "metadata.json";
const VECTORS_FILE: &str = "vectors.json";

/// Collection metadata stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionMetadata {
    name: String,
    dimensions: Option<usize>,
}

/// Save a collection to disk.
pub async fn save_collection(base_path: &Path, collection: &Collection) -> Result<()> {
    let collection_path = base_path.join(collection.name());
    tokio::fs::create_dir_all(&collection_path).await?;

    let metadata = CollectionMetadata {
        name: collection.name().to_string(),
        dimensions: collection.dimensions(),
    };
    let metadata_json = serde_json::to_string_pretty(&metadata)
        .map_err(|e| Error::Persistence(format!("Failed to serialize metadata: {}", e)))?;
    tokio::fs::write(collection_path.join(METADATA_FILE), metadata_json).await?;

    let records = collection.export_all();
    let vectors_json = serde_json::to_string(&records)
        .map_err(|e| Error::Persistence(format!("Failed to serialize vectors: {}", e)))?;
    tokio::fs::write(collection_path.join(VECTORS_FILE), vectors_json).await?;

    debug!(name = collection.name(), count = records.len(), "Saved collection");
    Ok(())
}

/// Load a collection from disk.
///
/// # Errors
///
/// Returns [`Error::Corrupt`] when the stored vectors do not share one
/// dimension or disagree with the recorded metadata.
pub async fn load_collection(base_path: &Path, name: &str) -> Result<Collection> {
    let collection_path = base_path.join(name);
    if !collection_path.exists() {
        return Err(Error::CollectionNotFound(name.to_string()));
    }

    let metadata_json = tokio::fs::read_to_string(collection_path.join(METADATA_FILE)).await?;
    let metadata: CollectionMetadata = serde_json::from_str(&metadata_json)
        .map_err(|e| Error::Persistence(format!("Failed to parse metadata: {}", e)))?;

    let vectors_path = collection_path.join(VECTORS_FILE);
    let records: Vec<Record> = if vectors_path.exists() {
        let vectors_json = tokio::fs::read_to_string(&vectors_path).await?;
        serde_json::from_str(&vectors_json)
            .map_err(|e| Error::Persistence(format!("Failed to parse vectors: {}", e)))?
    } else {
        Vec::new()
    };

    let count = records.len();
    let index = FlatIndex::from_records(records).map_err(|e| Error::Corrupt {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    if let (Some(recorded), Some(actual)) = (metadata.dimensions, index.dimensions()) {
        if recorded != actual {
            return Err(Error::Corrupt {
                name: name.to_string(),
                reason: format!(
                    "metadata records {} dimensions but vectors have {}",
                    recorded, actual
                ),
            });
        }
    }

    info!(name, count, dimensions = ?index.dimensions(), "Loaded collection");
    Ok(Collection::from_index(name, index))
}

/// Read the list of collection names. A missing file means no collections.
pub async fn load_collection_names(base_path: &Path) -> Result<Vec<String>> {
    let path = base_path.join(COLLECTIONS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = tokio::fs::read_to_string(&path).await?;
    serde_json::from_str(&data)
        .map_err(|e| Error::Persistence(format!("Failed to parse {}: {}", COLLECTIONS_FILE, e)))
}

/// Write the list of collection names.
pub async fn save_collection_names(base_path: &Path, names: &[String]) -> Result<()> {
    tokio::fs::create_dir_all(base_path).await?;
    let data = serde_json::to_string_pretty(names)
        .map_err(|e| Error::Persistence(format!("Failed to serialize collections: {}", e)))?;
    tokio::fs::write(base_path.join(COLLECTIONS_FILE), data).await?;
    Ok(())
}

/// Remove a collection's directory, if present.
pub async fn delete_collection_files(base_path: &Path, name: &str) -> Result<()> {
    let collection_path = base_path.join(name);
    if collection_path.exists() {
        tokio::fs::remove_dir_all(&collection_path).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VectorMetadata;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_load_collection() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        let collection = Collection::new("test");
        collection
            .upsert(vec![Record::new("vec1", vec![1.0, 0.0, 0.0])
                .with_document("Ajiaco")
                .with_metadata(VectorMetadata::from_pairs([("source", "menu.txt")]))])
            .unwrap();

        save_collection(base_path, &collection).await.unwrap();
        let loaded = load_collection(base_path, "test").await.unwrap();

        assert_eq!(loaded.name(), "test");
        assert_eq!(loaded.dimensions(), Some(3));
        assert_eq!(loaded.export_all(), collection.export_all());
    }

    #[tokio::test]
    async fn test_load_mixed_dimensions_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        let collection = Collection::new("bad");
        collection
            .upsert(vec![Record::new("a", vec![1.0, 0.0])])
            .unwrap();
        save_collection(base_path, &collection).await.unwrap();

        let mixed = vec![
            Record::new("a", vec![1.0, 0.0]),
            Record::new("b", vec![1.0, 0.0, 0.0]),
        ];
        tokio::fs::write(
            base_path.join("bad").join(VECTORS_FILE),
            serde_json::to_string(&mixed).unwrap(),
        )
        .await
        .unwrap();

        let result = load_collection(base_path, "bad").await;
        assert!(matches!(result, Err(Error::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_collection_names_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_collection_names(temp_dir.path()).await.unwrap().is_empty());

        let names = vec!["restaurante_knowledge".to_string()];
        save_collection_names(temp_dir.path(), &names).await.unwrap();
        assert_eq!(load_collection_names(temp_dir.path()).await.unwrap(), names);
    }

    #[tokio::test]
    async fn test_load_missing_collection() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_collection(temp_dir.path(), "nope").await;
        assert!(matches!(result, Err(Error::CollectionNotFound(_))));
    }
}
