//! # sabor-vector
//!
//! A pure-Rust embedded vector database with exact nearest-neighbour search
//! and JSON persistence.
//!
//! ## Features
//!
//! - **Exact k-NN**: brute-force scan, deterministic ordering (distance, then ID)
//! - **Upsert by string ID**: re-inserting an ID replaces the stored record
//! - **Thread-Safe**: concurrent readers, fine-grained locking per collection
//! - **Persistence**: optional storage written before memory changes, reloaded on open
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sabor_vector::{Config, Record, VectorDb};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sabor_vector::Error> {
//!     let db = VectorDb::open(Config::persistent("./vector_db")).await?;
//!     db.get_or_create_collection("documents").await?;
//!
//!     db.upsert("documents", vec![Record::new("doc1", vec![0.1; 384])]).await?;
//!
//!     let hits = db.query("documents", &vec![0.1; 384], 3).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod distance;
pub mod error;
pub mod index;
pub mod persistence;
pub mod types;

pub use collection::Collection;
pub use config::Config;
pub use distance::cosine_similarity;
pub use error::{Error, Result};
pub use types::{MetadataValue, Record, SearchHit, VectorId, VectorMetadata};

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The main vector database instance.
///
/// `VectorDb` manages multiple named collections. Uses `scc::HashMap` for
/// concurrent access that is safe across `.await` points. Cloning is cheap
/// and clones share state.
#[derive(Clone)]
pub struct VectorDb {
    inner: Arc<VectorDbInner>,
}

struct VectorDbInner {
    config: Config,
    collections: scc::HashMap<String, Arc<Collection>>,
}

impl VectorDb {
    /// Open or create a vector database with the given configuration.
    ///
    /// For a persistent configuration, every collection listed on disk is
    /// loaded.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Corrupt`] if a stored collection violates the
    /// single-dimension invariant.
    #[instrument(skip(config), fields(persistent = config.is_persistent()))]
    pub async fn open(config: Config) -> Result<Self> {
        info!("Opening vector database");

        let db = Self {
            inner: Arc::new(VectorDbInner {
                config: config.clone(),
                collections: scc::HashMap::new(),
            }),
        };

        if let Some(ref path) = config.data_path {
            db.load_collections(path).await?;
        }

        Ok(db)
    }

    /// Create a new, empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error if a collection with the same name already exists.
    #[instrument(skip(self))]
    pub async fn create_collection(&self, name: &str) -> Result<Arc<Collection>> {
        info!(name, "Creating collection");

        let collection = Arc::new(Collection::new(name));
        if self
            .inner
            .collections
            .insert(name.to_string(), collection.clone())
            .is_err()
        {
            return Err(Error::CollectionExists(name.to_string()));
        }

        if let Some(ref path) = self.inner.config.data_path {
            persistence::save_collection(path, &collection).await?;
            self.persist_collection_names(path).await?;
        }

        Ok(collection)
    }

    /// Get a collection, creating it if it does not exist. Idempotent.
    pub async fn get_or_create_collection(&self, name: &str) -> Result<Arc<Collection>> {
        if let Ok(collection) = self.get_collection(name) {
            return Ok(collection);
        }
        match self.create_collection(name).await {
            Err(Error::CollectionExists(_)) => self.get_collection(name),
            other => other,
        }
    }

    /// Delete a collection and all its data.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection doesn't exist.
    #[instrument(skip(self))]
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        info!(name, "Deleting collection");

        if self.inner.collections.remove(name).is_none() {
            return Err(Error::CollectionNotFound(name.to_string()));
        }

        if let Some(ref path) = self.inner.config.data_path {
            persistence::delete_collection_files(path, name).await?;
            self.persist_collection_names(path).await?;
        }

        Ok(())
    }

    /// Drop every collection and its files.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<()> {
        let names = self.list_collections();
        info!(count = names.len(), "Resetting vector database");

        for name in &names {
            self.inner.collections.remove(name);
            if let Some(ref path) = self.inner.config.data_path {
                persistence::delete_collection_files(path, name).await?;
            }
        }

        if let Some(ref path) = self.inner.config.data_path {
            self.persist_collection_names(path).await?;
        }
        Ok(())
    }

    /// List all collection names, sorted.
    pub fn list_collections(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.inner.collections.scan(|k, _| {
            names.push(k.clone());
        });
        names.sort();
        names
    }

    /// Get a reference to a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection doesn't exist.
    pub fn get_collection(&self, name: &str) -> Result<Arc<Collection>> {
        self.inner
            .collections
            .read(name, |_, v| v.clone())
            .ok_or_else(|| Error::CollectionNotFound(name.to_string()))
    }

    /// Insert or replace records in a collection.
    ///
    /// The batch is validated as a whole before anything is written. For a
    /// persistent database the updated collection is saved first; if saving
    /// fails the in-memory collection is left as it was.
    ///
    /// # Returns
    ///
    /// The number of records written.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn upsert(&self, collection: &str, records: Vec<Record>) -> Result<usize> {
        let col = self.get_collection(collection)?;

        if let Some(ref path) = self.inner.config.data_path {
            let staged = col.staged(&records)?;
            persistence::save_collection(path, &staged).await?;
        }
        let count = col.upsert(records)?;

        debug!(count, "Upserted records");
        Ok(count)
    }

    /// Search for the `k` nearest vectors.
    ///
    /// # Returns
    ///
    /// Hits sorted by ascending distance (best first).
    #[instrument(skip(self, vector), fields(dim = vector.len()))]
    pub async fn query(&self, collection: &str, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let col = self.get_collection(collection)?;
        let hits = col.query(vector, k)?;
        debug!(count = hits.len(), "Query completed");
        Ok(hits)
    }

    /// Get the number of vectors in a collection.
    pub fn count(&self, collection: &str) -> Result<usize> {
        let col = self.get_collection(collection)?;
        Ok(col.len())
    }

    async fn load_collections(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            tokio::fs::create_dir_all(path).await?;
            return Ok(());
        }

        for name in persistence::load_collection_names(path).await? {
            let collection = persistence::load_collection(path, &name).await?;
            let _ = self
                .inner
                .collections
                .insert(name.clone(), Arc::new(collection));
        }

        Ok(())
    }

    async fn persist_collection_names(&self, path: &Path) -> Result<()> {
        persistence::save_collection_names(path, &self.list_collections()).await
    }
}
