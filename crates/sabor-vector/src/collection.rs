//! Vector collection.
//!
//! A collection is a named container for vectors sharing one dimensionality.

use crate::error::Result;
use crate::index::FlatIndex;
use crate::types::{Record, SearchHit};

/// A named collection of vectors whose dimension is fixed by its first insert.
pub struct Collection {
    name: String,
    index: FlatIndex,
}

impl Collection {
    /// Create a new, empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: FlatIndex::new(),
        }
    }

    pub(crate) fn from_index(name: impl Into<String>, index: FlatIndex) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Get the collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the vector dimensions, if known.
    pub fn dimensions(&self) -> Option<usize> {
        self.index.dimensions()
    }

    /// Get the number of vectors in the collection.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Insert or replace records.
    pub fn upsert(&self, records: Vec<Record>) -> Result<usize> {
        self.index.upsert(records)
    }

    /// A detached copy of this collection with `records` applied.
    ///
    /// Fails exactly when [`upsert`](Self::upsert) would, and leaves this
    /// collection untouched either way.
    pub fn staged(&self, records: &[Record]) -> Result<Collection> {
        let mut all = self.index.export_all();
        all.extend_from_slice(records);
        Ok(Self::from_index(self.name.clone(), FlatIndex::from_records(all)?))
    }

    /// Search for the `k` nearest vectors.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        self.index.query(vector, k)
    }

    /// Export all records for persistence.
    pub fn export_all(&self) -> Vec<Record> {
        self.index.export_all()
    }
}
