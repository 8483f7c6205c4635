//! Exact (brute-force) nearest-neighbour index.
//!
//! Every query scans all stored vectors. Knowledge bases served by this crate
//! hold a few hundred chunks at most, where a linear scan is both exact and
//! fast enough.

use crate::distance::cosine_distance;
use crate::error::{Error, Result};
use crate::types::{Record, SearchHit, VectorId};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::trace;

/// Thread-safe flat index keyed by string ID.
#[derive(Default)]
pub struct FlatIndex {
    inner: RwLock<IndexInner>,
}

#[derive(Default)]
struct IndexInner {
    /// Records ordered by ID so exports and tie-breaks are deterministic.
    entries: BTreeMap<VectorId, Record>,
    /// Fixed by the first insert; `None` while the index has never held a vector.
    dimensions: Option<usize>,
}

impl FlatIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from previously stored records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the records do not all share
    /// one dimension, or [`Error::InvalidVector`] for an empty or non-finite
    /// vector.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let index = Self::new();
        index.upsert(records)?;
        Ok(index)
    }

    /// Get the vector dimensions, if any vector was ever inserted.
    pub fn dimensions(&self) -> Option<usize> {
        self.inner.read().dimensions
    }

    /// Get the number of vectors in the index.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or replace records.
    ///
    /// The whole batch is validated before anything is written, so a bad
    /// record leaves the index untouched.
    ///
    /// Returns the number of records written.
    pub fn upsert(&self, records: Vec<Record>) -> Result<usize> {
        let mut inner = self.inner.write();

        let mut expected = inner.dimensions;
        for record in &records {
            validate_vector(&record.vector)?;
            match expected {
                Some(dim) if dim != record.vector.len() => {
                    return Err(Error::DimensionMismatch {
                        expected: dim,
                        actual: record.vector.len(),
                    });
                }
                Some(_) => {}
                None => expected = Some(record.vector.len()),
            }
        }

        let count = records.len();
        inner.dimensions = expected;
        for record in records {
            inner.entries.insert(record.id.clone(), record);
        }

        trace!(count, "Upserted records");
        Ok(count)
    }

    /// Find the `k` stored vectors closest to `query`.
    ///
    /// Hits are ordered by ascending distance, ties broken by ID. Querying an
    /// empty index, or with `k == 0`, yields no hits.
    pub fn query(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        validate_vector(query)?;

        let inner = self.inner.read();
        if k == 0 || inner.entries.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(dim) = inner.dimensions {
            if dim != query.len() {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    actual: query.len(),
                });
            }
        }

        let mut scored: Vec<(f32, &Record)> = inner
            .entries
            .values()
            .map(|record| (cosine_distance(query, &record.vector), record))
            .collect();

        scored.sort_by(|(da, ra), (db, rb)| da.total_cmp(db).then_with(|| ra.id.cmp(&rb.id)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(distance, record)| SearchHit {
                id: record.id.clone(),
                distance,
                document: record.document.clone(),
                metadata: record.metadata.clone(),
            })
            .collect())
    }

    /// Export all records, ordered by ID.
    pub fn export_all(&self) -> Vec<Record> {
        self.inner.read().entries.values().cloned().collect()
    }
}

fn validate_vector(vector: &[f32]) -> Result<()> {
    if vector.is_empty() {
        return Err(Error::InvalidVector("Vector is empty".to_string()));
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidVector(
            "Vector contains NaN or Inf".to_string(),
        ));
    }
    Ok(())
}
