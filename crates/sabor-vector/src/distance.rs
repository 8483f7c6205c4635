//! Cosine similarity and distance.
//!
//! Distance is `1 - similarity`, so it lies in [0, 2] with 0 meaning the
//! same direction. Text embeddings only care about direction, which is the
//! only metric this crate offers.

use crate::error::{Error, Result};

/// Cosine similarity between two embeddings.
///
/// Symmetric and bounded in [-1, 1]. A zero-magnitude vector has similarity
/// 0.0 with anything.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the vectors differ in length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(cosine(a, b))
}

/// Cosine distance between two vectors of equal length.
///
/// Lower means more similar; never negative.
#[inline]
pub(crate) fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    (1.0 - cosine(a, b)).max(0.0)
}

#[inline]
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    // f64 accumulators keep long embeddings (1536 dims) from drifting past ±1
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = (norm_a * norm_b).sqrt();
    if denom == 0.0 {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0) as f32
    }
}
