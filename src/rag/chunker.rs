//! Fixed-size, overlapping character windows.
//!
//! Sizes are counted in Unicode scalar values, so a window never cuts through
//! a multi-byte character (menus are full of `ñ`, `á` and `$`).

use crate::types::{AppError, Result};

/// Splits text into windows of `chunk_size` characters advancing by
/// `chunk_size - chunk_overlap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// # Errors
    ///
    /// `AppError::Configuration` if `chunk_size` is zero or `chunk_overlap`
    /// is not strictly smaller than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(AppError::Configuration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(AppError::Configuration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into trimmed, non-empty windows.
    ///
    /// A window that is blank after trimming is dropped, but the stride still
    /// advances past it.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every char start, plus the end of the string.
        let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let char_count = bounds.len();
        bounds.push(text.len());

        let stride = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < char_count {
            let end = (start + self.chunk_size).min(char_count);
            let window = text[bounds[start]..bounds[end]].trim();
            if !window.is_empty() {
                chunks.push(window.to_string());
            }
            start += stride;
        }

        chunks
    }
}

/// Convenience wrapper validating parameters and splitting in one call.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<String>> {
    Ok(TextChunker::new(chunk_size, chunk_overlap)?.split(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(10, 10)]
    #[case(10, 11)]
    fn test_invalid_parameters(#[case] size: usize, #[case] overlap: usize) {
        assert!(matches!(
            TextChunker::new(size, overlap),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_invalid_parameters_rejected_before_text() {
        assert!(split_text("", 5, 5).is_err());
    }

    #[test]
    fn test_empty_text() {
        let chunker = TextChunker::new(500, 50).unwrap();
        assert!(chunker.split("").is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunker = TextChunker::new(500, 50).unwrap();
        assert_eq!(
            chunker.split("  Ajiaco cuesta $12.000  "),
            vec!["Ajiaco cuesta $12.000"]
        );
    }

    #[test]
    fn test_sliding_window() {
        let chunks = split_text("abcdefghij", 4, 2).unwrap();
        assert_eq!(chunks, vec!["abcd", "cdef", "efgh", "ghij", "ij"]);
    }

    #[test]
    fn test_blank_windows_dropped_stride_kept() {
        let chunks = split_text("abc      def", 3, 0).unwrap();
        assert_eq!(chunks, vec!["abc", "def"]);
    }

    #[test]
    fn test_multibyte_characters() {
        let text = "ñandú año café señor";
        let chunks = split_text(text, 3, 1).unwrap();
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 3);
        }
        assert_eq!(chunks[0], "ñan");
    }

    #[rstest]
    #[case(1, 0)]
    #[case(7, 3)]
    #[case(50, 49)]
    #[case(500, 50)]
    fn test_chunks_never_exceed_size(#[case] size: usize, #[case] overlap: usize) {
        let text = "El Buen Sabor abre de lunes a sábado, de 11:00 a 22:00. \
                    Domingos y festivos de 12:00 a 18:00. "
            .repeat(20);
        let chunks = split_text(&text, size, overlap).unwrap();
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.chars().count() <= size));
    }
}
