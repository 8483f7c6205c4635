//! Knowledge-base loading.
//!
//! The knowledge base is a flat directory of `.txt` files, one topic per
//! file (menu, hours, delivery, policies...).

use crate::rag::chunker::TextChunker;
use crate::types::{AppError, Chunk, Document, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Read a single file, trimmed.
///
/// Files that are not valid UTF-8 are decoded as latin-1.
pub fn load_single_document(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    let content = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), "File is not UTF-8, decoding as latin-1");
            // Latin-1 maps every byte to the code point of the same value.
            err.into_bytes().into_iter().map(char::from).collect()
        }
    };

    Ok(content.trim().to_string())
}

/// Load every `.txt` file in `dir`, sorted by file name.
///
/// Files that fail to load are skipped with a warning.
///
/// # Errors
///
/// `AppError::NotFound` if the directory does not exist or yields no
/// documents.
pub fn load_all_documents(dir: &Path) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "Directory not found: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match load_single_document(&path) {
            Ok(content) => {
                debug!(source = %source, chars = content.chars().count(), "Loaded document");
                documents.push(Document {
                    content,
                    source,
                    path: path.to_string_lossy().into_owned(),
                });
            }
            Err(e) => warn!(source = %source, error = %e, "Skipping unreadable document"),
        }
    }

    if documents.is_empty() {
        return Err(AppError::NotFound(format!(
            "No .txt files found in {}",
            dir.display()
        )));
    }

    info!(count = documents.len(), dir = %dir.display(), "Loaded knowledge base");
    Ok(documents)
}

/// Split documents into chunks stamped with their source and a zero-based,
/// per-source index.
pub fn split_documents(documents: &[Document], chunker: &TextChunker) -> Vec<Chunk> {
    documents
        .iter()
        .flat_map(|doc| {
            chunker
                .split(&doc.content)
                .into_iter()
                .enumerate()
                .map(|(index, content)| Chunk::new(content, doc.source.clone(), index))
        })
        .collect()
}

/// Load the knowledge base and split it in one step.
pub fn load_and_split(dir: &Path, chunker: &TextChunker) -> Result<Vec<Chunk>> {
    let documents = load_all_documents(dir)?;
    let chunks = split_documents(&documents, chunker);
    info!(
        chunks = chunks.len(),
        chunk_size = chunker.chunk_size(),
        chunk_overlap = chunker.chunk_overlap(),
        "Split knowledge base"
    );
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let result = load_single_document(Path::new("/nonexistent/menu.txt"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_latin1_fallback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("horarios.txt");
        // "Sábado" in latin-1
        fs::write(&path, [0x53, 0xE1, 0x62, 0x61, 0x64, 0x6F, b'\n']).unwrap();

        assert_eq!(load_single_document(&path).unwrap(), "Sábado");
    }

    #[test]
    fn test_load_all_only_txt_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("menu.txt"), "Ajiaco").unwrap();
        fs::write(dir.path().join("horarios.txt"), "Lunes a sábado").unwrap();
        fs::write(dir.path().join("notas.md"), "ignorar").unwrap();

        let docs = load_all_documents(dir.path()).unwrap();
        let sources: Vec<_> = docs.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec!["horarios.txt", "menu.txt"]);
        assert!(docs[1].path.ends_with("menu.txt"));
    }

    #[test]
    fn test_load_all_missing_dir() {
        let result = load_all_documents(Path::new("/nonexistent/knowledge_base"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_load_all_no_txt_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.md"), "nada").unwrap();
        assert!(matches!(
            load_all_documents(dir.path()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_and_split_indexes_per_source() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "abcdefgh").unwrap();
        fs::write(dir.path().join("b.txt"), "xyz").unwrap();

        let chunker = TextChunker::new(4, 0).unwrap();
        let chunks = load_and_split(dir.path(), &chunker).unwrap();

        assert_eq!(
            chunks,
            vec![
                Chunk::new("abcd", "a.txt", 0),
                Chunk::new("efgh", "a.txt", 1),
                Chunk::new("xyz", "b.txt", 0),
            ]
        );
    }
}
