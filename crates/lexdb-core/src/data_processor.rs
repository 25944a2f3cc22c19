//! Ingestion and chunking: turns `.txt` documents into [`Chunk`]s.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::ChunkingConfig;
use crate::types::{Chunk, ChunkId};

/// All chunks produced from a single source file.
#[derive(Debug, Clone)]
pub struct DocumentChunks {
    pub doc_id: String,
    pub path: PathBuf,
    pub chunks: Vec<Chunk>,
}

#[derive(Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(chunking_config: ChunkingConfig) -> Self { Self { chunking_config } }

    /// Chunks every `.txt` file under `data_dir`, in path order. Chunk ids are
    /// assigned sequentially starting at `first_id`.
    pub fn process_directory(&self, data_dir: &Path, first_id: ChunkId) -> Result<Vec<DocumentChunks>> {
        if !data_dir.is_dir() {
            anyhow::bail!("data directory {} does not exist", data_dir.display());
        }
        let files = self.list_txt_files(data_dir);
        if files.is_empty() {
            info!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        let mut next_id = first_id;
        let mut documents = Vec::with_capacity(files.len());
        for (file_index, file_path) in files.iter().enumerate() {
            debug!(file = %file_path.display(), "processing file {}/{}", file_index + 1, files.len());
            let content = self.read_file_content(file_path)?;
            let doc_id = self.extract_doc_id(data_dir, file_path);
            let chunks = self.chunk_document(&doc_id, &content, next_id);
            next_id += chunks.len() as ChunkId;
            documents.push(DocumentChunks { doc_id, path: file_path.clone(), chunks });
        }
        let total: usize = documents.iter().map(|d| d.chunks.len()).sum();
        info!(files = files.len(), chunks = total, "processed directory");
        Ok(documents)
    }

    /// Splits `text` into fragments of at most `max_chars` characters with no
    /// overlap. The final fragment may be shorter; empty text gives no chunks.
    pub fn chunk_document(&self, doc_id: &str, text: &str, first_id: ChunkId) -> Vec<Chunk> {
        let max_chars = self.chunking_config.max_chars.max(1);
        let mut chunks = Vec::new();
        let mut start = 0usize;
        let mut count = 0usize;
        for (byte_idx, _) in text.char_indices() {
            if count == max_chars {
                chunks.push(Chunk::new(first_id + chunks.len() as ChunkId, doc_id, &text[start..byte_idx]));
                start = byte_idx;
                count = 0;
            }
            count += 1;
        }
        if start < text.len() {
            chunks.push(Chunk::new(first_id + chunks.len() as ChunkId, doc_id, &text[start..]));
        }
        chunks
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(file_path).with_context(|| format!("reading {}", file_path.display()))?;
                warn!(file = %file_path.display(), "file is not valid UTF-8, decoding lossily");
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }

    /// Path of `file_path` below `root` without its extension, `/`-separated,
    /// so `nested/lease.txt` and `lease.txt` stay distinct documents.
    fn extract_doc_id(&self, root: &Path, file_path: &Path) -> String {
        let relative = file_path.strip_prefix(root).unwrap_or(file_path).with_extension("");
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path(); if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort(); txt_files
    }
}
