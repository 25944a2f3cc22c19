//! File-backed [`ChunkStore`]: every chunk lives in one JSON document keyed
//! by parent document id.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::traits::ChunkStore;
use crate::types::{Chunk, ChunkId};

pub struct JsonChunkStore {
    path: PathBuf,
    documents: BTreeMap<String, Vec<Chunk>>,
}

impl JsonChunkStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let documents: BTreeMap<String, Vec<Chunk>> = if path.exists() {
            let raw = fs::read_to_string(&path).with_context(|| format!("reading chunk store {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing chunk store {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), documents = documents.len(), "opened chunk store");
        Ok(Self { path, documents })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn document_count(&self) -> usize { self.documents.len() }

    pub fn chunk_count(&self) -> usize { self.documents.values().map(Vec::len).sum() }

    /// First id not used by any stored chunk.
    pub fn next_chunk_id(&self) -> ChunkId {
        self.documents.values().flatten().map(|c| c.id + 1).max().unwrap_or(0)
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.documents)?)
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

impl ChunkStore for JsonChunkStore {
    fn put_document(&mut self, doc_id: &str, chunks: Vec<Chunk>) -> Result<()> {
        info!(doc_id, chunks = chunks.len(), "storing document");
        self.documents.insert(doc_id.to_string(), chunks);
        self.flush()
    }

    fn delete_document(&mut self, doc_id: &str) -> Result<usize> {
        let Some(removed) = self.documents.remove(doc_id) else { return Ok(0) };
        info!(doc_id, chunks = removed.len(), "deleted document");
        self.flush()?;
        Ok(removed.len())
    }

    fn list_chunks(&self) -> Result<Vec<Chunk>> {
        let mut chunks: Vec<Chunk> = self.documents.values().flatten().cloned().collect();
        chunks.sort_by_key(|c| c.id);
        Ok(chunks)
    }
}
