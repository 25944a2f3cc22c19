use crate::types::{Chunk, ScoredResult};

/// Splits text into index terms. Index and query must go through the same
/// implementation, so the ranker owns exactly one.
pub trait Tokenizer: Send + Sync {
    fn name(&self) -> &'static str;
    fn tokenize(&self, text: &str) -> Vec<String>;
}

pub trait TextIndexer: Send + Sync {
    fn index(&self, chunks: &[Chunk]) -> anyhow::Result<()>;
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<ScoredResult>>;
}

/// Persistence for chunks, keyed by parent document.
pub trait ChunkStore {
    /// Replaces every chunk of `doc_id` with `chunks`.
    fn put_document(&mut self, doc_id: &str, chunks: Vec<Chunk>) -> anyhow::Result<()>;
    /// Returns the number of chunks removed.
    fn delete_document(&mut self, doc_id: &str) -> anyhow::Result<usize>;
    fn list_chunks(&self) -> anyhow::Result<Vec<Chunk>>;
}
