//! Domain types shared by the ranker, the chunk store and the CLI.

use serde::{Deserialize, Serialize};

pub type ChunkId = u64;

/// A bounded fragment of a source document, the unit of retrieval.
///
/// - `id`: corpus-unique identifier, assigned sequentially at ingestion
/// - `doc_id`: opaque identity of the parent document (relative file path or external id)
/// - `text`: the raw text payload, stored verbatim
///
/// Chunks are never edited in place. Re-ingesting a document replaces all
/// of its chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub text: String,
}

impl Chunk {
    pub fn new(id: ChunkId, doc_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id, doc_id: doc_id.into(), text: text.into() }
    }
}

/// One ranked hit returned by a query.
///
/// `score` is BM25 and only comparable with other results of the same
/// query against the same corpus snapshot. Higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub chunk_id: ChunkId,
    pub score: f64,
    pub doc_id: String,
    pub text: String,
}
