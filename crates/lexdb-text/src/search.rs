use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use lexdb_core::config::RankerConfig;
use lexdb_core::error::Result;
use lexdb_core::traits::{ChunkStore, TextIndexer, Tokenizer};
use lexdb_core::types::{Chunk, ChunkId, ScoredResult};
use tracing::{debug, info};

use crate::index::Bm25Index;
use crate::scoring::{self, Bm25Params};
use crate::select;
use crate::tokenize::tokenizer_for;

/// Owns a chunk corpus and answers BM25 queries against it.
///
/// Readers grab the current [`Bm25Index`] snapshot and score without holding
/// any lock. Writers are serialized, build the next index from the current
/// one, and only then swap it in, so a query never observes a half-applied
/// mutation.
pub struct Ranker {
	params: Bm25Params,
	tokenizer: Arc<dyn Tokenizer>,
	index: RwLock<Arc<Bm25Index>>,
	writer: Mutex<()>,
}

impl Ranker {
	pub fn new(params: Bm25Params, tokenizer: Arc<dyn Tokenizer>) -> Self {
		Self { params, tokenizer, index: RwLock::new(Arc::new(Bm25Index::empty())), writer: Mutex::new(()) }
	}

	pub fn from_config(config: &RankerConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self::new(Bm25Params::from(config), tokenizer_for(config.tokenizer)))
	}

	pub fn params(&self) -> &Bm25Params { &self.params }

	pub fn tokenizer(&self) -> &dyn Tokenizer { self.tokenizer.as_ref() }

	/// The currently published index.
	pub fn snapshot(&self) -> Arc<Bm25Index> {
		self.index.read().unwrap_or_else(PoisonError::into_inner).clone()
	}

	fn publish(&self, next: Bm25Index) {
		*self.index.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
	}

	/// Adds chunks to the corpus. Nothing is published if any id is already
	/// indexed or repeated within `chunks`.
	pub fn add_chunks(&self, chunks: &[Chunk]) -> Result<()> {
		let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
		let next = self.snapshot().with_chunks(chunks, self.tokenizer.as_ref())?;
		info!(added = chunks.len(), chunks = next.len(), "published index");
		self.publish(next);
		Ok(())
	}

	/// Drops every chunk of `doc_id`, returning how many were removed.
	pub fn remove_document(&self, doc_id: &str) -> usize {
		let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
		let (next, removed) = self.snapshot().without_document(doc_id);
		if removed > 0 {
			info!(doc_id, removed, chunks = next.len(), "published index");
			self.publish(next);
		}
		removed
	}

	/// Swaps the chunks of `doc_id` for `chunks` in one publish.
	pub fn replace_document(&self, doc_id: &str, chunks: &[Chunk]) -> Result<()> {
		let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
		let (pruned, removed) = self.snapshot().without_document(doc_id);
		let next = pruned.with_chunks(chunks, self.tokenizer.as_ref())?;
		info!(doc_id, removed, added = chunks.len(), chunks = next.len(), "published index");
		self.publish(next);
		Ok(())
	}

	/// Replaces the whole corpus with `chunks`.
	pub fn rebuild(&self, chunks: &[Chunk]) -> Result<()> {
		let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
		let next = Bm25Index::build(chunks, self.tokenizer.as_ref())?;
		info!(chunks = next.len(), terms = next.vocabulary_size(), "rebuilt index");
		self.publish(next);
		Ok(())
	}

	pub fn rebuild_from(&self, store: &dyn ChunkStore) -> anyhow::Result<()> {
		let chunks = store.list_chunks()?;
		self.rebuild(&chunks)?;
		Ok(())
	}

	/// Score of every chunk in the current snapshot.
	pub fn score(&self, query: &str) -> BTreeMap<ChunkId, f64> {
		let index = self.snapshot();
		let tokens = self.tokenizer.tokenize(query);
		scoring::score(&index, &self.params, &tokens)
	}

	/// The `k` most relevant chunks for `query`, best first.
	pub fn rank(&self, query: &str, k: usize) -> Vec<ScoredResult> {
		let index = self.snapshot();
		let tokens = self.tokenizer.tokenize(query);
		let scores = scoring::score(&index, &self.params, &tokens);
		let results = select::top_k(&scores, k, &index);
		debug!(query, tokens = tokens.len(), scored = scores.len(), returned = results.len(), "ranked query");
		results
	}
}

impl TextIndexer for Ranker {
	fn index(&self, chunks: &[Chunk]) -> anyhow::Result<()> {
		self.add_chunks(chunks)?;
		Ok(())
	}

	fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<ScoredResult>> {
		Ok(self.rank(query, k))
	}
}
