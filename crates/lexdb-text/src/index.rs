use std::collections::{btree_map::Entry, BTreeMap, HashMap};

use lexdb_core::error::{Error, Result};
use lexdb_core::traits::Tokenizer;
use lexdb_core::types::{Chunk, ChunkId};
use tracing::debug;

/// Term statistics of one indexed chunk.
#[derive(Debug, Clone)]
pub struct ChunkStats {
	pub chunk: Chunk,
	pub term_freqs: HashMap<String, u32>,
	pub len: usize,
}

impl ChunkStats {
	fn new(chunk: Chunk, tokenizer: &dyn Tokenizer) -> Self {
		let tokens = tokenizer.tokenize(&chunk.text);
		let len = tokens.len();
		let mut term_freqs: HashMap<String, u32> = HashMap::new();
		for token in tokens { *term_freqs.entry(token).or_insert(0) += 1; }
		Self { chunk, term_freqs, len }
	}

	pub fn term_freq(&self, term: &str) -> u32 { self.term_freqs.get(term).copied().unwrap_or(0) }
}

/// Term statistics derived from a corpus snapshot.
///
/// A pure function of the chunks it was built from. It is never edited in
/// place: [`Bm25Index::with_chunks`] and [`Bm25Index::without_document`]
/// return a new index and leave `self` untouched, so a published snapshot
/// stays valid for as long as a reader holds it.
#[derive(Debug, Clone, Default)]
pub struct Bm25Index {
	chunks: BTreeMap<ChunkId, ChunkStats>,
	/// term -> (chunk id -> term frequency), chunk ids ascending.
	postings: BTreeMap<String, BTreeMap<ChunkId, u32>>,
	total_len: usize,
}

impl Bm25Index {
	pub fn empty() -> Self { Self::default() }

	/// Tokenizes every chunk and accumulates postings.
	/// Fails on the first chunk id seen twice.
	pub fn build(chunks: &[Chunk], tokenizer: &dyn Tokenizer) -> Result<Self> {
		Self::empty().with_chunks(chunks, tokenizer)
	}

	/// Returns a copy of this index with `chunks` added. Only the new chunks
	/// are tokenized.
	pub fn with_chunks(&self, chunks: &[Chunk], tokenizer: &dyn Tokenizer) -> Result<Self> {
		let mut next = self.clone();
		for chunk in chunks {
			match next.chunks.entry(chunk.id) {
				Entry::Occupied(_) => return Err(Error::DuplicateChunkId(chunk.id)),
				Entry::Vacant(slot) => {
					let stats = ChunkStats::new(chunk.clone(), tokenizer);
					for (term, tf) in &stats.term_freqs {
						next.postings.entry(term.clone()).or_default().insert(chunk.id, *tf);
					}
					next.total_len += stats.len;
					slot.insert(stats);
				}
			}
		}
		debug!(added = chunks.len(), chunks = next.len(), terms = next.vocabulary_size(), tokenizer = tokenizer.name(), "built index");
		Ok(next)
	}

	/// Returns a copy of this index without the chunks of `doc_id`, and how
	/// many chunks were dropped.
	pub fn without_document(&self, doc_id: &str) -> (Self, usize) {
		let mut next = self.clone();
		let doomed: Vec<ChunkId> = next.chunks.values().filter(|s| s.chunk.doc_id == doc_id).map(|s| s.chunk.id).collect();
		for id in &doomed {
			let Some(stats) = next.chunks.remove(id) else { continue };
			next.total_len -= stats.len;
			for term in stats.term_freqs.keys() {
				if let Some(list) = next.postings.get_mut(term) {
					list.remove(id);
					if list.is_empty() { next.postings.remove(term); }
				}
			}
		}
		(next, doomed.len())
	}

	pub fn len(&self) -> usize { self.chunks.len() }

	pub fn is_empty(&self) -> bool { self.chunks.is_empty() }

	pub fn vocabulary_size(&self) -> usize { self.postings.len() }

	pub fn total_len(&self) -> usize { self.total_len }

	/// Mean chunk length in tokens; 0 for an empty corpus.
	pub fn avg_len(&self) -> f64 {
		if self.chunks.is_empty() { 0.0 } else { self.total_len as f64 / self.chunks.len() as f64 }
	}

	/// Number of chunks containing `term` at least once.
	pub fn doc_freq(&self, term: &str) -> usize { self.postings.get(term).map_or(0, BTreeMap::len) }

	/// Terms with their document frequencies, in term order.
	pub fn doc_freqs(&self) -> impl Iterator<Item = (&str, usize)> {
		self.postings.iter().map(|(t, list)| (t.as_str(), list.len()))
	}

	/// Chunks containing `term` with its frequency in each, ascending id.
	pub fn postings(&self, term: &str) -> impl Iterator<Item = (ChunkId, u32)> + '_ {
		self.postings.get(term).into_iter().flat_map(|list| list.iter().map(|(id, tf)| (*id, *tf)))
	}

	pub fn get(&self, id: ChunkId) -> Option<&ChunkStats> { self.chunks.get(&id) }

	/// Indexed chunks in ascending id order.
	pub fn chunks(&self) -> impl Iterator<Item = &ChunkStats> { self.chunks.values() }

	pub fn document_count(&self) -> usize {
		let mut docs: Vec<&str> = self.chunks.values().map(|s| s.chunk.doc_id.as_str()).collect();
		docs.sort_unstable();
		docs.dedup();
		docs.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tokenize::WhitespaceTokenizer;

	fn corpus() -> Vec<Chunk> {
		vec![
			Chunk::new(1, "a", "net payment net"),
			Chunk::new(2, "a", "payment due"),
			Chunk::new(3, "b", ""),
		]
	}

	#[test]
	fn build_collects_term_statistics() {
		let index = Bm25Index::build(&corpus(), &WhitespaceTokenizer).expect("build");
		assert_eq!(index.len(), 3);
		assert_eq!(index.doc_freq("net"), 1);
		assert_eq!(index.doc_freq("payment"), 2);
		assert_eq!(index.doc_freq("absent"), 0);
		assert_eq!(index.get(1).expect("chunk 1").term_freq("net"), 2);
		assert_eq!(index.get(3).expect("chunk 3").len, 0);
		assert_eq!(index.postings("payment").collect::<Vec<_>>(), [(1, 1), (2, 1)]);
		assert_eq!(index.postings("absent").count(), 0);
		assert!((index.avg_len() - 5.0 / 3.0).abs() < 1e-12);
		assert_eq!(index.document_count(), 2);
	}

	#[test]
	fn duplicate_ids_are_rejected_with_the_colliding_id() {
		let mut chunks = corpus();
		chunks.push(Chunk::new(2, "c", "again"));
		let err = Bm25Index::build(&chunks, &WhitespaceTokenizer).unwrap_err();
		assert_eq!(err, Error::DuplicateChunkId(2));
	}

	#[test]
	fn empty_corpus_builds_an_empty_index() {
		let index = Bm25Index::build(&[], &WhitespaceTokenizer).expect("build");
		assert!(index.is_empty());
		assert_eq!(index.avg_len(), 0.0);
	}

	#[test]
	fn removing_a_document_matches_a_fresh_build() {
		let full = Bm25Index::build(&corpus(), &WhitespaceTokenizer).expect("build");
		let (pruned, removed) = full.without_document("a");
		assert_eq!(removed, 2);
		assert_eq!(full.len(), 3, "source index is untouched");

		let fresh = Bm25Index::build(&corpus()[2..], &WhitespaceTokenizer).expect("build");
		assert_eq!(pruned.len(), fresh.len());
		assert_eq!(pruned.total_len(), fresh.total_len());
		assert_eq!(pruned.doc_freqs().collect::<Vec<_>>(), fresh.doc_freqs().collect::<Vec<_>>());
		assert_eq!(pruned.postings("payment").count(), 0);
		assert_eq!(pruned.vocabulary_size(), 0);
	}

	#[test]
	fn incremental_add_matches_a_fresh_build() {
		let chunks = corpus();
		let partial = Bm25Index::build(&chunks[..1], &WhitespaceTokenizer).expect("build");
		let grown = partial.with_chunks(&chunks[1..], &WhitespaceTokenizer).expect("grow");
		let fresh = Bm25Index::build(&chunks, &WhitespaceTokenizer).expect("build");
		assert_eq!(grown.doc_freqs().collect::<Vec<_>>(), fresh.doc_freqs().collect::<Vec<_>>());
		assert_eq!(grown.total_len(), fresh.total_len());
		assert!(partial.with_chunks(&chunks[..1], &WhitespaceTokenizer).is_err());
	}
}
