use std::collections::BTreeMap;

use lexdb_core::config::{IdfKind, RankerConfig};
use lexdb_core::types::ChunkId;

use crate::index::Bm25Index;

/// BM25 tuning: `k1` saturates term frequency, `b` scales length
/// normalization (0 = none, 1 = full).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
	pub k1: f64,
	pub b: f64,
	pub idf: IdfKind,
	/// Floor factor for negative Okapi IDF values. Unused by `IdfKind::Lucene`.
	pub epsilon: f64,
}

impl Default for Bm25Params {
	fn default() -> Self { Self::from(&RankerConfig::default()) }
}

impl From<&RankerConfig> for Bm25Params {
	fn from(config: &RankerConfig) -> Self {
		Self { k1: config.k1, b: config.b, idf: config.idf, epsilon: config.epsilon }
	}
}

/// Unfloored inverse document frequency.
pub fn idf(kind: IdfKind, doc_freq: usize, num_docs: usize) -> f64 {
	let n = num_docs as f64;
	let df = doc_freq as f64;
	let ratio = (n - df + 0.5) / (df + 0.5);
	match kind {
		IdfKind::Lucene => (1.0 + ratio).ln(),
		IdfKind::Okapi => ratio.ln(),
	}
}

/// Saturating, length-normalized term frequency component.
pub fn term_weight(params: &Bm25Params, term_freq: u32, doc_len: usize, avg_len: f64) -> f64 {
	let tf = f64::from(term_freq);
	let length_ratio = if avg_len > 0.0 { doc_len as f64 / avg_len } else { 0.0 };
	let norm = params.k1 * (1.0 - params.b + params.b * length_ratio);
	(tf * (params.k1 + 1.0)) / (tf + norm)
}

/// Per-corpus IDF table, resolving the Okapi floor once per query.
struct IdfTable<'a> {
	index: &'a Bm25Index,
	kind: IdfKind,
	floor: f64,
}

impl<'a> IdfTable<'a> {
	fn new(index: &'a Bm25Index, params: &Bm25Params) -> Self {
		let floor = match params.idf {
			IdfKind::Lucene => 0.0,
			IdfKind::Okapi => {
				let (sum, count) = index
					.doc_freqs()
					.fold((0.0, 0usize), |(sum, count), (_, df)| (sum + idf(IdfKind::Okapi, df, index.len()), count + 1));
				if count == 0 { 0.0 } else { params.epsilon * sum / count as f64 }
			}
		};
		Self { index, kind: params.idf, floor }
	}

	fn get(&self, doc_freq: usize) -> f64 {
		let raw = idf(self.kind, doc_freq, self.index.len());
		match self.kind {
			IdfKind::Lucene => raw,
			IdfKind::Okapi if raw < 0.0 => self.floor,
			IdfKind::Okapi => raw,
		}
	}
}

/// BM25 score of every chunk in `index` for the given query tokens.
///
/// The result holds one entry per indexed chunk, zero when it shares no term
/// with the query. Each chunk's sum is accumulated in query-token order, so
/// repeated calls give bit-identical scores. Repeated query tokens count once
/// per occurrence.
pub fn score(index: &Bm25Index, params: &Bm25Params, query_tokens: &[String]) -> BTreeMap<ChunkId, f64> {
	let mut scores: BTreeMap<ChunkId, f64> = index.chunks().map(|s| (s.chunk.id, 0.0)).collect();
	if index.is_empty() || query_tokens.is_empty() { return scores; }

	let idfs = IdfTable::new(index, params);
	let avg_len = index.avg_len();
	for token in query_tokens {
		let doc_freq = index.doc_freq(token);
		if doc_freq == 0 { continue; }
		let weight = idfs.get(doc_freq);
		for (id, tf) in index.postings(token) {
			let (Some(stats), Some(total)) = (index.get(id), scores.get_mut(&id)) else { continue };
			*total += weight * term_weight(params, tf, stats.len, avg_len);
		}
	}
	scores
}
