use std::collections::BTreeMap;

use lexdb_core::types::{ChunkId, ScoredResult};

use crate::index::Bm25Index;

/// The `k` best entries of `scores`, highest score first, enriched with the
/// chunk text and document id from `index`.
///
/// Equal scores are ordered by ascending chunk id. `k` larger than the corpus
/// returns every chunk; `k == 0` returns nothing. Ids missing from `index`
/// are skipped.
pub fn top_k(scores: &BTreeMap<ChunkId, f64>, k: usize, index: &Bm25Index) -> Vec<ScoredResult> {
	if k == 0 || scores.is_empty() { return Vec::new(); }
	let mut ranked: Vec<(ChunkId, f64)> = scores.iter().map(|(id, score)| (*id, *score)).collect();
	ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
	ranked
		.into_iter()
		.filter_map(|(id, score)| {
			let stats = index.get(id)?;
			Some(ScoredResult { chunk_id: id, score, doc_id: stats.chunk.doc_id.clone(), text: stats.chunk.text.clone() })
		})
		.take(k)
		.collect()
}
