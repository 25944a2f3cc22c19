use std::collections::BTreeSet;

use lexdb_core::traits::Tokenizer;
use lexdb_core::Chunk;
use lexdb_text::scoring::score;
use lexdb_text::select::top_k;
use lexdb_text::{Bm25Index, Bm25Params, NormalizingTokenizer, WhitespaceTokenizer};
use proptest::prelude::*;

const VOCAB: &[&str] = &["net", "payment", "terms", "breach", "contract", "notice", "days", "Party", "fee,"];

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 0..12).prop_map(|words| words.join(" "))
}

fn corpus_strategy() -> impl Strategy<Value = Vec<Chunk>> {
    prop::collection::vec(text_strategy(), 0..10).prop_map(|texts| {
        texts.into_iter().enumerate().map(|(i, text)| Chunk::new(i as u64 * 3 + 1, format!("doc{}", i % 3), text)).collect()
    })
}

proptest! {
    #[test]
    fn score_domain_equals_corpus_ids(chunks in corpus_strategy(), query in text_strategy()) {
        let index = Bm25Index::build(&chunks, &WhitespaceTokenizer).unwrap();
        let scores = score(&index, &Bm25Params::default(), &WhitespaceTokenizer.tokenize(&query));
        let expected: BTreeSet<u64> = chunks.iter().map(|c| c.id).collect();
        let actual: BTreeSet<u64> = scores.keys().copied().collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(scores.values().all(|s| s.is_finite() && *s >= 0.0));
    }

    #[test]
    fn tokenization_is_deterministic(text in ".{0,64}") {
        prop_assert_eq!(WhitespaceTokenizer.tokenize(&text), WhitespaceTokenizer.tokenize(&text));
        prop_assert_eq!(NormalizingTokenizer.tokenize(&text), NormalizingTokenizer.tokenize(&text));
    }

    #[test]
    fn rebuilding_gives_identical_scores(chunks in corpus_strategy(), query in text_strategy()) {
        let tokens = WhitespaceTokenizer.tokenize(&query);
        let first = Bm25Index::build(&chunks, &WhitespaceTokenizer).unwrap();
        let second = Bm25Index::build(&chunks, &WhitespaceTokenizer).unwrap();
        let params = Bm25Params::default();
        prop_assert_eq!(score(&first, &params, &tokens), score(&second, &params, &tokens));
    }

    #[test]
    fn more_occurrences_never_score_lower(low in 0usize..5, extra in 0usize..5, filler in 0usize..4) {
        let high = low + extra;
        let len = high + filler + 1;
        let make = |tf: usize| {
            let mut words = vec!["payment"; tf];
            words.extend(std::iter::repeat("other").take(len - tf));
            words.join(" ")
        };
        let chunks = vec![Chunk::new(1, "d", make(low)), Chunk::new(2, "d", make(high)), Chunk::new(3, "d", "unrelated text")];
        let index = Bm25Index::build(&chunks, &WhitespaceTokenizer).unwrap();
        let scores = score(&index, &Bm25Params::default(), &["payment".to_string()]);
        prop_assert!(scores[&2] >= scores[&1]);
    }

    #[test]
    fn top_k_boundaries(chunks in corpus_strategy(), query in text_strategy(), k in 0usize..15) {
        let index = Bm25Index::build(&chunks, &WhitespaceTokenizer).unwrap();
        let scores = score(&index, &Bm25Params::default(), &WhitespaceTokenizer.tokenize(&query));
        let top = top_k(&scores, k, &index);
        prop_assert_eq!(top.len(), k.min(chunks.len()));
        prop_assert!(top_k(&scores, 0, &index).is_empty());
        for pair in top.windows(2) {
            prop_assert!(pair[0].score > pair[1].score || (pair[0].score == pair[1].score && pair[0].chunk_id < pair[1].chunk_id));
        }
    }

    #[test]
    fn ties_keep_the_same_order_across_calls(copies in 2usize..6, k in 1usize..8) {
        let chunks: Vec<Chunk> = (0..copies).map(|i| Chunk::new((copies - i) as u64 * 10, "d", "net payment")).collect();
        let index = Bm25Index::build(&chunks, &WhitespaceTokenizer).unwrap();
        let scores = score(&index, &Bm25Params::default(), &["payment".to_string()]);
        let first: Vec<u64> = top_k(&scores, k, &index).iter().map(|r| r.chunk_id).collect();
        let second: Vec<u64> = top_k(&scores, k, &index).iter().map(|r| r.chunk_id).collect();
        prop_assert_eq!(&first, &second);
        let mut sorted = first.clone();
        sorted.sort_unstable();
        prop_assert_eq!(first, sorted);
    }
}
