//! lexdb-text
//!
//! In-memory BM25 ranking over a chunk corpus: tokenizers, the term statistics
//! index, the scorer, top-K selection and the [`Ranker`] that ties them
//! together behind a build-then-publish snapshot.

pub mod tokenize;
pub mod index;
pub mod scoring;
pub mod select;
pub mod search;

pub use index::Bm25Index;
pub use scoring::Bm25Params;
pub use search::Ranker;
pub use tokenize::{tokenizer_for, NormalizingTokenizer, WhitespaceTokenizer};
