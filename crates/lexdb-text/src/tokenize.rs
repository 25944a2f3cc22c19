use std::sync::Arc;

use lexdb_core::config::TokenizerKind;
use lexdb_core::traits::Tokenizer;

/// Splits on Unicode whitespace and keeps every token verbatim: no case
/// folding, no punctuation stripping. "Payment" and "payment," are distinct.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
	fn name(&self) -> &'static str { "whitespace" }

	fn tokenize(&self, text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_string).collect()
	}
}

/// Whitespace split, then lowercase and trim non-alphanumeric characters from
/// both ends of each token. Tokens left empty are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizingTokenizer;

impl Tokenizer for NormalizingTokenizer {
	fn name(&self) -> &'static str { "normalized" }

	fn tokenize(&self, text: &str) -> Vec<String> {
		text.split_whitespace()
			.map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
			.filter(|t| !t.is_empty())
			.map(str::to_lowercase)
			.collect()
	}
}

pub fn tokenizer_for(kind: TokenizerKind) -> Arc<dyn Tokenizer> {
	match kind {
		TokenizerKind::Whitespace => Arc::new(WhitespaceTokenizer),
		TokenizerKind::Normalized => Arc::new(NormalizingTokenizer),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn whitespace_keeps_case_and_punctuation() {
		let tokens = WhitespaceTokenizer.tokenize("  Net 30,\tpayment\nterms. ");
		assert_eq!(tokens, ["Net", "30,", "payment", "terms."]);
	}

	#[test]
	fn empty_and_blank_input_yield_nothing() {
		assert!(WhitespaceTokenizer.tokenize("").is_empty());
		assert!(WhitespaceTokenizer.tokenize(" \t\n").is_empty());
		assert!(NormalizingTokenizer.tokenize("-- ,,").is_empty());
	}

	#[test]
	fn normalized_folds_case_and_trims_edges() {
		let tokens = NormalizingTokenizer.tokenize("\"Termination\" (Section 4.2), NET-30.");
		assert_eq!(tokens, ["termination", "section", "4.2", "net-30"]);
	}

	#[test]
	fn tokenizer_for_picks_the_configured_strategy() {
		assert_eq!(tokenizer_for(TokenizerKind::Whitespace).name(), "whitespace");
		assert_eq!(tokenizer_for(TokenizerKind::Normalized).name(), "normalized");
	}
}
