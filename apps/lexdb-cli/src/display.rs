//! Terminal formatting for query results and corpus stats.

use lexdb_core::ScoredResult;
use lexdb_text::Bm25Index;

const PREVIEW_CHARS: usize = 240;

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS { return flat; }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{cut}…")
}

pub fn print_results(query: &str, results: &[ScoredResult]) {
    println!("Found {} results for: \"{}\"", results.len(), query);
    for (i, result) in results.iter().enumerate() {
        println!("\n  {:>2}. score={:.4}  chunk={}  doc={}", i + 1, result.score, result.chunk_id, result.doc_id);
        println!("      {}", preview(&result.text));
    }
}

pub fn print_stats(index: &Bm25Index, tokenizer: &str) {
    println!("documents      : {}", index.document_count());
    println!("chunks         : {}", index.len());
    println!("vocabulary     : {}", index.vocabulary_size());
    println!("avg chunk len  : {:.2} tokens", index.avg_len());
    println!("tokenizer      : {tokenizer}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_flattens_whitespace() {
        assert_eq!(preview("net\n\n thirty\tdays"), "net thirty days");
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let long = "é".repeat(PREVIEW_CHARS + 10);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 1);
        assert!(shown.ends_with('…'));
    }
}
