mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lexdb_core::config::Config;
use lexdb_core::data_processor::DataProcessor;
use lexdb_core::store::JsonChunkStore;
use lexdb_core::traits::ChunkStore;
use lexdb_text::Ranker;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexdb", about = "BM25 retrieval over chunked contract documents", version)]
struct Cli {
    /// Chunk store file (overrides data.store_path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk every .txt file under DIR and store the chunks
    Ingest {
        /// Source directory (defaults to data.txt_dir)
        dir: Option<PathBuf>,
    },

    /// Rank stored chunks against a query
    Query {
        query: String,

        /// Number of results; zero or negative returns nothing
        #[arg(short, long, default_value_t = 5, allow_negative_numbers = true)]
        top: i64,
    },

    /// Remove a document and all of its chunks
    Remove { doc_id: String },

    /// Print corpus statistics
    Stats,
}

/// Result count for `--top`; zero or negative asks for nothing.
fn top_to_k(top: i64) -> usize {
    usize::try_from(top).unwrap_or(0)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let data = config.data()?;
    let store_path = cli.store.clone().unwrap_or_else(|| data.store_path());

    match cli.command {
        Command::Ingest { dir } => {
            let data_dir = dir.unwrap_or_else(|| data.txt_dir());
            let mut store = JsonChunkStore::open(&store_path)?;
            let processor = DataProcessor::with_config(config.chunking()?);
            let documents = processor.process_directory(&data_dir, store.next_chunk_id())?;
            let mut chunk_total = 0usize;
            for document in &documents {
                chunk_total += document.chunks.len();
                store.put_document(&document.doc_id, document.chunks.clone())?;
            }
            info!(documents = documents.len(), chunks = chunk_total, store = %store_path.display(), "ingest complete");
            println!("Ingested {} documents ({} chunks) into {}", documents.len(), chunk_total, store_path.display());
        }
        Command::Query { query, top } => {
            let store = JsonChunkStore::open(&store_path)?;
            let ranker = Ranker::from_config(&config.ranker()?)?;
            ranker.rebuild_from(&store)?;
            let results = ranker.rank(&query, top_to_k(top));
            display::print_results(&query, &results);
        }
        Command::Remove { doc_id } => {
            let mut store = JsonChunkStore::open(&store_path)?;
            let removed = store.delete_document(&doc_id)?;
            if removed == 0 {
                println!("No document named {doc_id:?}");
            } else {
                println!("Removed {doc_id:?} ({removed} chunks)");
            }
        }
        Command::Stats => {
            let store = JsonChunkStore::open(&store_path)?;
            let ranker = Ranker::from_config(&config.ranker()?)?;
            ranker.rebuild_from(&store)?;
            display::print_stats(&ranker.snapshot(), ranker.tokenizer().name());
        }
    }
    Ok(())
}
