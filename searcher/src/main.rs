use anyhow::Result;
use clap::{Parser, ValueEnum};
use spimi_core::analyze::Analyzer;
use spimi_core::index::{InvertedIndex, INDEX_FILE};
use spimi_core::query::{execute, or_query, Combinator};
use spimi_core::rank::{rank, Bm25Params};
use spimi_core::stats::{load_docs, DocumentStats, IndexMeta};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    And,
    Or,
    Ranked,
}

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Query a SPIMI inverted index", long_about = None)]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: String,
    /// Query mode: Boolean AND/OR or BM25-ranked
    #[arg(long, value_enum, default_value_t = Mode::And)]
    mode: Mode,
    /// BM25 k1 parameter (ranked mode)
    #[arg(long, default_value_t = 0.5)]
    k1: f64,
    /// BM25 b parameter (ranked mode)
    #[arg(long, default_value_t = 0.5)]
    b: f64,
    /// Maximum number of results printed
    #[arg(long, default_value_t = 10)]
    limit: usize,
    /// Free-text query
    query: Vec<String>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let dir = PathBuf::from(&args.index);
    let meta = IndexMeta::load(&dir)?;
    let index = InvertedIndex::load(&dir.join(INDEX_FILE))?;
    let docs = load_docs(&dir)?;
    tracing::info!(terms = index.len(), num_docs = meta.num_docs, "index loaded");

    // Normalize the query exactly the way the index was built.
    let analyzer = Analyzer::new(meta.analyzer);
    let terms = analyzer.analyze(&args.query.join(" "));
    if terms.is_empty() {
        println!("no query terms after normalization");
        return Ok(());
    }

    match args.mode {
        Mode::And | Mode::Or => {
            let combinator = if args.mode == Mode::And {
                Combinator::And
            } else {
                Combinator::Or
            };
            let results = execute(&index, &terms, combinator);
            println!("{} result(s)", results.len());
            for doc_id in results.iter().take(args.limit) {
                match docs.get(doc_id) {
                    Some(meta) => println!("{doc_id}\t{}", meta.title),
                    None => println!("{doc_id}"),
                }
            }
        }
        Mode::Ranked => {
            let stats = DocumentStats::load(&dir)?;
            let params = Bm25Params { k1: args.k1, b: args.b };
            let candidates = or_query(&index, &terms);
            let ranked = rank(&index, &stats, params, &terms, &candidates);
            println!("{} result(s)", ranked.len());
            for (doc_id, score) in ranked.iter().take(args.limit) {
                match docs.get(doc_id) {
                    Some(meta) => println!("{doc_id}\t{score:.6}\t{}", meta.title),
                    None => println!("{doc_id}\t{score:.6}"),
                }
            }
        }
    }
    Ok(())
}
