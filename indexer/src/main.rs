use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use spimi_core::analyze::{Analyzer, AnalyzerOptions};
use spimi_core::index::construct;
use spimi_core::stats::{save_docs, DocMeta, DocumentStats, IndexMeta};
use spimi_core::{DocId, Token};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    title: String,
    body: String,
}

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a SPIMI inverted index from JSON documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Approximate in-memory block budget in bytes
        #[arg(long, default_value_t = 1024 * 1024)]
        block_budget: usize,
        /// Fold terms to lowercase
        #[arg(long, default_value_t = false)]
        case_folding: bool,
        /// Drop stop words
        #[arg(long, default_value_t = false)]
        remove_stopwords: bool,
        /// Drop purely numeric tokens
        #[arg(long, default_value_t = false)]
        remove_numbers: bool,
        /// Apply Porter stemming
        #[arg(long, default_value_t = false)]
        stem: bool,
        /// Enable every normalization step
        #[arg(long, default_value_t = false)]
        all: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            block_budget,
            case_folding,
            remove_stopwords,
            remove_numbers,
            stem,
            all,
        } => {
            let options = AnalyzerOptions {
                case_folding: case_folding || all,
                remove_stopwords: remove_stopwords || all,
                remove_numbers: remove_numbers || all,
                stem: stem || all,
            };
            build(&input, &output, block_budget, options)
        }
    }
}

fn build(input: &str, output: &str, block_budget: usize, options: AnalyzerOptions) -> Result<()> {
    let out_dir = PathBuf::from(output);
    fs::create_dir_all(&out_dir)?;

    let analyzer = Analyzer::new(options);
    let mut next_doc_id: DocId = 0;
    let mut tokens: Vec<Token> = Vec::new();
    let mut stats = DocumentStats::new();
    let mut docs: HashMap<DocId, DocMeta> = HashMap::new();

    for file in collect_input_files(Path::new(input)) {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            ingest_jsonl(&file, &analyzer, &mut next_doc_id, &mut tokens, &mut stats, &mut docs)?;
        } else {
            ingest_json(&file, &analyzer, &mut next_doc_id, &mut tokens, &mut stats, &mut docs)?;
        }
    }

    let num_docs = next_doc_id;
    tracing::info!(num_docs, num_tokens = tokens.len(), "ingested documents");

    let index = construct(tokens, &out_dir, block_budget)?;
    tracing::info!(terms = index.len(), "index constructed");

    stats.save(&out_dir)?;
    save_docs(&out_dir, &docs)?;
    let meta = IndexMeta {
        num_docs,
        analyzer: options,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .context("formatting index creation timestamp")?,
        version: 1,
    };
    meta.save(&out_dir)?;

    tracing::info!(output, "index build complete");
    Ok(())
}

fn collect_input_files(input: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn ingest_jsonl(
    file: &Path,
    analyzer: &Analyzer,
    next_doc_id: &mut DocId,
    tokens: &mut Vec<Token>,
    stats: &mut DocumentStats,
    docs: &mut HashMap<DocId, DocMeta>,
) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc = serde_json::from_str(&line)?;
        ingest_doc(doc, analyzer, next_doc_id, tokens, stats, docs);
    }
    Ok(())
}

fn ingest_json(
    file: &Path,
    analyzer: &Analyzer,
    next_doc_id: &mut DocId,
    tokens: &mut Vec<Token>,
    stats: &mut DocumentStats,
    docs: &mut HashMap<DocId, DocMeta>,
) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: InputDoc = serde_json::from_value(v)?;
                ingest_doc(doc, analyzer, next_doc_id, tokens, stats, docs);
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)?;
            ingest_doc(doc, analyzer, next_doc_id, tokens, stats, docs);
        }
        _ => anyhow::bail!(
            "unsupported document file {}: expected a JSON object or array",
            file.display()
        ),
    }
    Ok(())
}

fn ingest_doc(
    doc: InputDoc,
    analyzer: &Analyzer,
    next_doc_id: &mut DocId,
    tokens: &mut Vec<Token>,
    stats: &mut DocumentStats,
    docs: &mut HashMap<DocId, DocMeta>,
) {
    let doc_id = *next_doc_id;
    *next_doc_id += 1;

    let terms = analyzer.analyze(&doc.body);
    stats.add_document(doc_id, terms.len() as u32);
    tokens.extend(terms.into_iter().map(|term| Token { term, doc_id }));

    docs.insert(
        doc_id,
        DocMeta {
            external_id: doc.id,
            title: doc.title,
        },
    );
}
