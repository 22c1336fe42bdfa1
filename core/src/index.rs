use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::block::{build_blocks, parse_record};
use crate::error::{EngineError, Result};
use crate::merge::merge_blocks;
use crate::{DocId, Token};

pub const INDEX_FILE: &str = "index.txt";

/// The merged, queryable term -> postings mapping. Immutable for the
/// lifetime of a query session.
///
/// Postings in merged index files retain per-occurrence multiplicity;
/// the loader counts that multiplicity into a per-term frequency table
/// (used by BM25) and then normalizes each postings list to a sorted,
/// duplicate-free sequence (used by Boolean queries).
#[derive(Debug)]
pub struct InvertedIndex {
    postings: BTreeMap<String, Vec<DocId>>,
    frequencies: HashMap<String, HashMap<DocId, u32>>,
}

impl InvertedIndex {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut postings = BTreeMap::new();
        let mut frequencies = HashMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let (term, raw) = parse_record(&line, path, idx + 1)?;

            let mut freq: HashMap<DocId, u32> = HashMap::new();
            for id in &raw {
                *freq.entry(*id).or_insert(0) += 1;
            }
            let mut ids: Vec<DocId> = freq.keys().copied().collect();
            ids.sort_unstable();

            if postings.insert(term.clone(), ids).is_some() {
                return Err(EngineError::decode(path, idx + 1, format!("duplicate term `{term}`")));
            }
            frequencies.insert(term, freq);
        }

        Ok(Self { postings, frequencies })
    }

    /// A term's postings list, empty if the term is absent. Unknown
    /// terms are a normal condition, not an error.
    pub fn resolve_postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct documents containing `term`.
    pub fn document_frequency(&self, term: &str) -> u32 {
        self.resolve_postings(term).len() as u32
    }

    /// Occurrences of `term` in `doc_id`, from the frequency table
    /// built at load time.
    pub fn term_frequency(&self, term: &str, doc_id: DocId) -> u32 {
        self.frequencies
            .get(term)
            .and_then(|by_doc| by_doc.get(&doc_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

/// Run the full SPIMI pipeline: build bounded blocks from the token
/// stream, merge them, and load the result. If the merged index file
/// already exists the rebuild is skipped and the existing file is
/// loaded as-is.
pub fn construct<I>(tokens: I, dir: &Path, budget_bytes: usize) -> Result<InvertedIndex>
where
    I: IntoIterator<Item = Token>,
{
    let index_path = dir.join(INDEX_FILE);
    if index_path.exists() {
        tracing::info!(index = %index_path.display(), "merged index already present, loading it");
        return InvertedIndex::load(&index_path);
    }

    let block_files = build_blocks(tokens, dir, budget_bytes)?;
    merge_blocks(&block_files, &index_path)?;
    InvertedIndex::load(&index_path)
}
