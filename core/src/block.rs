use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};
use crate::{DocId, Token};

pub const BLOCK_PREFIX: &str = "BLOCK";
pub const BLOCK_SUFFIX: &str = ".txt";

/// One in-progress in-memory block: term -> postings in arrival order.
/// `encoded_bytes` tracks the approximate serialized size of the block
/// (term bytes plus decimal posting widths plus separators).
#[derive(Default)]
struct Block {
    postings: HashMap<String, Vec<DocId>>,
    encoded_bytes: usize,
}

impl Block {
    /// Absorb one token. The budget check happens after this, so a
    /// token is never rejected for overflowing the block.
    fn absorb(&mut self, token: Token) {
        let width = decimal_width(token.doc_id) + 1;
        match self.postings.entry(token.term) {
            Entry::Vacant(slot) => {
                self.encoded_bytes += slot.key().len() + 1 + width;
                slot.insert(vec![token.doc_id]);
            }
            Entry::Occupied(mut slot) => {
                self.encoded_bytes += width;
                slot.get_mut().push(token.doc_id);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

fn decimal_width(mut id: DocId) -> usize {
    let mut width = 1;
    while id >= 10 {
        id /= 10;
        width += 1;
    }
    width
}

/// Consume the token stream sequentially, flushing a sorted block file
/// whenever the in-memory block exceeds `budget_bytes`. A non-empty
/// final block is flushed even when under budget.
pub fn build_blocks<I>(tokens: I, dir: &Path, budget_bytes: usize) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = Token>,
{
    fs::create_dir_all(dir)?;

    let mut files = Vec::new();
    let mut block = Block::default();
    let mut number = 0;

    for token in tokens {
        block.absorb(token);
        if block.encoded_bytes > budget_bytes {
            number += 1;
            files.push(write_block(dir, number, &block)?);
            block = Block::default();
        }
    }
    if !block.is_empty() {
        number += 1;
        files.push(write_block(dir, number, &block)?);
    }

    Ok(files)
}

pub fn block_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("{BLOCK_PREFIX}{number}{BLOCK_SUFFIX}"))
}

/// Write a block as `term doc_id doc_id ...` lines, terms sorted
/// lexicographically. The file is written under a temporary name and
/// renamed so readers only ever see completed blocks.
fn write_block(dir: &Path, number: usize, block: &Block) -> Result<PathBuf> {
    let path = block_path(dir, number);
    let tmp = path.with_extension("tmp");

    let mut terms: Vec<&String> = block.postings.keys().collect();
    terms.sort_unstable();

    let mut writer = BufWriter::new(File::create(&tmp)?);
    for term in &terms {
        write_record(&mut writer, term, &block.postings[*term])?;
    }
    writer.flush()?;
    fs::rename(&tmp, &path)?;

    tracing::info!(
        block = number,
        terms = terms.len(),
        bytes = block.encoded_bytes,
        "flushed block"
    );
    Ok(path)
}

pub(crate) fn write_record<W: Write>(writer: &mut W, term: &str, postings: &[DocId]) -> Result<()> {
    let ids = postings
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{term} {ids}")?;
    Ok(())
}

/// Parse one `term doc_id doc_id ...` line from a block or index file.
pub fn parse_record(line: &str, file: &Path, line_no: usize) -> Result<(String, Vec<DocId>)> {
    let mut fields = line.split_whitespace();
    let term = fields
        .next()
        .ok_or_else(|| EngineError::decode(file, line_no, "empty record"))?;

    let mut postings = Vec::new();
    for field in fields {
        let id = field
            .parse::<DocId>()
            .map_err(|_| EngineError::decode(file, line_no, format!("invalid document id `{field}`")))?;
        postings.push(id);
    }
    if postings.is_empty() {
        return Err(EngineError::decode(file, line_no, "term without postings"));
    }
    Ok((term.to_string(), postings))
}

/// Read a whole block file back as (term, postings) records.
pub fn read_block(path: &Path) -> Result<Vec<(String, Vec<DocId>)>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        records.push(parse_record(&line, path, idx + 1)?);
    }
    Ok(records)
}
