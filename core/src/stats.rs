use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::analyze::AnalyzerOptions;
use crate::error::Result;
use crate::DocId;

pub const STATS_FILE: &str = "stats.bin";
pub const DOCS_FILE: &str = "docs.bin";
pub const META_FILE: &str = "meta.json";

/// Per-document token counts plus collection-wide aggregates, computed
/// by the corpus side during tokenization and read-only to the ranker.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DocumentStats {
    doc_lengths: HashMap<DocId, u32>,
    total_length: u64,
}

impl DocumentStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, doc_id: DocId, length: u32) {
        if let Some(previous) = self.doc_lengths.insert(doc_id, length) {
            self.total_length -= previous as u64;
        }
        self.total_length += length as u64;
    }

    pub fn doc_length(&self, doc_id: DocId) -> Option<u32> {
        self.doc_lengths.get(&doc_id).copied()
    }

    pub fn num_docs(&self) -> u32 {
        self.doc_lengths.len() as u32
    }

    pub fn avg_length(&self) -> f64 {
        if self.doc_lengths.is_empty() {
            0.0
        } else {
            self.total_length as f64 / self.doc_lengths.len() as f64
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let mut f = File::create(dir.join(STATS_FILE))?;
        f.write_all(&bincode::serialize(self)?)?;
        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let mut buf = Vec::new();
        File::open(dir.join(STATS_FILE))?.read_to_end(&mut buf)?;
        Ok(bincode::deserialize(&buf)?)
    }
}

/// Display metadata for one ingested document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    pub external_id: String,
    pub title: String,
}

pub fn save_docs(dir: &Path, docs: &HashMap<DocId, DocMeta>) -> Result<()> {
    let mut f = File::create(dir.join(DOCS_FILE))?;
    f.write_all(&bincode::serialize(docs)?)?;
    Ok(())
}

pub fn load_docs(dir: &Path) -> Result<HashMap<DocId, DocMeta>> {
    let mut buf = Vec::new();
    File::open(dir.join(DOCS_FILE))?.read_to_end(&mut buf)?;
    Ok(bincode::deserialize(&buf)?)
}

/// Index-level metadata, including the analyzer options the index was
/// built with so queries can be normalized identically.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexMeta {
    pub num_docs: u32,
    pub analyzer: AnalyzerOptions,
    pub created_at: String,
    pub version: u32,
}

impl IndexMeta {
    pub fn save(&self, dir: &Path) -> Result<()> {
        let mut f = File::create(dir.join(META_FILE))?;
        f.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let mut buf = String::new();
        File::open(dir.join(META_FILE))?.read_to_string(&mut buf)?;
        Ok(serde_json::from_str(&buf)?)
    }
}
