pub mod analyze;
pub mod block;
pub mod error;
pub mod index;
pub mod merge;
pub mod query;
pub mod rank;
pub mod stats;

pub use error::{EngineError, Result};

pub type DocId = u32;

/// One normalized term occurrence: the unit of the token stream fed to
/// the block builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    pub doc_id: DocId,
}

impl Token {
    pub fn new<S: Into<String>>(term: S, doc_id: DocId) -> Self {
        Self { term: term.into(), doc_id }
    }
}
