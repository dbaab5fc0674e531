//! Loads a docs directory into a [`DocumentIndex`] and answers passage lookups.
use anyhow::Result;
use std::path::Path;

use concierge_core::data_processor::{ChunkingConfig, DataProcessor};
use concierge_core::traits::TextIndexer;
use concierge_core::types::RetrievedPassage;

use crate::index::DocumentIndex;

pub struct Retriever {
    index: DocumentIndex,
    empty: bool,
}

impl Retriever {
    pub fn from_dir(docs_dir: &Path, chunking: ChunkingConfig) -> Result<Self> {
        let chunks = DataProcessor::new(chunking).process_directory(docs_dir)?;
        let index = DocumentIndex::new()?;
        index.index(&chunks)?;
        Ok(Self { index, empty: chunks.is_empty() })
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Top `k` passages for `query`. An empty corpus yields a single
    /// `system` placeholder passage so callers always have context to show.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>> {
        if self.empty {
            return Ok(vec![RetrievedPassage {
                text: "No index available.".to_string(),
                source: "system".to_string(),
                score: 0.0,
            }]);
        }
        self.index.search(query, k)
    }
}
