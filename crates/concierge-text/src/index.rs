use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};

use concierge_core::traits::TextIndexer;
use concierge_core::types::{DocumentChunk, RetrievedPassage};

use crate::tantivy_utils::{build_schema, register_tokenizer, PassageFields};

const WRITER_MEMORY_BYTES: usize = 50_000_000;

/// In-memory BM25 index over document chunks.
pub struct DocumentIndex {
	index: Index,
	reader: IndexReader,
	fields: PassageFields,
}

impl DocumentIndex {
	pub fn new() -> Result<Self> {
		let (schema, fields) = build_schema();
		let index = Index::create_in_ram(schema);
		register_tokenizer(&index);
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		Ok(Self { index, reader, fields })
	}

	pub fn num_passages(&self) -> u64 {
		self.reader.searcher().num_docs()
	}

	fn progress_bar(len: usize) -> ProgressBar {
		let pb = ProgressBar::new(len as u64);
		if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)") {
			pb.set_style(style.progress_chars("#>-"));
		}
		pb
	}
}

impl TextIndexer for DocumentIndex {
	fn index(&self, chunks: &[DocumentChunk]) -> Result<()> {
		if chunks.is_empty() { tracing::debug!("no chunks to index"); return Ok(()); }
		let mut writer: IndexWriter = self.index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;
		let pb = Self::progress_bar(chunks.len());
		for c in chunks {
			writer.add_document(doc!(
				self.fields.id => c.id.clone(),
				self.fields.doc_id => c.doc_id.clone(),
				self.fields.source => c.source.clone(),
				self.fields.text => c.content.clone(),
			))?;
			pb.inc(1);
		}
		writer.commit()?;
		pb.finish_and_clear();
		self.reader.reload()?;
		tracing::info!(chunks = chunks.len(), "indexed document chunks");
		Ok(())
	}

	fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>> {
		if k == 0 || query.trim().is_empty() { return Ok(vec![]); }
		let searcher = self.reader.searcher();
		let qp = QueryParser::for_index(&self.index, vec![self.fields.text]);
		let (q, errors) = qp.parse_query_lenient(query);
		if !errors.is_empty() { tracing::debug!(?errors, "lenient query parse dropped parts of the question"); }
		let top_docs = searcher.search(&*q, &TopDocs::with_limit(k))?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr)?;
			let text = doc.get_first(self.fields.text).and_then(|v| v.as_str()).unwrap_or("").to_string();
			let source = doc.get_first(self.fields.source).and_then(|v| v.as_str()).unwrap_or("unknown").to_string();
			hits.push(RetrievedPassage { text, source, score });
		}
		Ok(hits)
	}
}
