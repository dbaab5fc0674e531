use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{LowerCaser, RemoveLongFilter, SimpleTokenizer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

pub const TOKENIZER_NAME: &str = "passage_text";

/// Function words dropped from passages and questions before scoring.
const STOP_WORDS: &[&str] = &[
	"a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having","i","me","my","you","your","we","our","about","please","tell",
];

/// Field handles resolved once from the schema.
#[derive(Clone, Copy)]
pub struct PassageFields {
	pub id: Field,
	pub doc_id: Field,
	pub source: Field,
	pub text: Field,
}

pub fn build_schema() -> (Schema, PassageFields) {
	let mut schema_builder = Schema::builder();
	let id = schema_builder.add_text_field("id", STRING | STORED);
	let doc_id = schema_builder.add_text_field("doc_id", STRING | STORED);
	let source = schema_builder.add_text_field("source", STRING | STORED);
	let text_indexing = TextFieldIndexing::default()
		.set_tokenizer(TOKENIZER_NAME)
		.set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let text = schema_builder.add_text_field("text", TextOptions::default().set_indexing_options(text_indexing).set_stored());
	(schema_builder.build(), PassageFields { id, doc_id, source, text })
}

pub fn register_tokenizer(index: &Index) {
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(RemoveLongFilter::limit(40))
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(STOP_WORDS.iter().map(|s| s.to_string())))
		.build();
	index.tokenizers().register(TOKENIZER_NAME, tokenizer);
}
