//! concierge-recommend
//!
//! Content-based recommendation over a small fixed catalog:
//! - `normalize`: text canonicalization shared by indexing and querying
//! - `synonyms`: one-level lexical query expansion
//! - `vectorizer`: TF-IDF (unigram + bigram) fitted once over the catalog
//! - `ranker`: cosine ranking with per-term "why" rationales
//! - `collaborator`: best-effort LLM re-ranking and enrichment
//! - `recommender`: the ranker composed with the optional collaborators

pub mod catalog;
pub mod collaborator;
pub mod normalize;
pub mod ranker;
pub mod recommender;
mod stop_words;
pub mod synonyms;
pub mod vectorizer;

pub use catalog::Catalog;
pub use normalize::normalize;
pub use ranker::Ranker;
pub use recommender::Recommender;
pub use synonyms::SynonymTable;
pub use vectorizer::{SparseVector, TfidfVectorizer, VectorizerOptions};
