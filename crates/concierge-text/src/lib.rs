//! concierge-text
//!
//! Tantivy-based full-text retrieval over document chunks, used by the
//! question-answering handler. See `index` for the in-memory index and
//! `retriever` for loading a docs directory.
pub mod tantivy_utils;
pub mod index;
pub mod retriever;

pub use index::DocumentIndex;
pub use retriever::Retriever;
