//! Domain types shared by the assistant crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub type ChunkId = String;

/// A recommendable item. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u32,
    pub title: String,
    pub description: String,
}

impl CatalogItem {
    pub fn new(id: u32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { id, title: title.into(), description: description.into() }
    }
}

/// One recommendation in ranked order. Serializes flat as
/// `{id, title, description, score, why?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_text: String,
    pub assistant_text: String,
}

/// A user turn entering the assistant.
#[derive(Debug, Clone)]
pub struct Turn {
    pub user_text: String,
}

impl Turn {
    pub fn new(user_text: impl Into<String>) -> Self {
        Self { user_text: user_text.into() }
    }
}

/// The assistant's reply to a turn.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TurnResponse {
    pub response_text: String,
    pub citations: Vec<String>,
    pub image_path: Option<PathBuf>,
    pub metrics: serde_json::Map<String, serde_json::Value>,
}

impl TurnResponse {
    pub fn text(response_text: impl Into<String>) -> Self {
        Self { response_text: response_text.into(), ..Self::default() }
    }
}

/// A chunk of a source document that is independently indexed.
///
/// - `id`: globally unique chunk identifier (`<doc_id>:<chunk_index>`)
/// - `doc_id`: file stem of the source document
/// - `source`: file name shown in citations
/// - `content`: the text payload of the chunk
/// - `chunk_index`/`total_chunks`: position within the parent document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub source: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// A passage returned by document retrieval. Higher `score` is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub text: String,
    pub source: String,
    pub score: f32,
}
