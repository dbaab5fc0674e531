use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::types::{DocumentChunk, RetrievedPassage};

/// Full-text index over document chunks used for question answering.
pub trait TextIndexer: Send + Sync {
    fn index(&self, chunks: &[DocumentChunk]) -> anyhow::Result<()>;
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<RetrievedPassage>>;
}

/// A hosted or local language model. Implementations own transport, auth and
/// retries; callers bound each call with their own timeout.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, CollaboratorError>;
}

/// A text-to-image backend. Returns encoded image bytes (any format the
/// `image` crate can decode); `negative` lists content the backend must avoid.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        negative: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, CollaboratorError>;
}
