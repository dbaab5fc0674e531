use std::sync::Arc;
use std::time::Duration;

use concierge_core::config::RecommenderSettings;
use concierge_core::traits::ChatModel;
use concierge_core::types::RankedResult;

use crate::catalog::Catalog;
use crate::collaborator::{apply_notes, apply_order, best_effort, Enricher, LlmEnricher, LlmReranker, Reranker};
use crate::ranker::Ranker;
use crate::synonyms::SynonymTable;
use crate::vectorizer::VectorizerOptions;

/// Deterministic ranking plus optional LLM re-ranking and enrichment.
pub struct Recommender {
    ranker: Ranker,
    reranker: Option<Box<dyn Reranker>>,
    enricher: Option<Box<dyn Enricher>>,
    online: bool,
    timeout: Duration,
}

impl Recommender {
    pub fn new(ranker: Ranker) -> Self {
        Self { ranker, reranker: None, enricher: None, online: false, timeout: Duration::from_secs(20) }
    }

    /// Build from settings; a model is attached only when online enrichment is on.
    pub fn from_settings(settings: &RecommenderSettings, catalog: Catalog, model: Option<Arc<dyn ChatModel>>) -> Self {
        let options = VectorizerOptions { min_df: settings.min_df, ..VectorizerOptions::default() };
        let mut rec = Self::new(Ranker::new(catalog, SynonymTable::seeded(), options))
            .with_online(settings.online_enrichment)
            .with_timeout(Duration::from_secs(settings.collaborator_timeout_secs));
        if let Some(model) = model {
            rec = rec
                .with_reranker(Box::new(LlmReranker::new(model.clone())))
                .with_enricher(Box::new(LlmEnricher::new(model)));
        }
        rec
    }

    pub fn with_reranker(mut self, reranker: Box<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    pub fn with_enricher(mut self, enricher: Box<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// The deterministic ranking alone.
    pub fn rank(&self, query: &str, k: usize) -> Vec<RankedResult> {
        self.ranker.rank(query, k)
    }

    /// Rank, then let the collaborators reorder and annotate when enabled.
    /// Collaborator failures leave the ranking untouched.
    pub async fn recommend(&self, query: &str, k: usize) -> Vec<RankedResult> {
        let mut results = self.ranker.rank(query, k);
        if !self.online || results.is_empty() {
            return results;
        }

        match &self.reranker {
            Some(reranker) => {
                if let Some(order) = best_effort("rerank", self.timeout, reranker.rerank(query, &results)).await {
                    results = apply_order(results, &order);
                }
            }
            None => tracing::debug!("re-ranking skipped: no model configured"),
        }

        match &self.enricher {
            Some(enricher) => {
                if let Some(notes) = best_effort("enrich", self.timeout, enricher.enrich(query, &results)).await {
                    apply_notes(&mut results, &notes);
                }
            }
            None => tracing::debug!("enrichment skipped: no model configured"),
        }

        results
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(Ranker::default())
    }
}
