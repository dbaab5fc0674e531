//! Best-effort LLM stages layered over the deterministic ranking.
//!
//! Both stages return plain `Result`s; [`best_effort`] bounds them with a
//! timeout and turns any failure into `None`, so callers keep the ranking they
//! already have.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use concierge_core::error::CollaboratorError;
use concierge_core::traits::ChatModel;
use concierge_core::types::RankedResult;

/// Proposes a new ordering of result titles.
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(&self, query: &str, results: &[RankedResult]) -> Result<Vec<String>, CollaboratorError>;
}

/// Proposes one short note per result position.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, query: &str, results: &[RankedResult]) -> Result<Vec<String>, CollaboratorError>;
}

pub struct LlmReranker {
    model: Arc<dyn ChatModel>,
}

impl LlmReranker {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Reranker for LlmReranker {
    async fn rerank(&self, query: &str, results: &[RankedResult]) -> Result<Vec<String>, CollaboratorError> {
        let items = results
            .iter()
            .map(|r| format!("- {}: {}", r.item.title, r.item.description))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Given the user query and a list of items (title + desc), return the best top items in order. \
             Only re-rank; do not invent new items.\nQuery: {}\n\nItems:\n{}\n\n\
             Respond with the reordered list of titles separated by newlines.",
            query, items
        );
        let raw = self.model.complete("You are a ranking assistant.", &prompt, 0.0).await?;
        response_lines(&raw)
    }
}

pub struct LlmEnricher {
    model: Arc<dyn ChatModel>,
}

impl LlmEnricher {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Enricher for LlmEnricher {
    async fn enrich(&self, query: &str, results: &[RankedResult]) -> Result<Vec<String>, CollaboratorError> {
        let titles = results.iter().map(|r| r.item.title.as_str()).collect::<Vec<_>>().join("\n");
        let prompt = format!(
            "For each item below, suggest 1-2 reputable brand models and a short reason. \
             Output one line per item as: Title — Brands: <brand1, brand2> — Note: <why>.\n\
             Query: {}\nItems:\n{}",
            query, titles
        );
        let raw = self
            .model
            .complete("You enrich recommendations with concrete brands.", &prompt, 0.2)
            .await?;
        response_lines(&raw)
    }
}

/// Non-empty lines with list markers and padding stripped.
fn response_lines(raw: &str) -> Result<Vec<String>, CollaboratorError> {
    let lines: Vec<String> = raw
        .lines()
        .map(|l| l.trim_matches(|c: char| c == '-' || c.is_whitespace()).to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(CollaboratorError::Malformed("empty response".to_string()));
    }
    Ok(lines)
}

/// Reorder `results` by `order` (titles). Unknown and repeated titles are
/// ignored; results never mentioned keep their relative order at the tail.
pub fn apply_order(results: Vec<RankedResult>, order: &[String]) -> Vec<RankedResult> {
    let mut placed: HashSet<usize> = HashSet::new();
    let mut head = Vec::with_capacity(results.len());
    for title in order {
        if let Some(i) = results.iter().position(|r| &r.item.title == title) {
            if placed.insert(i) {
                head.push(i);
            }
        }
    }
    let tail = (0..results.len()).filter(|i| !placed.contains(i)).collect::<Vec<_>>();
    let mut slots: Vec<Option<RankedResult>> = results.into_iter().map(Some).collect();
    head.into_iter().chain(tail).filter_map(|i| slots[i].take()).collect()
}

/// Fill missing rationales positionally from `notes`; existing ones win.
pub fn apply_notes(results: &mut [RankedResult], notes: &[String]) {
    for (r, note) in results.iter_mut().zip(notes) {
        if r.why.is_none() {
            r.why = Some(note.clone());
        }
    }
}

/// Await `fut` for at most `timeout`. Failures are logged and become `None`.
pub async fn best_effort<T, F>(stage: &str, timeout: Duration, fut: F) -> Option<T>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    let outcome = match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_) => Err(CollaboratorError::Timeout(timeout)),
    };
    match outcome {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(stage, error = %e, "collaborator failed, keeping deterministic result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::types::CatalogItem;

    fn results() -> Vec<RankedResult> {
        ["A", "B", "C"]
            .iter()
            .enumerate()
            .map(|(i, t)| RankedResult { item: CatalogItem::new(i as u32 + 1, *t, ""), score: 0.0, why: None })
            .collect()
    }

    fn titles(rs: &[RankedResult]) -> Vec<&str> {
        rs.iter().map(|r| r.item.title.as_str()).collect()
    }

    #[test]
    fn order_moves_mentioned_titles_first() {
        let out = apply_order(results(), &["C".to_string(), "A".to_string()]);
        assert_eq!(titles(&out), ["C", "A", "B"]);
    }

    #[test]
    fn unknown_and_duplicate_titles_are_ignored() {
        let order = ["Z", "B", "B", "nope"].map(String::from);
        let out = apply_order(results(), &order);
        assert_eq!(titles(&out), ["B", "A", "C"]);
    }

    #[test]
    fn notes_only_fill_missing_why() {
        let mut rs = results();
        rs[0].why = Some("quiet".to_string());
        apply_notes(&mut rs, &["n1".to_string(), "n2".to_string()]);
        assert_eq!(rs[0].why.as_deref(), Some("quiet"));
        assert_eq!(rs[1].why.as_deref(), Some("n2"));
        assert_eq!(rs[2].why, None);
    }

    #[test]
    fn response_lines_strip_markers() {
        let lines = response_lines("- Running shoes\n\n  - Mechanical keyboard  \n").unwrap();
        assert_eq!(lines, ["Running shoes", "Mechanical keyboard"]);
        assert!(response_lines(" \n-\n").is_err());
    }
}
