use anyhow::Result;
use std::time::Duration;

use concierge_core::error::CollaboratorError;
use concierge_core::traits::ChatModel;
use concierge_core::types::RetrievedPassage;
use concierge_text::Retriever;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions using the provided context. \
                             Always cite sources like [1], [2]. If not mentioned, say so.";
const NO_CONTEXT: &str = "No relevant context found.";
const EXCERPT_CHARS: usize = 240;

/// Answer `query` from the top `k` retrieved passages.
///
/// Returns the answer and the source of every passage used, in rank order.
/// With a model the answer is generated; without one, or when the model fails
/// or exceeds `timeout`, an extractive answer quoting the passages is used.
pub async fn compose_answer(
    query: &str,
    retriever: &Retriever,
    model: Option<&dyn ChatModel>,
    transcript: &str,
    k: usize,
    timeout: Duration,
) -> Result<(String, Vec<String>)> {
    let passages = retriever.search(query, k)?;
    if passages.is_empty() {
        return Ok((NO_CONTEXT.to_string(), Vec::new()));
    }
    let citations = passages.iter().map(|p| p.source.clone()).collect();

    let answer = match model {
        Some(model) => match generate(model, query, &passages, transcript, timeout).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "answer model failed, using extractive answer");
                extractive_answer(&passages)
            }
        },
        None => extractive_answer(&passages),
    };
    Ok((answer, citations))
}

async fn generate(
    model: &dyn ChatModel,
    query: &str,
    passages: &[RetrievedPassage],
    transcript: &str,
    timeout: Duration,
) -> Result<String, CollaboratorError> {
    let mut prompt = String::new();
    if !transcript.is_empty() {
        prompt.push_str(&format!("Conversation so far:\n{transcript}\n\n"));
    }
    prompt.push_str(&format!("Question: {query}\n\nContext:\n{}\n\nAnswer:", format_context(passages)));

    let raw = tokio::time::timeout(timeout, model.complete(SYSTEM_PROMPT, &prompt, 0.3))
        .await
        .map_err(|_| CollaboratorError::Timeout(timeout))??;
    let text = raw.trim();
    if text.is_empty() {
        return Err(CollaboratorError::Malformed("empty answer".to_string()));
    }
    Ok(text.to_string())
}

/// Passages numbered from 1 as `[i] source:\ntext`, blank-line separated.
pub fn format_context(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("[{}] {}:\n{}", i + 1, p.source, p.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn extractive_answer(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("[{}] {}", i + 1, excerpt(&p.text)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn excerpt(text: &str) -> String {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    if line.chars().count() <= EXCERPT_CHARS {
        return line.to_string();
    }
    let cut: String = line.chars().take(EXCERPT_CHARS).collect();
    match cut.rfind(' ') {
        Some(pos) => format!("{}...", &cut[..pos]),
        None => format!("{cut}..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str, source: &str) -> RetrievedPassage {
        RetrievedPassage { text: text.to_string(), source: source.to_string(), score: 1.0 }
    }

    #[test]
    fn context_is_numbered_from_one() {
        let ctx = format_context(&[passage("alpha", "a.txt"), passage("beta", "b.txt")]);
        assert_eq!(ctx, "[1] a.txt:\nalpha\n\n[2] b.txt:\nbeta");
    }

    #[test]
    fn long_excerpts_break_on_words() {
        let text = "word ".repeat(100);
        let e = excerpt(&text);
        assert!(e.ends_with("..."));
        assert!(e.chars().count() <= EXCERPT_CHARS + 3);
        assert!(!e.contains("wor..."));
    }
}
