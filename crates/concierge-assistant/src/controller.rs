use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use concierge_agents::{compose_answer, ImageGenerator, SqlAgent, WeatherAgent};
use concierge_core::config::{resolve_with_base, Config, Settings};
use concierge_core::data_processor::ChunkingConfig;
use concierge_core::memory::ConversationMemory;
use concierge_core::traits::{ChatModel, ImageModel};
use concierge_core::types::{RankedResult, Turn, TurnResponse};
use concierge_recommend::{Catalog, Recommender};
use concierge_text::Retriever;

use crate::intent::{collapse_whitespace, detect_intent, Intent};

const SELECT_ONLY_REPLY: &str = "⚠️ Only SELECT queries allowed.";

/// Owns the per-session state and dispatches turns to handlers.
pub struct Controller {
    settings: Settings,
    base_dir: PathBuf,
    memory: ConversationMemory,
    retriever: Option<Retriever>,
    images: ImageGenerator,
    weather: WeatherAgent,
    sql: SqlAgent,
    recommender: Recommender,
    model: Option<Arc<dyn ChatModel>>,
}

impl Controller {
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.settings()?, config.base_dir(), None).await
    }

    /// Build every handler except the document retriever, which is loaded on
    /// the first question that needs it.
    pub async fn new(settings: Settings, base_dir: &Path, model: Option<Arc<dyn ChatModel>>) -> Result<Self> {
        let catalog = match &settings.recommender.catalog_path {
            Some(p) => Catalog::from_json_file(&resolve_with_base(base_dir, p))?,
            None => Catalog::seeded(),
        };
        let recommender = Recommender::from_settings(&settings.recommender, catalog, model.clone());

        let sql = SqlAgent::in_memory().await?;
        if settings.sql.seed_demo {
            sql.seed_demo().await?;
        }
        sql.read_only().await?;

        let images = ImageGenerator::new(
            resolve_with_base(base_dir, &settings.images.out_dir),
            settings.images.width,
            settings.images.height,
        );

        tracing::info!(model = model.is_some(), "assistant ready");
        Ok(Self {
            memory: ConversationMemory::new(settings.memory.max_turns),
            base_dir: base_dir.to_path_buf(),
            retriever: None,
            images,
            weather: WeatherAgent::new(),
            sql,
            recommender,
            model,
            settings,
        })
    }

    /// Generate images with `model`, falling back to the placeholder on failure.
    #[must_use]
    pub fn with_image_model(mut self, model: Arc<dyn ImageModel>) -> Self {
        let timeout = Duration::from_secs(self.settings.recommender.collaborator_timeout_secs);
        self.images = self.images.with_model(model, timeout);
        self
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Answer one turn. Handler failures become reply text; this never errors.
    pub async fn handle(&mut self, turn: Turn) -> TurnResponse {
        let text = collapse_whitespace(&turn.user_text);
        let intent = detect_intent(&text);
        tracing::debug!(?intent, "routing turn");

        let response = match intent {
            Intent::Image => self.handle_image(&text).await,
            Intent::Rag | Intent::Chat => self.handle_question(&text).await,
            Intent::Weather => self.handle_weather(&text),
            Intent::Sql => {
                if !text.to_lowercase().starts_with("select") {
                    // refusals are not part of the conversation
                    return TurnResponse::text(SELECT_ONLY_REPLY);
                }
                self.handle_sql(&text).await
            }
            Intent::Recommend => self.handle_recommend(&text).await,
        };
        self.memory.add(text, response.response_text.clone());
        response
    }

    async fn handle_image(&self, text: &str) -> TurnResponse {
        let prompt = self.images.build_prompt(text);
        match self.images.generate(&prompt).await {
            Ok(path) => TurnResponse {
                response_text: format!("🖼️ Generated image saved to: {}", path.display()),
                image_path: Some(path),
                ..TurnResponse::default()
            },
            Err(e) => {
                tracing::error!(error = %e, "image generation failed");
                TurnResponse::text(format!("Image error: {e}"))
            }
        }
    }

    async fn handle_question(&mut self, text: &str) -> TurnResponse {
        let transcript = self.memory.to_prompt();
        let timeout = Duration::from_secs(self.settings.recommender.collaborator_timeout_secs);
        let top_k = self.settings.docs.top_k;
        let model = self.model.clone();

        let retriever = match self.retriever() {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "failed to build document index");
                return TurnResponse::text(format!("Document index error: {e}"));
            }
        };
        match compose_answer(text, retriever, model.as_deref(), &transcript, top_k, timeout).await {
            Ok((answer, citations)) => {
                let mut reply = answer;
                let sources = dedup(&citations);
                if !sources.is_empty() {
                    reply.push_str(&format!("\n📚 Sources: {}", sources.join(", ")));
                }
                TurnResponse { response_text: reply, citations, ..TurnResponse::default() }
            }
            Err(e) => {
                tracing::error!(error = %e, "question answering failed");
                TurnResponse::text(format!("Search error: {e}"))
            }
        }
    }

    fn handle_weather(&self, text: &str) -> TurnResponse {
        let report = self.weather.run(text);
        let metrics = match serde_json::to_value(&report) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        TurnResponse { response_text: report.describe(), metrics, ..TurnResponse::default() }
    }

    async fn handle_sql(&self, text: &str) -> TurnResponse {
        let reply = match self.sql.run(text).await {
            Ok(rows) => {
                let head = serde_json::to_string(&rows[..rows.len().min(3)]).unwrap_or_default();
                format!("📊 Rows: {head}... (total {})", rows.len())
            }
            Err(e) => e.to_string(),
        };
        TurnResponse::text(reply)
    }

    async fn handle_recommend(&self, text: &str) -> TurnResponse {
        let results = self.recommender.recommend(text, self.settings.recommender.top_k).await;
        let mut lines = vec!["🛍️ Recommended items:".to_string()];
        lines.extend(results.iter().map(format_recommendation));
        TurnResponse::text(lines.join("\n"))
    }

    fn retriever(&mut self) -> Result<&Retriever> {
        if self.retriever.is_none() {
            let dir = resolve_with_base(&self.base_dir, &self.settings.docs.dir);
            let chunking = ChunkingConfig {
                chunk_size: self.settings.docs.chunk_size,
                chunk_overlap: self.settings.docs.chunk_overlap,
            };
            let retriever = Retriever::from_dir(&dir, chunking)
                .with_context(|| format!("indexing documents in {}", dir.display()))?;
            self.retriever = Some(retriever);
        }
        self.retriever.as_ref().context("document retriever missing")
    }
}

fn format_recommendation(r: &RankedResult) -> String {
    match &r.why {
        Some(why) => format!("- {} (score {:.2}) — {}", r.item.title, r.score, why),
        None => format!("- {} (score {:.2})", r.item.title, r.score),
    }
}

/// First occurrence of each source, in order.
fn dedup(sources: &[String]) -> Vec<&str> {
    let mut seen = Vec::new();
    for s in sources {
        if !seen.contains(&s.as_str()) {
            seen.push(s.as_str());
        }
    }
    seen
}
