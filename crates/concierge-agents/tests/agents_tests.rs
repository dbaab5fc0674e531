use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

use concierge_agents::{compose_answer, ImageGenerator, SqlAgent, WeatherAgent, SAFE_NEGATIVE};
use concierge_core::data_processor::ChunkingConfig;
use concierge_core::error::CollaboratorError;
use concierge_core::traits::{ChatModel, ImageModel};
use concierge_text::Retriever;

fn docs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test_data/docs")
}

async fn seeded() -> SqlAgent {
    let agent = SqlAgent::in_memory().await.expect("open db");
    agent.seed_demo().await.expect("seed");
    agent
}

#[tokio::test]
async fn sql_returns_rows_as_objects() {
    let agent = seeded().await;
    let rows = agent.run("SELECT * FROM sales ORDER BY id").await.expect("query");
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[0]["item"], "apple");
    assert_eq!(rows[0]["qty"], 2);
    assert_eq!(rows[0]["price"], 1.2);
}

#[tokio::test]
async fn sql_aggregates_and_nulls() {
    let agent = seeded().await;
    let rows = agent
        .run("SELECT department, COUNT(*) AS n, AVG(salary) AS avg_salary FROM employees GROUP BY department ORDER BY department")
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["department"], "IT");
    assert_eq!(rows[0]["n"], 2);
    assert_eq!(rows[0]["avg_salary"], 77500.0);

    let rows = agent.run("SELECT NULL AS empty_col").await.unwrap();
    assert!(rows[0]["empty_col"].is_null());
}

#[tokio::test]
async fn sql_reports_errors() {
    let agent = seeded().await;
    let err = agent.run("SELECT * FROM missing_table").await.unwrap_err();
    assert!(err.to_string().starts_with("SQL error:"), "{err}");
}

#[tokio::test]
async fn seeding_twice_resets_tables() {
    let agent = seeded().await;
    agent.run("INSERT INTO products VALUES (6,'Desk','Furniture',5,150.0)").await.unwrap();
    agent.seed_demo().await.unwrap();
    assert_eq!(agent.run("SELECT * FROM products").await.unwrap().len(), 5);
}

#[tokio::test]
async fn read_only_rejects_writes_but_keeps_reads() {
    let agent = seeded().await;
    agent.read_only().await.expect("read-only");

    let err = agent.run("DELETE FROM employees").await.unwrap_err();
    assert!(err.to_string().starts_with("SQL error:"), "{err}");
    assert!(agent.run("SELECT 1 AS x; DROP TABLE sales").await.is_err());

    assert_eq!(agent.run("SELECT * FROM employees").await.unwrap().len(), 5);
    assert_eq!(agent.run("SELECT * FROM sales").await.unwrap().len(), 6);
}

#[test]
fn weather_stub_is_fixed() {
    let report = WeatherAgent::new().run("Lisbon");
    assert_eq!(report.provider, "stub");
    assert_eq!(report.location, "Lisbon");
    assert_eq!(report.describe(), "🌤️ Lisbon: 27.0°C, Partly cloudy (humidity 0.68)");
}

#[test]
fn image_prompt_uses_template_defaults() {
    let gen = ImageGenerator::new("unused", 768, 512);
    assert_eq!(
        gen.build_prompt("a red fox"),
        "High-quality, detailed image of a red fox. Style: cinematic. Lighting: soft studio. \
         Composition: rule of thirds. Lens: 50mm. Include one clear focal point."
    );
}

#[tokio::test]
async fn image_is_written_as_png() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("images");
    let gen = ImageGenerator::new(&out, 768, 512);
    let path = gen.generate(&gen.build_prompt("a sleepy cat")).await.expect("generate");

    assert!(path.starts_with(&out));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("image_") && name.ends_with(".png"), "{name}");

    let img = image::open(&path).expect("decode").to_rgb8();
    assert_eq!(img.dimensions(), (768, 512));
    assert_eq!(img.get_pixel(2, 2).0, [240, 248, 255]);
    assert_eq!(img.get_pixel(11, 11).0, [100, 100, 100]);
    // body of the cat at the centre
    assert_eq!(img.get_pixel(384, 276).0, [255, 165, 0]);
    // no caption text in the bottom band
    for x in (20..400).step_by(7) {
        assert_eq!(img.get_pixel(x, 485).0, [240, 248, 255], "x = {x}");
    }
}

#[tokio::test]
async fn different_prompts_get_different_files() {
    let tmp = TempDir::new().unwrap();
    let gen = ImageGenerator::new(tmp.path(), 128, 128);
    let a = gen.generate("a dog").await.unwrap();
    let b = gen.generate("the sun").await.unwrap();
    assert_ne!(a, b);
}

/// Returns a solid teal PNG of the requested size and records what it was asked.
#[derive(Default)]
struct TealBackend {
    seen: Mutex<Vec<(String, u32, u32)>>,
}

#[async_trait]
impl ImageModel for TealBackend {
    async fn generate(&self, _prompt: &str, negative: &str, width: u32, height: u32) -> Result<Vec<u8>, CollaboratorError> {
        self.seen.lock().unwrap().push((negative.to_string(), width, height));
        let img = RgbImage::from_pixel(width, height, Rgb([0, 128, 128]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        Ok(bytes.into_inner())
    }
}

struct DownBackend;

#[async_trait]
impl ImageModel for DownBackend {
    async fn generate(&self, _prompt: &str, _negative: &str, _w: u32, _h: u32) -> Result<Vec<u8>, CollaboratorError> {
        Err(CollaboratorError::Unavailable("503".to_string()))
    }
}

struct GarbageBackend;

#[async_trait]
impl ImageModel for GarbageBackend {
    async fn generate(&self, _prompt: &str, _negative: &str, _w: u32, _h: u32) -> Result<Vec<u8>, CollaboratorError> {
        Ok(b"not an image".to_vec())
    }
}

struct SlowBackend;

#[async_trait]
impl ImageModel for SlowBackend {
    async fn generate(&self, _prompt: &str, _negative: &str, _w: u32, _h: u32) -> Result<Vec<u8>, CollaboratorError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Err(CollaboratorError::NotConfigured)
    }
}

#[tokio::test]
async fn image_model_output_is_saved() {
    let tmp = TempDir::new().unwrap();
    let backend = Arc::new(TealBackend::default());
    let gen = ImageGenerator::new(tmp.path(), 768, 512).with_model(backend.clone(), Duration::from_secs(1));
    let path = gen.generate("a lighthouse at dusk").await.expect("generate");

    let img = image::open(&path).expect("decode").to_rgb8();
    assert_eq!(img.dimensions(), (768, 512));
    assert_eq!(img.get_pixel(384, 256).0, [0, 128, 128]);
    assert_eq!(img.get_pixel(2, 2).0, [0, 128, 128], "no placeholder border");

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen.as_slice(), [(SAFE_NEGATIVE.to_string(), 768, 512)]);
}

#[tokio::test]
async fn failing_image_models_fall_back_to_placeholder() {
    let backends: Vec<Arc<dyn ImageModel>> = vec![Arc::new(DownBackend), Arc::new(GarbageBackend), Arc::new(SlowBackend)];
    for backend in backends {
        let tmp = TempDir::new().unwrap();
        let gen = ImageGenerator::new(tmp.path(), 768, 512).with_model(backend, Duration::from_millis(20));
        let path = gen.generate("a sleepy cat").await.expect("placeholder");

        let img = image::open(&path).expect("decode").to_rgb8();
        assert_eq!(img.get_pixel(11, 11).0, [100, 100, 100]);
        assert_eq!(img.get_pixel(384, 276).0, [255, 165, 0]);
    }
}

struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    async fn complete(&self, _system: &str, prompt: &str, _t: f32) -> Result<String, CollaboratorError> {
        assert!(prompt.contains("[1] "));
        Ok("  Store water in opaque food-grade containers [1].  ".to_string())
    }
}

struct StalledModel;

#[async_trait]
impl ChatModel for StalledModel {
    async fn complete(&self, _system: &str, _prompt: &str, _t: f32) -> Result<String, CollaboratorError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }
}

#[tokio::test]
async fn qa_without_model_is_extractive() {
    let retriever = Retriever::from_dir(&docs_dir(), ChunkingConfig::default()).unwrap();
    let (answer, cits) =
        compose_answer("water cistern", &retriever, None, "", 4, Duration::from_secs(1)).await.unwrap();
    assert!(answer.starts_with("[1] "), "{answer}");
    assert_eq!(cits.first().map(String::as_str), Some("water_storage.txt"));
}

#[tokio::test]
async fn qa_uses_model_answer() {
    let retriever = Retriever::from_dir(&docs_dir(), ChunkingConfig::default()).unwrap();
    let model = EchoModel;
    let (answer, cits) = compose_answer("water storage", &retriever, Some(&model), "User 1: hi", 4, Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(answer, "Store water in opaque food-grade containers [1].");
    assert!(!cits.is_empty());
}

#[tokio::test]
async fn qa_model_timeout_falls_back() {
    let retriever = Retriever::from_dir(&docs_dir(), ChunkingConfig::default()).unwrap();
    let model = StalledModel;
    let (answer, _) = compose_answer("solar panels", &retriever, Some(&model), "", 4, Duration::from_millis(20))
        .await
        .unwrap();
    assert!(answer.starts_with("[1] "));
}

#[tokio::test]
async fn qa_on_empty_corpus_cites_system() {
    let tmp = TempDir::new().unwrap();
    let retriever = Retriever::from_dir(tmp.path(), ChunkingConfig::default()).unwrap();
    let (answer, cits) = compose_answer("anything", &retriever, None, "", 4, Duration::from_secs(1)).await.unwrap();
    assert_eq!(answer, "[1] No index available.");
    assert_eq!(cits, vec!["system".to_string()]);
}
