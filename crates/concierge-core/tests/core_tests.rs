use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

use concierge_core::config::{resolve_with_base, Config};
use concierge_core::data_processor::{ChunkingConfig, DataProcessor};
use concierge_core::memory::ConversationMemory;
use concierge_core::types::{CatalogItem, RankedResult};

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let processor = DataProcessor::default();
    let chunks = processor.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 1, "one small paragraph becomes one chunk");
    assert_eq!(chunks[0].content.trim(), "Short text");
    assert_eq!(chunks[0].source, "a.txt");
    assert_eq!(chunks[0].id, "a:0");
}

#[test]
fn process_directory_ignores_non_txt_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "alpha bravo").unwrap();
    fs::write(tmp.path().join("b.md"), "charlie delta").unwrap();

    let chunks = DataProcessor::default().process_directory(tmp.path()).expect("process");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].doc_id, "a");
}

#[test]
fn process_directory_missing_dir_is_empty() {
    let tmp = TempDir::new().unwrap();
    let chunks = DataProcessor::default().process_directory(&tmp.path().join("nope")).expect("process");
    assert!(chunks.is_empty());
}

#[test]
fn long_paragraph_is_split_with_overlap() {
    let processor = DataProcessor::new(ChunkingConfig { chunk_size: 50, chunk_overlap: 15 });
    let words: Vec<String> = (0..60).map(|i| format!("w{:02}", i)).collect();
    let text = words.join(" ");
    let chunks = processor.chunk_document(&text, Path::new("long.txt"));

    assert!(chunks.len() > 1, "a 239-char paragraph needs several chunks");
    for c in &chunks {
        assert!(c.content.chars().count() <= 50, "chunk too long: {}", c.content);
        assert_eq!(c.total_chunks, chunks.len());
    }
    for pair in chunks.windows(2) {
        let last_word = pair[0].content.split_whitespace().last().unwrap();
        assert!(pair[1].content.contains(last_word), "consecutive chunks share trailing context");
    }
    let rebuilt: std::collections::BTreeSet<&str> = chunks.iter().flat_map(|c| c.content.split_whitespace()).collect();
    assert_eq!(rebuilt.len(), 60, "no word is lost");
}

#[test]
fn small_paragraphs_are_packed_together() {
    let processor = DataProcessor::new(ChunkingConfig { chunk_size: 40, chunk_overlap: 5 });
    let text = "first para\n\nsecond para\n\nthird paragraph that is rather long";
    let chunks = processor.chunk_document(text, Path::new("doc.txt"));
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].content, "first para\n\nsecond para");
    assert_eq!(chunks[1].chunk_index, 1);
}

#[test]
fn memory_evicts_oldest_turn() {
    let mut mem = ConversationMemory::new(6);
    for i in 0..8 {
        mem.add(format!("q{}", i), format!("a{}", i));
    }
    assert_eq!(mem.len(), 6);
    let first = mem.turns().next().unwrap();
    assert_eq!(first.user_text, "q2");
    assert_eq!(mem.turns().last().unwrap().assistant_text, "a7");
    assert_eq!(ConversationMemory::new(0).capacity(), 1);
}

#[test]
fn memory_prompt_keeps_last_ten_lines() {
    let mut mem = ConversationMemory::new(6);
    for i in 0..6 {
        mem.add(format!("q{}", i), format!("a{}", i));
    }
    let prompt = mem.to_prompt();
    let lines: Vec<&str> = prompt.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "User 2: q1");
    assert_eq!(lines[9], "Assistant 6: a5");
}

#[test]
fn memory_prompt_empty_when_no_turns() {
    assert_eq!(ConversationMemory::default().to_prompt(), "");
}

#[test]
fn config_defaults_without_files() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from(tmp.path()).expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.memory.max_turns, 6);
    assert_eq!(settings.recommender.top_k, 2);
    assert_eq!(settings.docs.chunk_size, 500);
    assert!(!settings.recommender.online_enrichment);
}

#[test]
fn config_file_overrides_defaults() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[recommender]\ntop_k = 3\n\n[docs]\ndir = \"corpus\"\n",
    )
    .unwrap();
    let config = Config::load_from(tmp.path()).expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.recommender.top_k, 3);
    assert_eq!(settings.recommender.min_df, 1, "unset keys keep defaults");
    let top_k: usize = config.get("recommender.top_k").expect("get");
    assert_eq!(top_k, 3);
    assert_eq!(config.resolve_path(&settings.docs.dir), tmp.path().join("corpus"));
}

#[test]
fn config_rejects_overlap_not_smaller_than_chunk() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[docs]\nchunk_size = 100\nchunk_overlap = 100\n").unwrap();
    assert!(Config::load_from(tmp.path()).is_err());
}

#[test]
fn resolve_keeps_absolute_paths() {
    let base = Path::new("/srv/app");
    assert_eq!(resolve_with_base(base, "/tmp/x"), Path::new("/tmp/x"));
    assert_eq!(resolve_with_base(base, "data"), Path::new("/srv/app/data"));
}

#[test]
fn ranked_result_serializes_flat_and_omits_missing_why() {
    let r = RankedResult { item: CatalogItem::new(2, "Running shoes", "light"), score: 0.0, why: None };
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["id"], 2);
    assert_eq!(json["title"], "Running shoes");
    assert!(json.get("why").is_none());
}
