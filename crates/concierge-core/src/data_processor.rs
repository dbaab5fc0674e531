//! Turns a directory of `.txt` documents into overlapping chunks for indexing.
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::DocumentChunk;

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters of trailing context repeated at the start of the next chunk.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 500, chunk_overlap: 100 }
    }
}

#[derive(Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new(chunking_config: ChunkingConfig) -> Self {
        Self { chunking_config }
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<DocumentChunk>> {
        let files = self.list_txt_files(data_dir);
        if files.is_empty() {
            tracing::info!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            tracing::debug!("processing file {}/{}: {}", file_index + 1, files.len(), file_path.display());
            let content = self.read_file_content(file_path)?;
            let chunks = self.chunk_document(&content, file_path);
            all_chunks.extend(chunks);
        }
        tracing::info!("processed {} files into {} chunks", files.len(), all_chunks.len());
        Ok(all_chunks)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(file_path).with_context(|| format!("reading {}", file_path.display()))?;
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }

    /// Split one document into chunks, packing whole paragraphs where they fit.
    pub fn chunk_document(&self, content: &str, file_path: &Path) -> Vec<DocumentChunk> {
        let doc_id = file_path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let source = file_path.file_name().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let size = self.chunking_config.chunk_size;

        let mut texts: Vec<String> = Vec::new();
        let mut current = String::new();
        for paragraph in content.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            let paragraph = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
            let para_len = paragraph.chars().count();
            if para_len > size {
                if !current.is_empty() {
                    texts.push(std::mem::take(&mut current));
                }
                texts.extend(self.split_paragraph_with_overlap(&paragraph));
                continue;
            }
            let joined_len = if current.is_empty() { para_len } else { current.chars().count() + 2 + para_len };
            if joined_len > size {
                texts.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(&paragraph);
        }
        if !current.is_empty() {
            texts.push(current);
        }

        let total_chunks = texts.len();
        texts
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| DocumentChunk {
                id: format!("{}:{}", doc_id, chunk_index),
                doc_id: doc_id.clone(),
                source: source.clone(),
                content,
                chunk_index,
                total_chunks,
            })
            .collect()
    }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let size = self.chunking_config.chunk_size.max(1);
        let overlap = self.chunking_config.chunk_overlap;
        let words: Vec<String> = paragraph
            .split_whitespace()
            .flat_map(|w| {
                let chars: Vec<char> = w.chars().collect();
                chars.chunks(size).map(|c| c.iter().collect::<String>()).collect::<Vec<_>>()
            })
            .collect();

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let mut end = start;
            let mut len = 0;
            while end < words.len() {
                let add = words[end].chars().count() + usize::from(end > start);
                if len + add > size && end > start {
                    break;
                }
                len += add;
                end += 1;
            }
            chunks.push(words[start..end].join(" "));
            if end >= words.len() {
                break;
            }
            let mut back = end;
            let mut overlap_len = 0;
            while back > start + 1 {
                let add = words[back - 1].chars().count() + 1;
                if overlap_len + add > overlap {
                    break;
                }
                overlap_len += add;
                back -= 1;
            }
            start = back;
        }
        chunks
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") {
                txt_files.push(path.to_path_buf());
            }
        }
        txt_files.sort();
        txt_files
    }
}
