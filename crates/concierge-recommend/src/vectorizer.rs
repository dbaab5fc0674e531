//! TF-IDF vectorization over a fixed corpus.
//!
//! The analyzer normalizes text, keeps tokens of two or more characters, drops
//! English stop words and emits word n-grams (unigrams and bigrams by default)
//! over what remains. Weights are raw counts times smoothed IDF
//! `ln((1 + n) / (1 + df)) + 1`, and every vector is L2-normalized so cosine
//! similarity is a plain dot product.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::normalize::normalize;
use crate::stop_words::is_stop_word;

#[derive(Debug, Clone)]
pub struct VectorizerOptions {
    /// Largest word n-gram emitted; 2 means unigrams plus bigrams.
    pub ngram_max: usize,
    /// Minimum number of documents a term must appear in to enter the vocabulary.
    pub min_df: usize,
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self { ngram_max: 2, min_df: 1 }
    }
}

/// Sparse vector keyed by vocabulary index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: BTreeMap<usize, f64>,
}

impl SparseVector {
    pub fn get(&self, index: usize) -> f64 {
        self.entries.get(&index).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|(&i, &w)| (i, w))
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.entries.len() <= other.entries.len() { (self, other) } else { (other, self) };
        small.iter().map(|(i, w)| w * large.get(i)).sum()
    }

    /// Per-term products with `other`, over the terms both vectors share.
    pub fn contributions<'a>(&'a self, other: &'a SparseVector) -> impl Iterator<Item = (usize, f64)> + 'a {
        self.iter().filter_map(move |(i, w)| other.entries.get(&i).map(|o| (i, w * o)))
    }

    fn l2_normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for w in self.entries.values_mut() {
                *w /= norm;
            }
        }
        self
    }
}

/// Vocabulary and IDF weights frozen at fit time.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
    options: VectorizerOptions,
}

impl TfidfVectorizer {
    /// Fit on `documents` and return the vectorizer together with one
    /// L2-normalized row per document, in input order.
    pub fn fit_transform(documents: &[String], options: VectorizerOptions) -> (Self, Vec<SparseVector>) {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| analyze(d, options.ngram_max)).collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &analyzed {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let mut terms = Vec::new();
        let mut idf = Vec::new();
        for (term, df) in doc_freq.into_iter().filter(|(_, df)| *df >= options.min_df) {
            terms.push(term.to_string());
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
        }
        let vocabulary = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();

        let vectorizer = Self { vocabulary, terms, idf, options };
        let rows = analyzed.iter().map(|terms| vectorizer.weigh(terms)).collect();
        tracing::debug!(documents = documents.len(), vocabulary = vectorizer.terms.len(), "fitted tf-idf vocabulary");
        (vectorizer, rows)
    }

    /// Vectorize arbitrary text against the frozen vocabulary; unknown terms are dropped.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&analyze(text, self.options.ngram_max))
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.terms.len()
    }

    fn weigh(&self, terms: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms {
            if let Some(&idx) = self.vocabulary.get(term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        for (idx, w) in counts.iter_mut() {
            *w *= self.idf[*idx];
        }
        SparseVector { entries: counts }.l2_normalized()
    }
}

/// Split text into the n-gram terms the vectorizer counts.
pub fn analyze(text: &str, ngram_max: usize) -> Vec<String> {
    let normalized = normalize(text);
    let tokens: Vec<&str> = normalized
        .split_whitespace()
        .filter(|t| t.len() >= 2 && !is_stop_word(t))
        .collect();
    let mut out = Vec::new();
    for n in 1..=ngram_max.max(1) {
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}
