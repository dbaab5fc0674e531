use std::cmp::Ordering;

use concierge_core::types::RankedResult;

use crate::catalog::Catalog;
use crate::synonyms::SynonymTable;
use crate::vectorizer::{SparseVector, TfidfVectorizer, VectorizerOptions};

const RATIONALE_TERMS: usize = 3;

/// Catalog plus its fitted TF-IDF rows, versioned together: row `i` always
/// describes `catalog.items()[i]`. A different catalog needs a new `Ranker`.
#[derive(Debug, Clone)]
pub struct Ranker {
    catalog: Catalog,
    synonyms: SynonymTable,
    vectorizer: TfidfVectorizer,
    rows: Vec<SparseVector>,
}

impl Ranker {
    pub fn new(catalog: Catalog, synonyms: SynonymTable, options: VectorizerOptions) -> Self {
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(&catalog.corpus(), options);
        Self { catalog, synonyms, vectorizer, rows }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Top `k` items for `query`, best first. Ties keep catalog order, so the
    /// output is fully determined by the inputs.
    pub fn rank(&self, query: &str, k: usize) -> Vec<RankedResult> {
        if k == 0 {
            return Vec::new();
        }
        let expanded = self.synonyms.expand(query);
        let qv = self.vectorizer.transform(&expanded);

        let mut scored: Vec<(usize, f64)> = self.rows.iter().map(|row| qv.dot(row)).enumerate().collect();
        // sort_by is stable: equal scores stay in catalog order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(i, score)| RankedResult {
                item: self.catalog.items()[i].clone(),
                score,
                why: self.rationale(&qv, &self.rows[i]),
            })
            .collect()
    }

    /// Highest-contributing shared terms, or `None` when nothing overlaps.
    fn rationale(&self, query: &SparseVector, row: &SparseVector) -> Option<String> {
        let mut contrib: Vec<(usize, f64)> = query.contributions(row).filter(|(_, c)| *c > 0.0).collect();
        contrib.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        let feats: Vec<&str> = contrib
            .iter()
            .take(RATIONALE_TERMS)
            .filter_map(|(i, _)| self.vectorizer.term(*i))
            .collect();
        if feats.is_empty() { None } else { Some(feats.join(", ")) }
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(Catalog::seeded(), SynonymTable::seeded(), VectorizerOptions::default())
    }
}
