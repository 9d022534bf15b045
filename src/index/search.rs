//! Typo-tolerant full-text index over example descriptions
//!
//! Only descriptions are indexed; code is never searched. A query term
//! matches a description token exactly or within one character edit, and
//! exact matches always weigh more than fuzzy ones.

use std::collections::HashMap;

use super::tokenize::{normalize, tokenize, within_one_edit};
use crate::core::Example;

/// Weight of a one-edit match relative to an exact match
const FUZZY_WEIGHT: f64 = 0.5;

/// Query terms shorter than this only match exactly
const MIN_FUZZY_LEN: usize = 2;

/// Term frequency saturation
const K1: f64 = 1.2;

/// An indexed example description
#[derive(Debug)]
struct IndexedDocument {
    example: Example,
    normalized: String,
    term_counts: HashMap<String, usize>,
}

/// A scored document position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub doc: usize,
    pub score: f64,
}

/// Search index built once per corpus
#[derive(Debug, Default)]
pub struct SearchIndex {
    docs: Vec<IndexedDocument>,
}

impl SearchIndex {
    /// Build an index over the descriptions of `corpus`
    pub fn build(corpus: &[Example]) -> Self {
        let docs = corpus
            .iter()
            .map(|example| {
                let mut term_counts: HashMap<String, usize> = HashMap::new();
                for token in tokenize(&example.description) {
                    *term_counts.entry(token).or_insert(0) += 1;
                }
                IndexedDocument {
                    example: example.clone(),
                    normalized: normalize(&example.description),
                    term_counts,
                }
            })
            .collect();

        Self { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// The example stored at `doc` when the index was built
    pub fn document(&self, doc: usize) -> Option<&Example> {
        self.docs.get(doc).map(|d| &d.example)
    }

    /// Documents whose whole description equals the normalized query
    pub fn exact_matches(&self, normalized_query: &str) -> Vec<usize> {
        if normalized_query.is_empty() {
            return Vec::new();
        }
        self.docs
            .iter()
            .enumerate()
            .filter(|(_, d)| d.normalized == normalized_query)
            .map(|(i, _)| i)
            .collect()
    }

    /// Score every document against `terms`, returning hits in document order
    ///
    /// Each term contributes a saturated term frequency scaled by its inverse
    /// document frequency. The sum is multiplied by the share of query terms
    /// the document covers. Documents that match nothing are left out.
    pub fn score(&self, terms: &[String]) -> Vec<Hit> {
        if terms.is_empty() || self.docs.is_empty() {
            return Vec::new();
        }

        let n_docs = self.docs.len() as f64;
        let mut totals = vec![0.0_f64; self.docs.len()];
        let mut covered = vec![0_usize; self.docs.len()];

        for term in terms {
            let fuzzy = term.chars().count() >= MIN_FUZZY_LEN;
            let frequencies: Vec<f64> = self
                .docs
                .iter()
                .map(|doc| doc.term_frequency(term, fuzzy))
                .collect();

            let doc_freq = frequencies.iter().filter(|tf| **tf > 0.0).count() as f64;
            if doc_freq == 0.0 {
                continue;
            }
            let idf = (1.0 + (n_docs - doc_freq + 0.5) / (doc_freq + 0.5)).ln();

            for (doc, tf) in frequencies.into_iter().enumerate() {
                if tf > 0.0 {
                    totals[doc] += idf * tf * (K1 + 1.0) / (tf + K1);
                    covered[doc] += 1;
                }
            }
        }

        let n_terms = terms.len() as f64;
        totals
            .into_iter()
            .zip(covered)
            .enumerate()
            .filter(|(_, (_, covered))| *covered > 0)
            .map(|(doc, (total, covered))| Hit {
                doc,
                score: total * covered as f64 / n_terms,
            })
            .collect()
    }
}

impl IndexedDocument {
    /// Exact occurrences plus down-weighted one-edit occurrences of `term`
    fn term_frequency(&self, term: &str, fuzzy: bool) -> f64 {
        let mut exact = 0;
        let mut near = 0;
        for (token, count) in &self.term_counts {
            if token == term {
                exact += count;
            } else if fuzzy && within_one_edit(token, term) {
                near += count;
            }
        }
        exact as f64 + FUZZY_WEIGHT * near as f64
    }
}
