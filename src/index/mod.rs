//! Example retrieval
//!
//! Ranks corpus examples against a free-text request. Ranking is a pure
//! function of (query, corpus, limit): the corpus is never modified and
//! identical inputs always give identical output.

pub mod search;
pub mod tokenize;

use std::collections::HashMap;

use crate::core::{Example, IndexCache};

pub use search::{Hit, SearchIndex};
pub use tokenize::{search_terms, within_one_edit, STOP_WORDS};

/// Default number of examples returned per query
pub const DEFAULT_LIMIT: usize = 12;

/// Candidates fetched per requested result, before duplicates collapse
const CANDIDATE_FACTOR: usize = 2;

/// Rank `corpus` against `query`, building a fresh index
pub fn rank(query: &str, corpus: &[Example], limit: usize) -> Vec<Example> {
    if let Some(prefix) = cold_start(query, corpus, limit) {
        return prefix;
    }
    let index = SearchIndex::build(corpus);
    rank_with_index(&index, query, corpus, limit)
}

/// Ranker that keeps the corpus index between calls
///
/// Safe to share across threads; the index is swapped under a lock when
/// the corpus changes.
#[derive(Debug, Default)]
pub struct Ranker {
    cache: IndexCache,
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank `corpus` against `query`, reusing the cached index when possible
    pub fn rank(&self, query: &str, corpus: &[Example], limit: usize) -> Vec<Example> {
        if let Some(prefix) = cold_start(query, corpus, limit) {
            return prefix;
        }
        let index = self.cache.get_or_build(corpus);
        rank_with_index(&index, query, corpus, limit)
    }
}

/// Empty query or empty corpus: the corpus prefix, verbatim and unscored
fn cold_start(query: &str, corpus: &[Example], limit: usize) -> Option<Vec<Example>> {
    if query.trim().is_empty() || corpus.is_empty() {
        return Some(corpus.iter().take(limit).cloned().collect());
    }
    None
}

/// A merged candidate, keyed by its first position in the corpus
#[derive(Debug)]
struct Candidate {
    position: usize,
    score: f64,
    exact: bool,
}

fn rank_with_index(
    index: &SearchIndex,
    query: &str,
    corpus: &[Example],
    limit: usize,
) -> Vec<Example> {
    let terms = search_terms(query);
    let exact_docs = index.exact_matches(&tokenize::normalize(query));

    let mut hits = index.score(&terms);
    for &doc in &exact_docs {
        if !hits.iter().any(|h| h.doc == doc) {
            hits.push(Hit { doc, score: 0.0 });
        }
    }

    // Stable: equal scores keep index order
    hits.sort_by(|a, b| {
        let (a_exact, b_exact) = (exact_docs.contains(&a.doc), exact_docs.contains(&b.doc));
        b_exact.cmp(&a_exact).then(b.score.total_cmp(&a.score))
    });
    hits.truncate(limit.saturating_mul(CANDIDATE_FACTOR));

    let mut positions: HashMap<(&str, &str), usize> = HashMap::new();
    for (position, example) in corpus.iter().enumerate() {
        positions.entry(example.identity()).or_insert(position);
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut slots: HashMap<usize, usize> = HashMap::new();

    for hit in &hits {
        let Some(document) = index.document(hit.doc) else {
            continue;
        };
        let Some(&position) = positions.get(&document.identity()) else {
            tracing::debug!("Dropping indexed example missing from corpus: {:?}", document.description);
            continue;
        };
        let exact = exact_docs.contains(&hit.doc);

        match slots.get(&position) {
            Some(&slot) => {
                candidates[slot].score += hit.score;
                candidates[slot].exact |= exact;
            }
            None => {
                slots.insert(position, candidates.len());
                candidates.push(Candidate {
                    position,
                    score: hit.score,
                    exact,
                });
            }
        }
    }

    // Lift exact description matches above everything else
    let ceiling = candidates.iter().map(|c| c.score).fold(0.0_f64, f64::max) + 1.0;
    for candidate in candidates.iter_mut().filter(|c| c.exact) {
        candidate.score += ceiling;
    }

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.position.cmp(&b.position))
    });

    tracing::debug!(
        "Ranked {} candidates for terms {:?} ({} hits, limit {})",
        candidates.len(),
        terms,
        hits.len(),
        limit
    );

    candidates
        .into_iter()
        .take(limit)
        .map(|c| corpus[c.position].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fixture() -> Vec<Example> {
        vec![
            Example::new("Bouncing ball", "ball();"),
            Example::new("Falling block puzzle in the style of Tetris", "blocks();"),
            Example::new("Fractal Fern", "fern();"),
            Example::new("Tetris", "tetris();"),
            Example::new("Analog clock", "clock();"),
            Example::new("Snake game", "snake();"),
        ]
    }

    fn descriptions(examples: &[Example]) -> Vec<&str> {
        examples.iter().map(|e| e.description.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_corpus_prefix() {
        let corpus = fixture();
        assert_eq!(rank("", &corpus, 4), corpus[..4].to_vec());
        assert_eq!(rank("   \t", &corpus, 12), corpus);
    }

    #[test]
    fn test_empty_corpus_returns_nothing() {
        assert!(rank("Tetris", &[], 5).is_empty());
    }

    #[test]
    fn test_tetris_scenario() {
        let ranked = rank("Tetris", &fixture(), 5);
        let names = descriptions(&ranked);
        assert_eq!(names[0], "Tetris");
        assert!(names.contains(&"Falling block puzzle in the style of Tetris"));
        assert!(ranked.len() <= 5);
    }

    #[test]
    fn test_exact_description_ranks_first() {
        let mut corpus = fixture();
        corpus.insert(0, Example::new("Fractal Fern fern fern garden", "garden();"));
        let ranked = rank("fractal fern", &corpus, 12);
        assert_eq!(ranked[0].description, "Fractal Fern");
    }

    #[test]
    fn test_single_typo_still_retrieves() {
        let ranked = rank("Fracal Fern", &fixture(), 5);
        assert_eq!(ranked[0].description, "Fractal Fern");
    }

    #[test]
    fn test_default_limit_caps_results() {
        let corpus: Vec<Example> = (0..20)
            .map(|i| Example::new(format!("Sample {}", i), format!("sample{}();", i)))
            .collect();
        let ranked = rank("Sample", &corpus, DEFAULT_LIMIT);
        assert_eq!(ranked.len(), 12);
        // Equal scores keep corpus order
        assert_eq!(ranked[0].description, "Sample 0");
        assert_eq!(ranked[11].description, "Sample 11");
    }

    #[test]
    fn test_duplicates_collapse_and_accumulate() {
        let mut corpus = fixture();
        corpus.push(Example::new("Snake game", "snake();"));
        corpus.push(Example::new("Snake game", "snake();"));
        corpus.push(Example::new("Snake race game", "race();"));

        let ranked = rank("snake game", &corpus, 12);
        let identities: HashSet<_> = ranked.iter().map(Example::identity).collect();
        assert_eq!(identities.len(), ranked.len());
        assert_eq!(ranked[0].description, "Snake game");
    }

    #[test]
    fn test_two_letter_typo_still_retrieves() {
        let corpus = vec![Example::new("Box", "box();"), Example::new("Clock", "clock();")];
        assert_eq!(descriptions(&rank("ox", &corpus, 5)), vec!["Box"]);
    }

    #[test]
    fn test_duplicate_scores_outrank_single_match() {
        let corpus = vec![
            Example::new("Snake race", "race();"),
            Example::new("Snake game", "snake();"),
            Example::new("Snake game", "snake();"),
        ];
        let ranked = rank("snake", &corpus, 5);
        assert_eq!(descriptions(&ranked), vec!["Snake game", "Snake race"]);
    }

    #[test]
    fn test_no_match_returns_nothing() {
        assert!(rank("spreadsheet", &fixture(), 5).is_empty());
    }

    #[test]
    fn test_stop_word_only_query_still_searches() {
        let corpus = vec![Example::new("Show", "show();"), Example::new("Clock", "clock();")];
        let ranked = rank("show", &corpus, 5);
        assert_eq!(descriptions(&ranked), vec!["Show"]);
    }

    #[test]
    fn test_missing_description_is_kept_but_unmatched() {
        let mut corpus = fixture();
        corpus.insert(0, Example::new("", "orphan();"));
        assert_eq!(rank("", &corpus, 1)[0].code, "orphan();");
        assert!(rank("tetris", &corpus, 12).iter().all(|e| !e.description.is_empty()));
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let corpus = fixture();
        let first = rank("puzzle game", &corpus, 3);
        for _ in 0..5 {
            assert_eq!(rank("puzzle game", &corpus, 3), first);
        }
    }

    #[test]
    fn test_ranker_matches_uncached_rank() {
        let ranker = Ranker::new();
        let corpus = fixture();
        for query in ["Tetris", "fern", "", "game clock"] {
            assert_eq!(ranker.rank(query, &corpus, 4), rank(query, &corpus, 4));
        }
    }

    #[test]
    fn test_stale_index_entries_are_dropped() {
        let ranker = Ranker::new();
        let before = vec![
            Example::new("Bouncing ball", "ball();"),
            Example::new("Tetris", "tetris();"),
            Example::new("Analog clock", "clock();"),
        ];
        ranker.rank("ball", &before, 5);

        // Same length and ends, so the cached index is reused
        let mut after = before.clone();
        after[1] = Example::new("Snake game", "snake();");

        let ranked = ranker.rank("tetris", &after, 5);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_limit_zero() {
        assert!(rank("Tetris", &fixture(), 0).is_empty());
        assert!(rank("", &fixture(), 0).is_empty());
    }
}
