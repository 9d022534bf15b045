//! Read-through cache for the corpus search index
//!
//! The index is rebuilt only when the corpus fingerprint changes. The
//! fingerprint is the corpus length plus the identities of the first and
//! last examples; middle entries are not compared.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use crate::core::Example;
use crate::index::SearchIndex;

/// Cheap identity of a corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusFingerprint {
    len: usize,
    first: u64,
    last: u64,
}

impl CorpusFingerprint {
    pub fn of(corpus: &[Example]) -> Self {
        Self {
            len: corpus.len(),
            first: identity_hash(corpus.first()),
            last: identity_hash(corpus.last()),
        }
    }
}

fn identity_hash(example: Option<&Example>) -> u64 {
    let mut hasher = DefaultHasher::new();
    example.map(Example::identity).hash(&mut hasher);
    hasher.finish()
}

/// Cache owning the current (fingerprint, index) pair
#[derive(Debug, Default)]
pub struct IndexCache {
    entry: RwLock<Option<(CorpusFingerprint, Arc<SearchIndex>)>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached index for `corpus`, rebuilding it if the corpus changed
    pub fn get_or_build(&self, corpus: &[Example]) -> Arc<SearchIndex> {
        let fingerprint = CorpusFingerprint::of(corpus);

        if let Some(index) = self.lookup(fingerprint) {
            return index;
        }

        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have rebuilt while we waited for the write lock
        if let Some((cached, index)) = entry.as_ref() {
            if *cached == fingerprint {
                return Arc::clone(index);
            }
        }

        tracing::debug!("Building search index for {} examples", corpus.len());
        let index = Arc::new(SearchIndex::build(corpus));
        *entry = Some((fingerprint, Arc::clone(&index)));
        index
    }

    fn lookup(&self, fingerprint: CorpusFingerprint) -> Option<Arc<SearchIndex>> {
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        match entry.as_ref() {
            Some((cached, index)) if *cached == fingerprint => Some(Arc::clone(index)),
            _ => None,
        }
    }
}
