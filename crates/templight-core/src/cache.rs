//! Optional memoization of token spans per fragment text.
//!
//! Entries are stamped with the rebuild generation that last used them.
//! Closing a rebuild drops everything the rebuild did not touch, so the cache
//! never holds more than one document's worth of fragments.

use std::collections::HashMap;

use templight_syntax::TokenSpan;

struct Entry {
    spans: Vec<TokenSpan>,
    generation: u64,
}

/// Token spans keyed by fragment text.
#[derive(Default)]
pub struct FragmentCache {
    entries: HashMap<String, Entry>,
    generation: u64,
    hits: u64,
    misses: u64,
}

impl FragmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new rebuild generation.
    pub fn begin(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns cached spans for `fragment`, or computes and stores them.
    /// Errors are returned as-is and never stored.
    pub fn get_or_try_insert<E>(
        &mut self,
        fragment: &str,
        compute: impl FnOnce() -> Result<Vec<TokenSpan>, E>,
    ) -> Result<Vec<TokenSpan>, E> {
        if let Some(entry) = self.entries.get_mut(fragment) {
            entry.generation = self.generation;
            self.hits += 1;
            return Ok(entry.spans.clone());
        }

        self.misses += 1;
        let spans = compute()?;
        self.entries.insert(
            fragment.to_string(),
            Entry {
                spans: spans.clone(),
                generation: self.generation,
            },
        );
        Ok(spans)
    }

    /// Evicts entries not used since [`begin`](Self::begin).
    pub fn finish(&mut self) {
        let generation = self.generation;
        self.entries.retain(|_, entry| entry.generation == generation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(n: usize) -> Vec<TokenSpan> {
        vec![TokenSpan {
            from: 0,
            to: n,
            class: None,
        }]
    }

    #[test]
    fn test_hit_skips_compute() {
        let mut cache = FragmentCache::new();
        cache.begin();
        let first: Result<_, ()> = cache.get_or_try_insert("<% a %>", || Ok(spans(7)));
        assert_eq!(first.unwrap(), spans(7));

        let second: Result<_, ()> =
            cache.get_or_try_insert("<% a %>", || panic!("should be cached"));
        assert_eq!(second.unwrap(), spans(7));
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = FragmentCache::new();
        cache.begin();
        let failed = cache.get_or_try_insert("<% ( %>", || Err("boom"));
        assert_eq!(failed, Err("boom"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unused_entries_are_evicted() {
        let mut cache = FragmentCache::new();
        cache.begin();
        let _: Result<_, ()> = cache.get_or_try_insert("a", || Ok(spans(1)));
        let _: Result<_, ()> = cache.get_or_try_insert("b", || Ok(spans(1)));
        cache.finish();
        assert_eq!(cache.len(), 2);

        cache.begin();
        let _: Result<_, ()> = cache.get_or_try_insert("a", || Ok(spans(1)));
        cache.finish();
        assert_eq!(cache.len(), 1);
    }
}
