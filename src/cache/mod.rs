// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Memoization of derived address ranges
//!
//! [`CachingSource`] remembers every range it has derived, keyed by the exact
//! `(first, last)` pair. Its contents can be exported as a [`CacheRecord`]
//! for external persistence and restored later.
//!
//! # Examples
//!
//! ```rust,ignore
//! use hdrange::{AddressSource, CacheRecord, CachingSource, LocalSource};
//!
//! let source = CachingSource::new(LocalSource::new(xpub, version));
//! source.derive(0, 19).await?;
//!
//! // Persist somewhere
//! let json = source.store().await.to_json()?;
//!
//! // ...and rehydrate a fresh instance later
//! let restored = CachingSource::new(LocalSource::new(xpub, version));
//! restored.restore(CacheRecord::from_json(&json)?).await?;
//! restored.derive(0, 19).await?; // no derivation work
//! ```

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::{CacheError, DeriveError};
use crate::range::{AddressRange, DerivedAddresses};
use crate::source::AddressSource;

mod record;

pub use record::CacheRecord;

/// Statistics about cache performance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of requests answered from the cache
    pub hits: u64,
    /// Number of requests delegated to the wrapped source
    pub misses: u64,
    /// Current number of cached ranges
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.entries,
            self.hit_rate()
        )
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<AddressRange, DerivedAddresses>,
    stats: CacheStats,
}

/// Decorator that memoizes completed ranges
///
/// - Lookups are by exact range; `0-9` is never answered from a cached `0-19`.
/// - Only successful results are stored. A failed range is delegated again
///   on the next request.
/// - Entries are never evicted.
///
/// # Concurrent requests
///
/// Two overlapping calls for the same uncached range both delegate to the
/// wrapped source and both store their result; the later write wins. Both
/// callers receive a correct result. In-flight requests are deliberately not
/// coalesced.
///
/// # Restore
///
/// [`restore`](Self::restore) replaces the whole cache and expects no
/// concurrent `derive` calls; a `derive` that completes during a restore may
/// re-add its entry afterwards.
#[derive(Debug)]
pub struct CachingSource<S> {
    inner: S,
    state: Mutex<CacheState>,
}

impl<S> CachingSource<S>
where
    S: AddressSource,
{
    /// Wrap `inner` with an empty cache
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// The wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Snapshot the cache contents for external persistence
    pub async fn store(&self) -> CacheRecord {
        let state = self.state.lock().await;
        CacheRecord::from_entries(&state.entries)
    }

    /// Replace the cache contents with a previously stored snapshot
    ///
    /// Every key must use the `"{first}-{last}"` encoding and hold one address
    /// per index. A record that violates either rule is rejected as a whole
    /// and the current contents are kept.
    pub async fn restore(&self, record: CacheRecord) -> Result<(), CacheError> {
        let entries = record.into_entries()?;

        let mut state = self.state.lock().await;
        info!(
            discarded = state.entries.len(),
            restored = entries.len(),
            "Restoring address cache"
        );
        state.entries = entries;
        state.stats.entries = state.entries.len();
        Ok(())
    }

    /// Returns current cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.state.lock().await.stats
    }

    /// Number of cached ranges
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Check if the cache holds no ranges
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }
}

#[async_trait]
impl<S> AddressSource for CachingSource<S>
where
    S: AddressSource,
{
    async fn derive(
        &self,
        first_index: u32,
        last_index: u32,
    ) -> Result<DerivedAddresses, DeriveError> {
        let range = AddressRange::new(first_index, last_index)?;

        {
            let mut state = self.state.lock().await;
            if let Some(addresses) = state.entries.get(&range).cloned() {
                state.stats.hits += 1;
                debug!(range = %range, "Cache hit");
                return Ok(addresses);
            }
            state.stats.misses += 1;
        }

        debug!(range = %range, source = self.inner.name(), "Cache miss, delegating");
        let addresses = self.inner.derive(first_index, last_index).await?;

        let mut state = self.state.lock().await;
        state.entries.insert(range, addresses.clone());
        state.stats.entries = state.entries.len();

        Ok(addresses)
    }

    fn name(&self) -> &'static str {
        "CachingSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and returns `"A{index}"` for every index
    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AddressSource for Counter {
        async fn derive(&self, first: u32, last: u32) -> Result<DerivedAddresses, DeriveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((first..=last).map(|i| format!("A{i}")).collect())
        }

        fn name(&self) -> &'static str {
            "Counter"
        }
    }

    #[tokio::test]
    async fn test_hit_skips_wrapped_source() {
        let cache = CachingSource::new(Counter::default());

        let first = cache.derive(2, 4).await.unwrap();
        let second = cache.derive(2, 4).await.unwrap();

        assert_eq!(first, vec!["A2", "A3", "A4"]);
        assert_eq!(first, second);
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lookup_is_exact_match_only() {
        let cache = CachingSource::new(Counter::default());

        cache.derive(0, 19).await.unwrap();
        cache.derive(0, 9).await.unwrap();

        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_stats() {
        let cache = CachingSource::new(Counter::default());

        cache.derive(0, 9).await.unwrap();
        cache.derive(0, 9).await.unwrap();
        cache.derive(10, 19).await.unwrap();

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.entries, 2);
        assert!(stats.to_string().contains("hit_rate=33.3%"));
    }

    #[tokio::test]
    async fn test_invalid_range_is_not_delegated() {
        let cache = CachingSource::new(Counter::default());

        assert!(cache.derive(5, 1).await.is_err());
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 0);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_rejected_restore_keeps_contents() {
        let cache = CachingSource::new(Counter::default());
        cache.derive(0, 1).await.unwrap();

        let mut record = CacheRecord::default();
        record.cache.insert("0-2".to_string(), vec!["A0".to_string()]);

        assert!(matches!(
            cache.restore(record).await,
            Err(CacheError::LengthMismatch { .. })
        ));
        assert_eq!(cache.len().await, 1);
    }
}
