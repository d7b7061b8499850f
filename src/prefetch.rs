// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Speculative prefetching of the next address range
//!
//! Wallet UIs page through addresses sequentially: `0-19`, then `20-39`, and
//! so on. [`PrefetchingSource`] starts deriving the following page as soon as
//! the current one is requested, so that a sequential caller finds the next
//! page already computed (or at least in flight).

use std::fmt;
use std::sync::Arc;
use std::task::Poll;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace, Instrument};

use crate::errors::DeriveError;
use crate::range::{AddressRange, DerivedAddresses};
use crate::source::AddressSource;
use crate::spans;

/// Statistics about prefetch effectiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefetchStats {
    /// Requests served from the speculative computation
    pub hits: u64,
    /// Requests that had to be delegated to the wrapped source
    pub misses: u64,
    /// Speculative computations started
    pub scheduled: u64,
}

impl PrefetchStats {
    /// Percentage of requests served from the prefetch (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for PrefetchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, scheduled={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.scheduled,
            self.hit_rate()
        )
    }
}

/// The single outstanding speculative computation
#[derive(Debug)]
struct PendingPrefetch {
    range: AddressRange,
    /// Dropping the handle detaches the task; it still runs to completion
    handle: JoinHandle<Result<DerivedAddresses, DeriveError>>,
}

#[derive(Debug, Default)]
struct PrefetchState {
    pending: Option<PendingPrefetch>,
    stats: PrefetchStats,
}

/// Decorator that speculatively derives the next contiguous range
///
/// On every `derive(first, last)` call:
///
/// 1. If the pending prefetch covers exactly `first..=last`, its result is
///    adopted; otherwise the wrapped source is called for the request.
/// 2. The pending prefetch is discarded either way.
/// 3. A prefetch of the equal-size range starting at `last + 1` is spawned
///    and stored, whether or not the current request ends up succeeding.
///
/// Only exact matches are reused. A discarded prefetch is not cancelled; its
/// result is simply never observed. A failed prefetch is only surfaced to a
/// later request for exactly its range.
///
/// The requested call is always issued to the wrapped source before the
/// prefetch of the following range is spawned.
///
/// # Panics
///
/// Prefetch tasks are spawned with [`tokio::spawn`], so `derive` panics when
/// polled outside a tokio runtime.
///
/// # Ordering
///
/// The decorator is built for one sequential caller. Overlapping calls are
/// memory-safe but race for the single prefetch slot, so at most one of them
/// can benefit from it.
///
/// # Examples
///
/// ```rust,ignore
/// use hdrange::{AddressSource, LocalSource, PrefetchingSource};
///
/// let source = PrefetchingSource::new(LocalSource::new(xpub, version));
/// let page_one = source.derive(0, 19).await?;   // starts deriving 20-39
/// let page_two = source.derive(20, 39).await?;  // adopts that computation
/// ```
pub struct PrefetchingSource<S> {
    inner: Arc<S>,
    state: Mutex<PrefetchState>,
}

impl<S> PrefetchingSource<S>
where
    S: AddressSource + 'static,
{
    /// Wrap `inner` with speculative prefetching
    pub fn new(inner: S) -> Self {
        Self::from_arc(Arc::new(inner))
    }

    /// Wrap a source that is shared with other owners
    pub fn from_arc(inner: Arc<S>) -> Self {
        Self {
            inner,
            state: Mutex::new(PrefetchState::default()),
        }
    }

    /// The wrapped source
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }

    /// The range of the currently stored prefetch, if any
    pub async fn pending_range(&self) -> Option<AddressRange> {
        self.state.lock().await.pending.as_ref().map(|p| p.range)
    }

    /// Returns current prefetch statistics
    pub async fn stats(&self) -> PrefetchStats {
        self.state.lock().await.stats
    }

    fn spawn_prefetch(&self, range: AddressRange) -> PendingPrefetch {
        let inner = Arc::clone(&self.inner);
        let span = spans::prefetch(range.first(), range.last());

        let handle = tokio::spawn(
            async move {
                let result = inner.derive(range.first(), range.last()).await;
                if let Err(e) = &result {
                    trace!(range = %range, error = %e, "Speculative derivation failed");
                }
                result
            }
            .instrument(span),
        );

        PendingPrefetch { range, handle }
    }
}

impl<S> fmt::Debug for PrefetchingSource<S>
where
    S: AddressSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefetchingSource")
            .field("inner", &self.inner.name())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<S> AddressSource for PrefetchingSource<S>
where
    S: AddressSource + 'static,
{
    async fn derive(
        &self,
        first_index: u32,
        last_index: u32,
    ) -> Result<DerivedAddresses, DeriveError> {
        let requested = AddressRange::new(first_index, last_index)?;

        let mut state = self.state.lock().await;

        let mut call: BoxFuture<'_, Result<DerivedAddresses, DeriveError>> =
            match state.pending.take() {
                Some(pending) if pending.range == requested => {
                    debug!(range = %requested, "Prefetch hit");
                    state.stats.hits += 1;
                    pending
                        .handle
                        .map(|joined| joined.unwrap_or_else(|e| Err(DeriveError::task(e))))
                        .boxed()
                }
                Some(pending) => {
                    debug!(
                        range = %requested,
                        discarded = %pending.range,
                        "Prefetch miss, discarding speculative range"
                    );
                    state.stats.misses += 1;
                    self.inner.derive(first_index, last_index)
                }
                None => {
                    state.stats.misses += 1;
                    self.inner.derive(first_index, last_index)
                }
            };

        // The requested call must reach the wrapped source before the prefetch
        // does, so a serial source never queues the caller behind it
        let early = futures::poll!(&mut call);

        // Scheduled before awaiting the current result so a failure there
        // never suppresses the next prefetch
        if let Some(next) = requested.next() {
            trace!(range = %next, "Scheduling prefetch");
            state.pending = Some(self.spawn_prefetch(next));
            state.stats.scheduled += 1;
        }
        drop(state);

        match early {
            Poll::Ready(result) => result,
            Poll::Pending => call.await,
        }
    }

    fn name(&self) -> &'static str {
        "PrefetchingSource"
    }
}
