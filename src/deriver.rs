// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Ready-made derivation stack
//!
//! [`AddressDeriver`] assembles the usual composition from a
//! [`DerivationConfig`]:
//!
//! ```text
//! CachingSource
//!   └─ PrefetchingSource   (when config.prefetch)
//!        └─ LocalSource | WorkerSource
//! ```

use std::fmt;

use async_trait::async_trait;
use bip32::XPub;
use tracing::info;

use crate::cache::{CacheRecord, CacheStats, CachingSource};
use crate::config::DerivationConfig;
use crate::errors::{CacheError, DeriveError};
use crate::prefetch::PrefetchingSource;
use crate::range::DerivedAddresses;
use crate::source::AddressSource;
use crate::strategy::{LocalSource, WorkerSource};
use crate::worker::{DerivationWorker, WorkerTransport};

/// Cached, optionally prefetching, address derivation for one HD node
///
/// # Examples
///
/// ```rust,ignore
/// use hdrange::{AddressDeriver, DerivationConfig};
///
/// let config = DerivationConfig::default();
/// let (deriver, _worker) = AddressDeriver::spawn_worker(&xpub, &config);
///
/// let page = deriver.derive(0, 19).await?;
/// let snapshot = deriver.store().await;
/// ```
pub struct AddressDeriver {
    config: DerivationConfig,
    source: CachingSource<Box<dyn AddressSource>>,
}

impl AddressDeriver {
    /// Build a stack that derives on the calling task
    pub fn local(node: XPub, config: &DerivationConfig) -> Self {
        Self::assemble(LocalSource::new(node, config.version), config)
    }

    /// Build a stack that delegates derivation to the worker behind `transport`
    pub fn with_worker<T>(node: &XPub, transport: T, config: &DerivationConfig) -> Self
    where
        T: WorkerTransport + 'static,
    {
        Self::assemble(WorkerSource::new(node, config.version, transport), config)
    }

    /// Spawn a [`DerivationWorker`] and build a stack that delegates to it
    ///
    /// The worker stops once the returned deriver and any prefetch it still
    /// has in flight are gone.
    pub fn spawn_worker(node: &XPub, config: &DerivationConfig) -> (Self, DerivationWorker) {
        let (worker, transport) = DerivationWorker::spawn(config.worker_queue_depth);
        (Self::with_worker(node, transport, config), worker)
    }

    fn assemble<S>(strategy: S, config: &DerivationConfig) -> Self
    where
        S: AddressSource + 'static,
    {
        info!(
            strategy = strategy.name(),
            version = %config.version,
            prefetch = config.prefetch,
            "Assembling address derivation stack"
        );

        let inner: Box<dyn AddressSource> = if config.prefetch {
            Box::new(PrefetchingSource::new(strategy))
        } else {
            Box::new(strategy)
        };

        Self {
            config: config.clone(),
            source: CachingSource::new(inner),
        }
    }

    /// The configuration this stack was built from
    pub fn config(&self) -> &DerivationConfig {
        &self.config
    }

    /// Snapshot the cache for external persistence
    pub async fn store(&self) -> CacheRecord {
        self.source.store().await
    }

    /// Replace the cache with a previously stored snapshot
    pub async fn restore(&self, record: CacheRecord) -> Result<(), CacheError> {
        self.source.restore(record).await
    }

    /// Returns current cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.source.stats().await
    }
}

impl fmt::Debug for AddressDeriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressDeriver")
            .field("config", &self.config)
            .field("source", &self.source.inner().name())
            .finish()
    }
}

#[async_trait]
impl AddressSource for AddressDeriver {
    async fn derive(
        &self,
        first_index: u32,
        last_index: u32,
    ) -> Result<DerivedAddresses, DeriveError> {
        self.source.derive(first_index, last_index).await
    }

    fn name(&self) -> &'static str {
        "AddressDeriver"
    }
}
