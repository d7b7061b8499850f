// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for address derivation stacks
//!
//! Controls the address encoding version, whether speculative prefetching is
//! layered under the cache, and how many requests may queue for a background
//! worker.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use hdrange::DerivationConfig;
//!
//! // Bitcoin mainnet P2PKH, prefetching on
//! let config = DerivationConfig::default();
//! assert!(config.prefetch);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use hdrange::{constants::versions, DerivationConfigBuilder};
//!
//! let config = DerivationConfigBuilder::with_defaults()
//!     .version(versions::BITCOIN_TESTNET_P2PKH)
//!     .prefetch(false)
//!     .build();
//! assert_eq!(config.version, versions::BITCOIN_TESTNET_P2PKH);
//! ```
//!
//! # Example: Loading from JSON
//!
//! ```rust
//! use hdrange::DerivationConfig;
//!
//! let config: DerivationConfig = serde_json::from_str(r#"{ "version": 48 }"#).unwrap();
//! assert_eq!(config.version.as_u32(), 48);
//! assert_eq!(config.worker_queue_depth, 32); // Default
//! ```

use serde::Deserialize;

use crate::encoding::AddressVersion;

pub mod constants;

/// Default number of requests that may wait for a background worker
pub const DEFAULT_WORKER_QUEUE_DEPTH: usize = 32;

/// Configuration for an [`AddressDeriver`](crate::AddressDeriver)
///
/// Use [`DerivationConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DerivationConfig {
    /// Address encoding version
    /// Default: Bitcoin mainnet P2PKH (`0x00`)
    pub version: AddressVersion,

    /// Layer a [`PrefetchingSource`](crate::PrefetchingSource) under the cache
    /// Default: true (sequential paging is the common access pattern)
    pub prefetch: bool,

    /// Capacity of the request queue of a spawned worker
    /// Default: 32
    pub worker_queue_depth: usize,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            version: constants::versions::BITCOIN_P2PKH,
            prefetch: true,
            worker_queue_depth: DEFAULT_WORKER_QUEUE_DEPTH,
        }
    }
}

impl DerivationConfig {
    /// Create config for a specific address version with all other defaults
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdrange::{constants::versions, DerivationConfig};
    ///
    /// let config = DerivationConfig::for_version(versions::LITECOIN_P2PKH);
    /// assert!(config.prefetch);
    /// ```
    pub fn for_version(version: AddressVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }
}

/// Builder for [`DerivationConfig`]
///
/// # Example
///
/// ```rust
/// use hdrange::{AddressVersion, DerivationConfigBuilder};
///
/// let config = DerivationConfigBuilder::new()
///     .version(AddressVersion::new(0x1cb8))
///     .worker_queue_depth(8)
///     .build();
/// assert_eq!(config.worker_queue_depth, 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DerivationConfigBuilder {
    config: DerivationConfig,
}

impl DerivationConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with defaults
    ///
    /// Same as [`new`](Self::new); kept for symmetry with [`DerivationConfig::default`].
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Set the address encoding version
    pub fn version(mut self, version: AddressVersion) -> Self {
        self.config.version = version;
        self
    }

    /// Enable or disable speculative prefetching
    pub fn prefetch(mut self, enabled: bool) -> Self {
        self.config.prefetch = enabled;
        self
    }

    /// Set the worker request queue capacity
    ///
    /// A depth of zero is raised to one, the smallest queue a channel supports.
    pub fn worker_queue_depth(mut self, depth: usize) -> Self {
        self.config.worker_queue_depth = depth.max(1);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> DerivationConfig {
        self.config
    }
}
