// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Range-based HD address derivation with prefetching and caching.
//!
//! Addresses of an HD node's children are derived a range at a time through
//! the [`AddressSource`] trait. Two strategies implement it:
//!
//! - [`LocalSource`] derives on the calling task
//! - [`WorkerSource`] hands each range to a background worker
//!
//! Two decorators wrap any source without knowing what it is:
//!
//! - [`PrefetchingSource`] speculatively derives the next equal-size range
//! - [`CachingSource`] memoizes ranges and exports them as a [`CacheRecord`]
//!
//! [`AddressDeriver`] assembles the usual stack from a [`DerivationConfig`].

mod cache;
pub mod config;
mod deriver;
pub mod encoding;
mod errors;
mod node;
mod prefetch;
mod range;
mod source;
mod spans;
mod strategy;
pub mod worker;

pub use cache::{CacheRecord, CacheStats, CachingSource};
pub use config::{constants, DerivationConfig, DerivationConfigBuilder};
pub use deriver::AddressDeriver;
pub use encoding::AddressVersion;
pub use errors::{CacheError, DeriveError, HdRangeError, TransportError};
pub use node::NodeDescriptor;
pub use prefetch::{PrefetchStats, PrefetchingSource};
pub use range::{AddressRange, DerivedAddresses, HARDENED_OFFSET};
pub use source::AddressSource;
pub use strategy::{LocalSource, WorkerSource};
pub use worker::{
    ChannelTransport, DerivationWorker, WorkerRequest, WorkerResponse, WorkerTransport,
};
