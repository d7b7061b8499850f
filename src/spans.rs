// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for hdrange operations.
//!
//! Telemetry is kept apart from business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a span helper here.
//!
//! Usage pattern:
//! ```rust,ignore
//! async fn derive(&self, first: u32, last: u32) -> Result<DerivedAddresses, DeriveError> {
//!     let span = spans::derive_range(self.name(), first, last);
//!     async move { /* business logic */ }.instrument(span).await
//! }
//! ```

use tracing::Span;

/// Create span for a strategy computing a range.
///
/// Parent: the caller's span (decorators do not open spans of their own)
/// Children: none
#[inline]
pub(crate) fn derive_range(source: &'static str, first: u32, last: u32) -> Span {
    tracing::debug_span!("hdrange.derive_range", source, first, last)
}

/// Create span for the worker handling one request.
///
/// Parent: None (runs on the worker task)
/// Children: none
#[inline]
pub(crate) fn worker_request(first: u32, last: u32, version: u32) -> Span {
    tracing::debug_span!("hdrange.worker_request", first, last, version)
}

/// Create span for a speculative prefetch task.
///
/// Parent: None (detached task)
/// Children: derive_range span of the wrapped strategy
#[inline]
pub(crate) fn prefetch(first: u32, last: u32) -> Span {
    tracing::trace_span!("hdrange.prefetch", first, last)
}
