// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the hdrange library.
//!
//! Each layer has its own error type:
//! - [`DeriveError`] - Returned by every [`AddressSource`](crate::AddressSource) call
//! - [`TransportError`] - Failures of the background worker channel or of the worker itself
//! - [`CacheError`] - Rejected cache snapshots and serialization failures
//!
//! [`HdRangeError`] wraps all of them for callers that don't need to
//! distinguish between error sources.
//!
//! Decorators never wrap, retry, or swallow a [`DeriveError`]: whatever the
//! underlying strategy reports is what the caller sees.

mod cache;
mod derive;
mod transport;

pub use cache::CacheError;
pub use derive::DeriveError;
pub use transport::TransportError;

/// Unified error type for all hdrange operations.
///
/// All module-specific error types convert to `HdRangeError` via `From`,
/// so `?` works across derivation and cache persistence in one function.
///
/// # Examples
///
/// ```rust,ignore
/// use hdrange::{AddressDeriver, CacheRecord, HdRangeError};
///
/// async fn warm(deriver: &AddressDeriver, json: &str) -> Result<Vec<String>, HdRangeError> {
///     deriver.restore(CacheRecord::from_json(json)?).await?;
///     Ok(deriver.derive(0, 19).await?)
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum HdRangeError {
    /// Error from an address derivation call.
    #[error("Derivation error: {0}")]
    Derive(#[from] DeriveError),

    /// Error from the background worker transport.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error from cache snapshot handling.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restore_then_fail() -> Result<(), HdRangeError> {
        let failed: Result<(), CacheError> = Err(CacheError::InvalidKey {
            key: "x".to_string(),
        });
        failed?;
        Ok(())
    }

    #[test]
    fn test_module_errors_convert_to_unified_error() {
        assert!(matches!(
            restore_then_fail(),
            Err(HdRangeError::Cache(CacheError::InvalidKey { .. }))
        ));

        let err: HdRangeError = DeriveError::from(TransportError::Closed).into();
        assert_eq!(
            err.to_string(),
            "Derivation error: Worker transport error: Worker channel is closed"
        );
    }
}
