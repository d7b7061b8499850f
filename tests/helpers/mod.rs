// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for hdrange integration tests
//!
//! Provides an [`AddressSource`] double that records every delegated range,
//! so decorator behavior can be observed without any key derivation.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use hdrange::{AddressSource, DeriveError, DerivedAddresses, TransportError};

/// Recording AddressSource for testing decorators
///
/// Produces `"A{index}"` for every index, records each requested range, and
/// can be told to fail for chosen ranges or to take a while to answer.
///
/// # Example
///
/// ```rust,ignore
/// let source = RecordingSource::new()
///     .failing_on(0, 9)
///     .with_delay(Duration::from_millis(20));
/// ```
#[derive(Default)]
pub struct RecordingSource {
    calls: Mutex<Vec<(u32, u32)>>,
    failing: HashSet<(u32, u32)>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl RecordingSource {
    /// Create a source that succeeds for every range
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request for exactly `first..=last`
    pub fn failing_on(mut self, first: u32, last: u32) -> Self {
        self.failing.insert((first, last));
        self
    }

    /// Sleep before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every range requested so far, in call order
    pub fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().clone()
    }

    /// Total number of requests
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of requests for exactly `first..=last`
    pub fn calls_for(&self, first: u32, last: u32) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == (first, last))
            .count()
    }

    /// Wait until at least `count` requests were made, for speculative calls
    /// running on spawned tasks
    pub async fn wait_for_calls(&self, count: usize) {
        for _ in 0..200 {
            if self.call_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "expected at least {count} calls, saw {:?}",
            self.calls()
        );
    }
}

#[async_trait]
impl AddressSource for RecordingSource {
    async fn derive(
        &self,
        first_index: u32,
        last_index: u32,
    ) -> Result<DerivedAddresses, DeriveError> {
        self.calls.lock().unwrap().push((first_index, last_index));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&(first_index, last_index)) {
            return Err(TransportError::remote(format!(
                "refusing {first_index}-{last_index}"
            ))
            .into());
        }

        Ok(expected_addresses(first_index, last_index))
    }

    fn name(&self) -> &'static str {
        "RecordingSource"
    }
}

/// The addresses a [`RecordingSource`] returns for a range
#[allow(dead_code)]
pub fn expected_addresses(first: u32, last: u32) -> DerivedAddresses {
    (first..=last).map(|i| format!("A{i}")).collect()
}

/// Check that an error is the one a [`RecordingSource`] reports for a range
#[allow(dead_code)]
pub fn is_refusal(err: &DeriveError, first: u32, last: u32) -> bool {
    matches!(
        err,
        DeriveError::Transport(TransportError::Remote { message })
            if *message == format!("refusing {first}-{last}")
    )
}

/// Route test logs through tracing-subscriber (honors RUST_LOG)
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
