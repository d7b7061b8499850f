// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Derivation strategies
//!
//! Two interchangeable ways of computing a range of addresses, both
//! implementing [`AddressSource`](crate::AddressSource):
//!
//! - [`LocalSource`]: computes inline on the calling task
//! - [`WorkerSource`]: hands each range to a background worker over a
//!   [`WorkerTransport`](crate::worker::WorkerTransport)
//!
//! Both produce identical output for the same node and version.

mod local;
mod worker;

pub use local::LocalSource;
pub use worker::WorkerSource;
