// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Inclusive ranges of child indices.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::errors::DeriveError;

/// First hardened child index; non-hardened derivation only reaches indices below it.
pub const HARDENED_OFFSET: u32 = 1 << 31;

/// Ordered list of addresses for a range, one per index in ascending order.
pub type DerivedAddresses = Vec<String>;

/// A range of child indices with first and last inclusive
///
/// Ranges compare by exact bounds only. `0-9` and `0-10` are unrelated keys
/// even though one contains the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressRange {
    first: u32,
    last: u32,
}

impl AddressRange {
    /// Create a validated range
    ///
    /// Fails when `first > last` or when `last` is a hardened index.
    pub fn new(first: u32, last: u32) -> Result<Self, DeriveError> {
        if first > last {
            return Err(DeriveError::invalid_range(
                first,
                last,
                "first index is greater than last index",
            ));
        }
        if last >= HARDENED_OFFSET {
            return Err(DeriveError::invalid_range(
                first,
                last,
                "range reaches into hardened indices",
            ));
        }
        Ok(Self { first, last })
    }

    /// First index (inclusive)
    pub const fn first(&self) -> u32 {
        self.first
    }

    /// Last index (inclusive)
    pub const fn last(&self) -> u32 {
        self.last
    }

    /// Number of indices in this range
    pub const fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    /// Ranges always hold at least one index
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the indices of this range in ascending order
    pub fn indices(&self) -> RangeInclusive<u32> {
        self.first..=self.last
    }

    /// The contiguous range of equal size that immediately follows this one
    ///
    /// Returns `None` when the successor would reach into hardened indices.
    pub fn next(&self) -> Option<Self> {
        let first = self.last.checked_add(1)?;
        let last = first.checked_add(self.last - self.first)?;
        Self::new(first, last).ok()
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

/// Parses the `"{first}-{last}"` cache key encoding
impl FromStr for AddressRange {
    type Err = DeriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            // u32::from_str accepts a leading '+' and leading zeros; keys are canonical
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            if part.len() > 1 && part.starts_with('0') {
                return None;
            }
            part.parse::<u32>().ok()
        };

        let (first, last) = s
            .split_once('-')
            .and_then(|(first, last)| Some((parse(first)?, parse(last)?)))
            .ok_or_else(|| DeriveError::InvalidRange {
                first: 0,
                last: 0,
                reason: format!("'{s}' is not of the form first-last"),
            })?;

        Self::new(first, last)
    }
}

impl TryFrom<(u32, u32)> for AddressRange {
    type Error = DeriveError;

    fn try_from((first, last): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(first, last)
    }
}

impl From<AddressRange> for (u32, u32) {
    fn from(range: AddressRange) -> Self {
        (range.first, range.last)
    }
}
