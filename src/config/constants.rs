// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known address versions
//!
//! This module centralizes the version prefixes of common transparent
//! address schemes.

/// Well-known P2PKH address versions
pub mod versions {
    use crate::encoding::AddressVersion;

    /// Bitcoin mainnet P2PKH (addresses start with `1`)
    pub const BITCOIN_P2PKH: AddressVersion = AddressVersion::new(0x00);

    /// Bitcoin testnet/regtest P2PKH (addresses start with `m` or `n`)
    pub const BITCOIN_TESTNET_P2PKH: AddressVersion = AddressVersion::new(0x6f);

    /// Litecoin mainnet P2PKH (addresses start with `L`)
    pub const LITECOIN_P2PKH: AddressVersion = AddressVersion::new(0x30);

    /// Dogecoin mainnet P2PKH (addresses start with `D`)
    pub const DOGECOIN_P2PKH: AddressVersion = AddressVersion::new(0x1e);

    /// Zcash mainnet transparent P2PKH (addresses start with `t1`)
    pub const ZCASH_T_ADDR: AddressVersion = AddressVersion::new(0x1cb8);
}
