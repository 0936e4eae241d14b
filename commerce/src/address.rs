//! The 32-byte account identifier.
//!
//! [`Address`] wraps a [`Pubkey`] and is the type used for every identifier
//! field in the commerce accounts: merchant and operator keys, owners,
//! settlement wallets and accepted-currency mints. The codecs never
//! interpret an address; they copy its 32 bytes verbatim.
//!
//! # Serialization
//!
//! Serialized as its base58 string, the canonical textual form of a Solana
//! public key:
//!
//! ```json
//! "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"
//! ```

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use solana_pubkey::Pubkey;

use crate::codec::SubRecord;
use crate::error::CodecError;
use crate::layout::ADDRESS_WIDTH;

/// A Solana address (32 bytes, base58 in text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub Pubkey);

impl Address {
    /// Creates an address from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_WIDTH]) -> Self {
        Self(Pubkey::new_from_array(bytes))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ADDRESS_WIDTH] {
        self.0.to_bytes()
    }

    /// Returns the wrapped public key.
    #[must_use]
    pub const fn pubkey(&self) -> &Pubkey {
        &self.0
    }
}

impl From<Pubkey> for Address {
    fn from(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }
}

impl From<Address> for Pubkey {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl From<[u8; ADDRESS_WIDTH]> for Address {
    fn from(bytes: [u8; ADDRESS_WIDTH]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error parsing an [`Address`] from its base58 form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid address: {0}")]
pub struct AddressParseError(pub String);

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pubkey::from_str(s)
            .map(Self)
            .map_err(|e| AddressParseError(format!("{s}: {e}")))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl SubRecord for Address {
    const SIZE: usize = ADDRESS_WIDTH;

    fn write_to(&self, out: &mut [u8]) -> Result<(), CodecError> {
        out.copy_from_slice(self.as_ref());
        Ok(())
    }

    fn read_from(bytes: &[u8]) -> Result<Self, CodecError> {
        let bytes: [u8; ADDRESS_WIDTH] = bytes
            .try_into()
            .map_err(|_| CodecError::truncated(0, ADDRESS_WIDTH, bytes.len()))?;
        Ok(Self::new(bytes))
    }
}
