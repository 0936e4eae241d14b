//! Text forms of raw account data.
//!
//! RPC nodes hand out account data as base64 (the `base64` account
//! encoding) or base58 (`base58`, and the legacy `binary` form).
//! [`AccountBytes`] converts between those strings and the raw bytes the
//! codecs consume.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use serde::{Deserialize, Serialize};

use crate::error::TextEncodingError;

/// Text encoding of raw account data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountEncoding {
    /// Standard padded base64.
    #[default]
    Base64,
    /// Bitcoin-alphabet base58.
    Base58,
}

impl AccountEncoding {
    /// Returns the lowercase name used in RPC requests and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Base58 => "base58",
        }
    }
}

impl Display for AccountEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an [`AccountEncoding`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown account encoding: {0} (expected base64 or base58)")]
pub struct UnknownEncodingError(pub String);

impl FromStr for AccountEncoding {
    type Err = UnknownEncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(Self::Base64),
            "base58" | "binary" => Ok(Self::Base58),
            _ => Err(UnknownEncodingError(s.to_owned())),
        }
    }
}

/// Raw account data decoded from its text form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountBytes(pub Vec<u8>);

impl AccountBytes {
    /// Decodes `text` in the given encoding. Surrounding whitespace is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not valid in `encoding`.
    pub fn decode(text: &str, encoding: AccountEncoding) -> Result<Self, TextEncodingError> {
        let text = text.trim();
        let bytes = match encoding {
            AccountEncoding::Base64 => b64.decode(text)?,
            AccountEncoding::Base58 => bs58::decode(text).into_vec()?,
        };
        Ok(Self(bytes))
    }

    /// Encodes raw bytes into their text form.
    pub fn encode<T: AsRef<[u8]>>(input: T, encoding: AccountEncoding) -> String {
        match encoding {
            AccountEncoding::Base64 => b64.encode(input.as_ref()),
            AccountEncoding::Base58 => bs58::encode(input.as_ref()).into_string(),
        }
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for AccountBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for AccountBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}
