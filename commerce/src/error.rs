//! Error types for the commerce account codecs.
//!
//! [`CodecError`] covers everything that can go wrong turning bytes into
//! accounts and back. [`ValidationError`] is returned by the read helpers
//! that mirror the on-chain program's account checks.

use crate::address::Address;

/// Errors raised while encoding or decoding account data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The buffer ends before a fixed-width read completes.
    #[error("Truncated buffer: need {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        /// Offset at which the read was attempted.
        offset: usize,
        /// Number of bytes the read requires.
        needed: usize,
        /// Number of bytes left in the buffer at `offset`.
        available: usize,
    },
    /// A policy entry carries a tag outside the known variants.
    #[error("Unknown policy type: {0}")]
    UnknownPolicyType(u8),
    /// The fee type byte is neither basis points nor fixed.
    #[error("Unknown fee type: {0}")]
    UnknownFeeType(u8),
    /// A payment account carries an unknown status byte.
    #[error("Unknown payment status: {0}")]
    UnknownPaymentStatus(u8),
    /// The leading byte does not identify any commerce account.
    #[error("Unknown account discriminator: {0}")]
    UnknownDiscriminator(u8),
    /// The leading byte identifies a different account kind.
    #[error("Discriminator mismatch: expected {expected}, found {found}")]
    DiscriminatorMismatch {
        /// Discriminator of the account kind being decoded.
        expected: u8,
        /// Discriminator found in the data.
        found: u8,
    },
    /// An array region holds more entries than its `u32` count can express.
    #[error("Too many entries in {region}: {len} exceeds u32::MAX")]
    CountOverflow {
        /// Name of the array region.
        region: &'static str,
        /// Actual number of entries.
        len: usize,
    },
    /// Account data given as text could not be decoded.
    #[error("{0}")]
    Text(#[from] TextEncodingError),
}

impl CodecError {
    /// Builds a [`CodecError::Truncated`] for a read of `needed` bytes at
    /// `offset` in a buffer of `len` bytes.
    #[must_use]
    pub const fn truncated(offset: usize, needed: usize, len: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            available: len.saturating_sub(offset),
        }
    }

    /// Returns `true` if this error reports a short buffer.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// Errors decoding the text form of raw account data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextEncodingError {
    /// Input is not valid base64.
    #[error("Invalid base64 account data: {0}")]
    Base64(#[from] base64::DecodeError),
    /// Input is not valid base58.
    #[error("Invalid base58 account data: {0}")]
    Base58(String),
}

impl From<bs58::decode::Error> for TextEncodingError {
    fn from(e: bs58::decode::Error) -> Self {
        Self::Base58(e.to_string())
    }
}

/// Account checks that mirror the on-chain program's validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The config belongs to a different operator.
    #[error("Operator mismatch: expected {expected}, found {found}")]
    OperatorMismatch {
        /// Operator the caller expected.
        expected: Address,
        /// Operator recorded in the config.
        found: Address,
    },
    /// The config belongs to a different merchant.
    #[error("Merchant mismatch: expected {expected}, found {found}")]
    MerchantMismatch {
        /// Merchant the caller expected.
        expected: Address,
        /// Merchant recorded in the config.
        found: Address,
    },
    /// The account is owned by someone else.
    #[error("Owner mismatch: expected {expected}, found {found}")]
    OwnerMismatch {
        /// Owner the caller expected.
        expected: Address,
        /// Owner recorded in the account.
        found: Address,
    },
    /// The order id equals the config's current order id.
    #[error("Order id {0} already used")]
    OrderIdInvalid(u32),
    /// The payment is not in the required status.
    #[error("Invalid payment status: {0}")]
    InvalidPaymentStatus(&'static str),
    /// The payment's close window has not elapsed yet.
    #[error("Payment close window not reached")]
    PaymentCloseWindowNotReached,
    /// Time arithmetic overflowed.
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}
