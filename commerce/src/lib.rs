#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Binary account codecs for the Solana commerce payments program.
//!
//! The commerce program stores four kinds of accounts. Three of them have a
//! fixed size; the fourth, [`MerchantOperatorConfig`], is a fixed 93-byte
//! header followed by two count-driven arrays: 101-byte policy entries and
//! 32-byte accepted-currency mint addresses. This crate encodes and decodes
//! all of them bit-exactly, so off-chain clients read the same bytes the
//! program writes.
//!
//! # Modules
//!
//! - [`layout`] - Declarative field-width tables and const offset arithmetic
//! - [`codec`] - Bounds-checked byte cursors and the [`SubRecord`] element trait
//! - [`address`] - The 32-byte [`Address`] identifier
//! - [`policy`] - Fee types and the 101-byte [`PolicyData`] sub-record
//! - [`discriminator`] - Leading tag bytes identifying each account kind
//! - [`config`] - The variable-length [`MerchantOperatorConfig`] account
//! - [`accounts`] - Fixed-size accounts and discriminator dispatch
//! - [`encoding`] - Base64 / base58 text forms of raw account data
//! - [`error`] - Codec and validation errors
//!
//! # Example
//!
//! ```rust
//! use commerce::{Address, FeeType, MerchantOperatorConfig, PolicyData, RefundPolicy};
//!
//! let config = MerchantOperatorConfig {
//!     version: 1,
//!     bump: 253,
//!     merchant: Address::new([1; 32]),
//!     operator: Address::new([2; 32]),
//!     operator_fee: 250,
//!     fee_type: FeeType::Bps,
//!     current_order_id: 100,
//!     days_to_close: 7,
//!     policies: vec![PolicyData::Refund(RefundPolicy {
//!         max_amount: 1_000,
//!         max_time_after_purchase: 3_600,
//!     })],
//!     accepted_currencies: vec![],
//!     ..MerchantOperatorConfig::default()
//! };
//!
//! let bytes = config.encode().unwrap();
//! assert_eq!(bytes.len(), 93 + 101);
//!
//! let (decoded, consumed) = MerchantOperatorConfig::decode(&bytes, 0).unwrap();
//! assert_eq!(decoded, config);
//! assert_eq!(consumed, bytes.len());
//! ```
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits `tracing` events from the decode paths

pub mod accounts;
pub mod address;
pub mod codec;
pub mod config;
pub mod discriminator;
pub mod encoding;
pub mod error;
pub mod layout;
pub mod policy;

pub use accounts::{FixedAccount, Merchant, Operator, Payment, PaymentStatus, ProgramAccount};
pub use address::Address;
pub use codec::SubRecord;
pub use config::{MerchantOperatorConfig, MerchantOperatorConfigHeader};
pub use discriminator::{AccountDiscriminator, Discriminator};
pub use encoding::{AccountBytes, AccountEncoding};
pub use error::{CodecError, TextEncodingError, ValidationError};
pub use policy::{
    ChargebackPolicy, FeeType, PolicyData, PolicyType, RefundPolicy, SettlementPolicy,
};
