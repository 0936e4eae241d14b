//! Command-line inspector for commerce program accounts.
//!
//! Decodes raw account data fetched from an RPC node into JSON, encodes a
//! JSON [`MerchantOperatorConfig`](commerce::MerchantOperatorConfig) back
//! into account data, and reports account sizes and byte layouts.
//!
//! # Modules
//!
//! - [`commands`] - Subcommand implementations
//! - [`config`] - Inspector configuration with environment variable expansion
//! - [`error`] - Inspector error types

pub mod commands;
pub mod config;
pub mod error;

pub use config::InspectConfig;
pub use error::InspectError;
