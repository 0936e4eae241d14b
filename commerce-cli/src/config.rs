//! Inspector configuration.
//!
//! Loads configuration from a TOML file with support for environment variable
//! expansion in string values. Variables use `$VAR` or `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! encoding = "base58"
//! pretty = true
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to configuration file (default: `commerce.toml`)
//! - `COMMERCE_ENCODING` - Override the account data encoding

use std::path::Path;

use commerce::AccountEncoding;
use serde::{Deserialize, Serialize};

use crate::error::InspectError;

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = "commerce.toml";

/// Top-level inspector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectConfig {
    /// Text encoding of account data read and written (default: `base64`).
    #[serde(default)]
    pub encoding: AccountEncoding,

    /// Pretty-print JSON output (default: `true`).
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

const fn default_pretty() -> bool {
    true
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            encoding: AccountEncoding::default(),
            pretty: default_pretty(),
        }
    }
}

impl InspectConfig {
    /// Loads configuration from the path given by the `CONFIG` environment
    /// variable, falling back to `commerce.toml` in the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an override
    /// is invalid.
    pub fn load() -> Result<Self, InspectError> {
        let path = std::env::var("CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
        Self::load_from(&path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the defaults. `$VAR` / `${VAR}` references are
    /// expanded from the process environment and `COMMERCE_ENCODING`
    /// overrides the file value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an override
    /// is invalid.
    pub fn load_from(path: &str) -> Result<Self, InspectError> {
        let content = if Path::new(path).exists() {
            std::fs::read_to_string(path)?
        } else {
            tracing::debug!(path, "Config file not found, using defaults");
            String::new()
        };
        Self::parse_with(&content, |name| std::env::var(name).ok())
    }

    /// Parses TOML `content`, resolving variables through `lookup`.
    fn parse_with<F>(content: &str, lookup: F) -> Result<Self, InspectError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expanded = expand_vars(content, &lookup);
        let mut config: Self = toml::from_str(&expanded)?;

        if let Some(encoding) = lookup("COMMERCE_ENCODING") {
            config.encoding = encoding
                .parse()
                .map_err(|e| InspectError::Config(format!("COMMERCE_ENCODING: {e}")))?;
        }

        Ok(config)
    }
}

/// Expands `$VAR` and `${VAR}` patterns in a string through `lookup`.
///
/// Unresolved variables are left as-is.
fn expand_vars<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        match lookup(&var_name) {
            Some(val) if !var_name.is_empty() => result.push_str(&val),
            _ => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&var_name);
                if braced {
                    result.push('}');
                }
            }
        }
    }

    result
}
