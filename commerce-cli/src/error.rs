//! Error types for the inspector.

use commerce::{CodecError, TextEncodingError};

/// Errors that can occur while running an inspector command.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// Account data could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Input text is not valid in the selected encoding.
    #[error("{0}")]
    Text(#[from] TextEncodingError),

    /// Reading input or the config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input or output failed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The config file is not valid TOML.
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A config value could not be applied.
    #[error("config error: {0}")]
    Config(String),

    /// No account data was given.
    #[error("no input: pass account data as an argument, with --input, or on stdin")]
    EmptyInput,
}
