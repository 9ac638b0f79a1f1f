//! Error types for Spor.

use thiserror::Error;

/// Library-level error type for Spor operations.
#[derive(Error, Debug)]
pub enum SporError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported file extension: {0}. Supported: .vtt, .webvtt")]
    UnsupportedExtension(String),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),

    #[error("Error parsing VTT block {block}: {message}")]
    Parse { block: usize, message: String },

    #[error("Failed to load VTT file {path}: {message}")]
    Load { path: String, message: String },

    #[error("File too large: {size} bytes. Maximum size: {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Vector store rejected payload as too large: {0}")]
    PayloadTooLarge(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Spor operations.
pub type Result<T> = std::result::Result<T, SporError>;
