//! Error handling and custom error types
//!
//! Provides unified error handling across the studio using thiserror.

use crate::ai::gemini::GenerationFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    /// Non-success HTTP status returned by the remote API.
    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("AI provider error: {0}")]
    AiProvider(String),

    /// The remote call itself failed before a response could be interpreted.
    #[error("Failed to communicate with the Gemini API: {0}")]
    Transport(String),

    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;
