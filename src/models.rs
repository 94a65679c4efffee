//! Data models and structures
//!
//! Defines the image payloads exchanged with the Gemini API, the persisted
//! slot records, validation outcomes, and runtime configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Base64 image text plus its media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

impl ImagePayload {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Generated images are always handed back as PNG.
    pub fn png(data: impl Into<String>) -> Self {
        Self::new(data, "image/png")
    }
}

/// The fixed set of user-image keys persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    ModelImage,
    ClothingImage,
    BackgroundImage,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::ModelImage, Slot::ClothingImage, Slot::BackgroundImage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::ModelImage => "modelImage",
            Slot::ClothingImage => "clothingImage",
            Slot::BackgroundImage => "backgroundImage",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "model" | "modelImage" => Ok(Slot::ModelImage),
            "clothing" | "clothingImage" => Ok(Slot::ClothingImage),
            "background" | "backgroundImage" => Ok(Slot::BackgroundImage),
            other => Err(format!(
                "Unknown slot '{}'. Expected one of: model, clothing, background",
                other
            )),
        }
    }
}

/// On-disk record for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub id: Slot,
    pub data: String,
    pub mime_type: String,
    pub saved_at: DateTime<Utc>,
}

impl StoredImage {
    pub fn new(id: Slot, payload: &ImagePayload) -> Self {
        Self {
            id,
            data: payload.data.clone(),
            mime_type: payload.mime_type.clone(),
            saved_at: Utc::now(),
        }
    }

    pub fn payload(&self) -> ImagePayload {
        ImagePayload::new(self.data.clone(), self.mime_type.clone())
    }
}

/// Result of a credential pre-flight check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub image_model: String,
    pub gemini_base_url: String,
    pub request_timeout: Duration,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A missing `.env` is fine; a malformed one is a configuration error.
fn check_dotenv<T>(result: std::result::Result<T, dotenvy::Error>) -> crate::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        check_dotenv(dotenvy::dotenv())?;

        let request_timeout = match std::env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.trim().parse().map_err(|_| {
                crate::Error::Config(format!(
                    "GEMINI_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            image_model: std::env::var("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            request_timeout,
            data_dir: std::env::var("STUDIO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".tryon-studio")),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
        })
    }
}
