//! Virtual try-on studio backed by Gemini's multimodal image API
//!
//! Dresses a model photo in a garment, places the result in a background
//! scene, and refines the final image from free-text instructions. Slot
//! images and the API key are kept on disk between runs.

pub mod ai;
pub mod app;
pub mod error;
pub mod image;
pub mod models;
pub mod prompts;
pub mod storage;

pub use error::{Error, Result};
