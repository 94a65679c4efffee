//! AI service integration for the try-on steps
//!
//! Wraps Gemini's multimodal `generateContent` API: dressing a model in a
//! garment, compositing the result onto a background, and refining the final
//! image from free-text instructions.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiImageClient;
pub use mock::MockImageEditingClient;

use crate::models::{ImagePayload, ValidationOutcome};
use crate::Result;
use async_trait::async_trait;

/// The three generation steps plus the key pre-flight.
///
/// Every generation step resolves to base64 image text (always PNG) or an
/// error whose message can be shown to the user as is. The API key is passed
/// per call; implementations keep no credential of their own.
#[async_trait]
pub trait ImageEditingService: Send + Sync {
    async fn generate_look(
        &self,
        api_key: &str,
        model_image: &ImagePayload,
        clothing_image: &ImagePayload,
        instruction: &str,
    ) -> Result<String>;

    async fn create_scene(
        &self,
        api_key: &str,
        dressed_model_image: &ImagePayload,
        background_image: &ImagePayload,
        instruction: &str,
    ) -> Result<String>;

    async fn refine_image(
        &self,
        api_key: &str,
        base_image: &ImagePayload,
        instruction: &str,
    ) -> Result<String>;

    /// Never fails; a rejected key is a negative outcome with a message.
    async fn validate_api_key(&self, api_key: &str) -> ValidationOutcome;
}
