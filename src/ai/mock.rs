use super::gemini::validate::has_valid_format;
use super::gemini::{GenerationFailure, ValidationFailure};
use super::ImageEditingService;
use crate::models::{ImagePayload, ValidationOutcome};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// One generation call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub step: &'static str,
    pub images: Vec<ImagePayload>,
    pub instruction: String,
}

#[derive(Clone)]
pub struct MockImageEditingClient {
    image_responses: Arc<Mutex<Vec<String>>>,
    failure: Arc<Mutex<Option<GenerationFailure>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockImageEditingClient {
    pub fn new() -> Self {
        Self {
            image_responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_image_response(self, response: String) -> Self {
        self.image_responses.lock().unwrap().push(response);
        self
    }

    /// Make every generation call fail with `failure`.
    pub fn with_failure(self, failure: GenerationFailure) -> Self {
        *self.failure.lock().unwrap() = Some(failure);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(
        &self,
        step: &'static str,
        images: &[&ImagePayload],
        instruction: &str,
    ) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.calls.lock().unwrap().push(RecordedCall {
            step,
            images: images.iter().map(|image| (*image).clone()).collect(),
            instruction: instruction.to_string(),
        });

        if let Some(failure) = self.failure.lock().unwrap().clone() {
            return Err(Error::Generation(failure));
        }

        let responses = self.image_responses.lock().unwrap();
        if responses.is_empty() {
            // 1x1 transparent PNG
            Ok("iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==".to_string())
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

impl Default for MockImageEditingClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageEditingService for MockImageEditingClient {
    async fn generate_look(
        &self,
        _api_key: &str,
        model_image: &ImagePayload,
        clothing_image: &ImagePayload,
        instruction: &str,
    ) -> Result<String> {
        self.respond("look", &[model_image, clothing_image], instruction)
    }

    async fn create_scene(
        &self,
        _api_key: &str,
        dressed_model_image: &ImagePayload,
        background_image: &ImagePayload,
        instruction: &str,
    ) -> Result<String> {
        self.respond(
            "scene",
            &[dressed_model_image, background_image],
            instruction,
        )
    }

    async fn refine_image(
        &self,
        _api_key: &str,
        base_image: &ImagePayload,
        instruction: &str,
    ) -> Result<String> {
        self.respond("refine", &[base_image], instruction)
    }

    async fn validate_api_key(&self, api_key: &str) -> ValidationOutcome {
        if has_valid_format(api_key.trim()) {
            ValidationOutcome::valid()
        } else {
            ValidationOutcome::invalid(ValidationFailure::InvalidFormat.to_string())
        }
    }
}
