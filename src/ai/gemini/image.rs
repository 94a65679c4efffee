use super::client::GeminiHttpClient;
use super::interpret::interpret;
use super::request::build_request;
use super::types::GenerateContentResponse;
use super::validate;
use crate::ai::ImageEditingService;
use crate::models::{ImagePayload, ValidationOutcome};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Try-on steps backed by Gemini's image model.
pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(model: String) -> Self {
        Self::new_with_client(model, DEFAULT_TIMEOUT, reqwest::Client::new())
    }

    pub fn new_with_client(model: String, timeout: Duration, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(model, timeout, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    /// Build, send, interpret. Transport failures are normalised to
    /// [`Error::Transport`]; response-shape failures surface as
    /// [`Error::Generation`].
    async fn call_with_images(
        &self,
        step: &str,
        api_key: &str,
        images: &[&ImagePayload],
        instruction: &str,
    ) -> Result<String> {
        if instruction.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "An instruction is required to {}",
                step
            )));
        }

        let request = build_request(images, instruction);
        tracing::debug!(
            "Sending {} request to Gemini ({} images, model {})",
            step,
            images.len(),
            self.http.model()
        );

        let response: GenerateContentResponse = self
            .http
            .generate_content(api_key, &request)
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let image = interpret(&response).map_err(|failure| {
            tracing::error!("Gemini {} failed ({}): {}", step, failure.kind(), failure);
            failure
        })?;

        tracing::info!(
            "Gemini {} succeeded ({} base64 chars)",
            step,
            image.data.len()
        );
        Ok(image.data)
    }
}

#[async_trait]
impl ImageEditingService for GeminiImageClient {
    async fn generate_look(
        &self,
        api_key: &str,
        model_image: &ImagePayload,
        clothing_image: &ImagePayload,
        instruction: &str,
    ) -> Result<String> {
        self.call_with_images(
            "generate the look",
            api_key,
            &[model_image, clothing_image],
            instruction,
        )
        .await
    }

    async fn create_scene(
        &self,
        api_key: &str,
        dressed_model_image: &ImagePayload,
        background_image: &ImagePayload,
        instruction: &str,
    ) -> Result<String> {
        self.call_with_images(
            "create the scene",
            api_key,
            &[dressed_model_image, background_image],
            instruction,
        )
        .await
    }

    async fn refine_image(
        &self,
        api_key: &str,
        base_image: &ImagePayload,
        instruction: &str,
    ) -> Result<String> {
        self.call_with_images("refine the image", api_key, &[base_image], instruction)
            .await
    }

    async fn validate_api_key(&self, api_key: &str) -> ValidationOutcome {
        validate::validate_api_key(&self.http, api_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::ai::gemini::FailureKind;
    use wiremock::matchers::{body_partial_json, header};
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

    fn make_client(server: &MockServer) -> GeminiImageClient {
        GeminiImageClient::new(DEFAULT_MODEL.to_string()).with_base_url(server.uri())
    }

    fn image_response(data: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "inlineData": { "mimeType": "image/png", "data": data } }]
                },
                "finishReason": "STOP"
            }]
        }))
    }

    #[tokio::test]
    async fn test_generate_look_returns_inline_image() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(header("x-goog-api-key", "AIzaTestKey"))
            .respond_with(image_response("Zm9v"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        let model = ImagePayload::new("bW9kZWw=", "image/jpeg");
        let clothing = ImagePayload::new("Y2xvdGg=", "image/png");

        let result = client
            .generate_look("AIzaTestKey", &model, &clothing, "dress the model")
            .await
            .unwrap();
        assert_eq!(result, "Zm9v");
    }

    #[tokio::test]
    async fn test_create_scene_sends_model_then_background() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_partial_json(serde_json::json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "bG9vaw==" } },
                        { "inlineData": { "mimeType": "image/jpeg", "data": "YmFjaw==" } },
                        { "text": "place the model" }
                    ]
                }],
                "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
            })))
            .respond_with(image_response("c2NlbmU="))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);

        let result = client
            .create_scene(
                "AIzaTestKey",
                &ImagePayload::png("bG9vaw=="),
                &ImagePayload::new("YmFjaw==", "image/jpeg"),
                "place the model",
            )
            .await
            .unwrap();
        assert_eq!(result, "c2NlbmU=");
    }

    #[tokio::test]
    async fn test_refine_image_sends_single_image() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_partial_json(serde_json::json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "YmFzZQ==" } },
                        { "text": "close-up of the face" }
                    ]
                }]
            })))
            .respond_with(image_response("cmVmaW5lZA=="))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);

        let result = client
            .refine_image(
                "AIzaTestKey",
                &ImagePayload::png("YmFzZQ=="),
                "close-up of the face",
            )
            .await
            .unwrap();
        assert_eq!(result, "cmVmaW5lZA==");
    }

    #[tokio::test]
    async fn test_text_answer_surfaces_as_generation_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "I can't edit people." }] },
                    "finishReason": "STOP"
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);

        let err = client
            .refine_image("AIzaTestKey", &ImagePayload::png("YmFzZQ=="), "make it red")
            .await
            .unwrap_err();
        match err {
            Error::Generation(failure) => {
                assert_eq!(failure.kind(), FailureKind::UnexpectedTextResponse);
                assert!(failure.to_string().contains("I can't edit people."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blocked_prompt_surfaces_block_reason() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let image = ImagePayload::png("Zm9v");

        let err = client
            .generate_look("AIzaTestKey", &image, &image, "dress")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Reason: SAFETY"));
    }

    #[tokio::test]
    async fn test_api_error_is_normalised_to_transport_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let image = ImagePayload::png("Zm9v");

        let err = client
            .create_scene("AIzaTestKey", &image, &image, "compose")
            .await
            .unwrap_err();
        match err {
            Error::Transport(message) => assert!(message.contains("overloaded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_instruction_is_rejected_locally() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(image_response("Zm9v"))
            .expect(0)
            .mount(&server)
            .await;

        let client = make_client(&server);

        let err = client
            .refine_image("AIzaTestKey", &ImagePayload::png("Zm9v"), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
