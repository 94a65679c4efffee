use super::types::ModelInfo;
use crate::models::DEFAULT_GEMINI_BASE_URL;
use crate::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Lightweight Gemini REST client.
///
/// Holds no credential: every call takes the API key explicitly, so one client
/// (and its connection pool) can serve whichever key the caller currently has.
#[derive(Clone)]
pub struct GeminiHttpClient {
    client: Client,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-2.5-flash-image-preview`),
    /// a `models/...`-prefixed value is accepted and stripped.
    pub fn new(model: String, timeout: Duration) -> Self {
        Self::new_with_client(model, timeout, Client::new())
    }

    pub fn new_with_client(model: String, timeout: Duration, client: Client) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            model,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send<Resp: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        api_key: &str,
    ) -> Result<Resp> {
        let response = request
            .timeout(self.timeout)
            .header("x-goog-api-key", api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }

    /// Calls Gemini's `generateContent` endpoint.
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        api_key: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request);
        self.send(builder, api_key).await
    }

    /// Fetches the configured model's metadata. This is the cheapest
    /// authenticated call the API offers, so it doubles as a key probe.
    pub async fn get_model(&self, api_key: &str) -> Result<ModelInfo> {
        let url = format!("{}/v1beta/models/{}", self.base_url, self.model);
        self.send(self.client.get(&url), api_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_model_sends_key_header_and_strips_prefix() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1beta/models/gemini-2.5-flash-image-preview"))
            .and(header("x-goog-api-key", "AIzaTestKey"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "models/gemini-2.5-flash-image-preview",
                "displayName": "Nano Banana"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiHttpClient::new(
            "models/gemini-2.5-flash-image-preview".to_string(),
            Duration::from_secs(5),
        )
        .with_base_url(server.uri());

        let info = client.get_model("AIzaTestKey").await.unwrap();
        assert_eq!(info.display_name.as_deref(), Some("Nano Banana"));
        assert_eq!(client.model(), "gemini-2.5-flash-image-preview");
    }

    #[tokio::test]
    async fn test_non_success_status_maps_to_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = GeminiHttpClient::new("m".to_string(), Duration::from_secs(5))
            .with_base_url(server.uri());

        let err = client
            .generate_content::<_, serde_json::Value>("key", &serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_maps_to_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = GeminiHttpClient::new("m".to_string(), Duration::from_secs(5))
            .with_base_url(server.uri());

        let err = client
            .generate_content::<_, serde_json::Value>("key", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
