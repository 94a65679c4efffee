//! Application orchestration for the try-on workflow: key management, slot
//! images, the three generation steps, and export.

use crate::ai::mime::{decode_image_data, encode_image_file};
use crate::ai::{GeminiImageClient, ImageEditingService};
use crate::image::{Adjustments, ImageExporter, ImageService};
use crate::models::{Config, ImagePayload, Slot, ValidationOutcome};
use crate::prompts;
use crate::storage::{CredentialStore, FsImageStore, ImageStore};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Coordinates generation, persistence, and export for one session.
pub struct App {
    studio: Box<dyn ImageEditingService>,
    store: Box<dyn ImageStore>,
    exporter: Box<dyn ImageService>,
    credentials: CredentialStore,
    env_api_key: Option<String>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub studio: Box<dyn ImageEditingService>,
    pub store: Box<dyn ImageStore>,
    pub exporter: Box<dyn ImageService>,
    pub credentials: CredentialStore,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// `env_api_key` takes precedence over the stored key when set.
    pub fn with_services(services: AppServices, env_api_key: Option<String>) -> Self {
        Self {
            studio: services.studio,
            store: services.store,
            exporter: services.exporter,
            credentials: services.credentials,
            env_api_key,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;

        info!(
            "Image provider: Gemini (model: {}, timeout: {:?})",
            config.image_model, config.request_timeout
        );
        let studio = GeminiImageClient::new_with_client(
            config.image_model.clone(),
            config.request_timeout,
            reqwest::Client::new(),
        )
        .with_base_url(config.gemini_base_url.clone());

        Ok(Self::with_services(
            AppServices {
                studio: Box::new(studio),
                store: Box::new(FsImageStore::new(&config.data_dir.join("images"))),
                exporter: Box::new(ImageExporter::new(&config.output_dir)?),
                credentials: CredentialStore::new(&config.data_dir),
            },
            config.gemini_api_key,
        ))
    }

    async fn api_key(&self) -> Result<String> {
        if let Some(key) = &self.env_api_key {
            return Ok(key.clone());
        }
        self.credentials.load().await?.ok_or_else(|| {
            Error::InvalidInput(
                "Please configure your Gemini API key first (`key set <KEY>` or GEMINI_API_KEY)."
                    .to_string(),
            )
        })
    }

    /// Validate `api_key` and store it only if the API accepts it.
    pub async fn set_api_key(&self, api_key: &str) -> Result<ValidationOutcome> {
        let outcome = self.studio.validate_api_key(api_key).await;
        if outcome.valid {
            self.credentials.save(api_key).await?;
        }
        Ok(outcome)
    }

    pub async fn check_api_key(&self) -> Result<ValidationOutcome> {
        let api_key = self.api_key().await?;
        Ok(self.studio.validate_api_key(&api_key).await)
    }

    pub async fn clear_api_key(&self) -> Result<()> {
        self.credentials.clear().await
    }

    /// Encode the image at `path` and remember it in `slot`.
    pub async fn upload(&self, slot: Slot, path: &Path) -> Result<ImagePayload> {
        let payload = encode_image_file(path).await?;
        self.store.save(slot, &payload).await?;
        info!("Saved {} ({}) from {}", slot, payload.mime_type, path.display());
        Ok(payload)
    }

    /// Use `path` when given (and remember it), otherwise the stored slot.
    async fn resolve_slot(&self, slot: Slot, path: Option<&Path>) -> Result<ImagePayload> {
        if let Some(path) = path {
            return self.upload(slot, path).await;
        }
        self.store.load(slot).await?.ok_or_else(|| {
            Error::InvalidInput(format!(
                "No {} saved yet. Upload one or pass its path.",
                slot
            ))
        })
    }

    /// Step 1: dress the model in the garment. Returns base64 PNG text.
    pub async fn generate_look(
        &self,
        style_id: &str,
        model_path: Option<&Path>,
        clothing_path: Option<&Path>,
    ) -> Result<String> {
        let style = prompts::find_style(style_id)?;
        let api_key = self.api_key().await?;
        let model = self.resolve_slot(Slot::ModelImage, model_path).await?;
        let clothing = self.resolve_slot(Slot::ClothingImage, clothing_path).await?;

        info!("Generating look (style: {})", style.id);
        self.studio
            .generate_look(&api_key, &model, &clothing, style.look_instruction)
            .await
    }

    /// Step 2: composite the dressed model onto the background.
    pub async fn create_scene(
        &self,
        style_id: &str,
        look_path: &Path,
        background_path: Option<&Path>,
    ) -> Result<String> {
        let style = prompts::find_style(style_id)?;
        let api_key = self.api_key().await?;
        let look = encode_image_file(look_path).await?;
        let background = self
            .resolve_slot(Slot::BackgroundImage, background_path)
            .await?;

        info!("Creating scene (style: {})", style.id);
        self.studio
            .create_scene(&api_key, &look, &background, style.scene_instruction)
            .await
    }

    /// Step 3: refine a finished image from a free-text instruction.
    pub async fn refine(&self, image_path: &Path, instruction: &str) -> Result<String> {
        let api_key = self.api_key().await?;
        let base = encode_image_file(image_path).await?;

        info!("Refining {}", image_path.display());
        self.studio.refine_image(&api_key, &base, instruction).await
    }

    /// Decode a generation result and write it to `out` as-is (always PNG).
    pub async fn write_result(&self, image_data: &str, out: &Path) -> Result<()> {
        let bytes = decode_image_data(image_data)?;
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(out, &bytes).await?;
        info!("Wrote {} bytes to {}", bytes.len(), out.display());
        Ok(())
    }

    /// Bake adjustments into the image at `image_path` and export it.
    pub async fn export(&self, image_path: &Path, adjustments: &Adjustments) -> Result<PathBuf> {
        let bytes = tokio::fs::read(image_path).await?;
        let base_name = image_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("catalog");
        self.exporter
            .export_image(&bytes, adjustments, base_name)
            .await
    }

    /// Forget every saved slot image.
    pub async fn reset(&self) -> Result<()> {
        self.store.clear().await.map_err(|e| {
            warn!("Failed to clear saved images: {}", e);
            e
        })?;
        info!("Cleared saved images");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockImageEditingClient;
    use crate::image::MockImageExporter;
    use crate::storage::MemoryImageStore;
    use tempfile::TempDir;

    fn make_app(dir: &TempDir, store: MemoryImageStore, env_key: Option<&str>) -> App {
        App::with_services(
            AppServices {
                studio: Box::new(MockImageEditingClient::new()),
                store: Box::new(store),
                exporter: Box::new(MockImageExporter::new()),
                credentials: CredentialStore::new(dir.path()),
            },
            env_key.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_generation_requires_api_key() {
        let dir = TempDir::new().unwrap();
        let app = make_app(&dir, MemoryImageStore::new(), None);

        let err = app.generate_look("realistic", None, None).await.unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn test_missing_slot_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = MemoryImageStore::new().with_image(Slot::ModelImage, ImagePayload::png("YQ=="));
        let app = make_app(&dir, store, Some("AIzaEnvKey"));

        let err = app.generate_look("realistic", None, None).await.unwrap_err();
        assert!(err.to_string().contains("clothingImage"));
    }

    #[tokio::test]
    async fn test_unknown_style_is_rejected() {
        let dir = TempDir::new().unwrap();
        let app = make_app(&dir, MemoryImageStore::new(), Some("AIzaEnvKey"));

        let err = app.generate_look("gothic", None, None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_set_api_key_only_stores_valid_keys() {
        let dir = TempDir::new().unwrap();
        let app = make_app(&dir, MemoryImageStore::new(), None);

        let rejected = app.set_api_key("sk-not-gemini").await.unwrap();
        assert!(!rejected.valid);
        assert!(app.check_api_key().await.is_err());

        let accepted = app.set_api_key("AIzaGoodKey").await.unwrap();
        assert!(accepted.valid);
        assert!(app.check_api_key().await.unwrap().valid);

        app.clear_api_key().await.unwrap();
        assert!(app.check_api_key().await.is_err());
    }

    #[tokio::test]
    async fn test_write_result_decodes_base64() {
        let dir = TempDir::new().unwrap();
        let app = make_app(&dir, MemoryImageStore::new(), None);
        let out = dir.path().join("results").join("look.png");

        app.write_result("iVBORw==", &out).await.unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
    }
}
