use super::adjust::Adjustments;
use super::ImageService;
use crate::{Error, Result};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes finished images to disk as PNG, with adjustments baked in.
pub struct ImageExporter {
    output_dir: PathBuf,
}

impl ImageExporter {
    pub fn new(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    fn save_sync(image: DynamicImage, adjustments: Adjustments, path: PathBuf) -> Result<()> {
        let adjusted = adjustments.apply(&image);
        adjusted.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    async fn save(&self, image: DynamicImage, adjustments: Adjustments, path: &Path) -> Result<()> {
        tokio::task::spawn_blocking({
            let path = path.to_path_buf();
            move || Self::save_sync(image, adjustments, path)
        })
        .await
        .map_err(|e| Error::Invariant(format!("Image export task join error: {}", e)))?
    }
}

#[async_trait]
impl ImageService for ImageExporter {
    async fn export_image(
        &self,
        image_data: &[u8],
        adjustments: &Adjustments,
        base_name: &str,
    ) -> Result<PathBuf> {
        adjustments.validate()?;
        let img = image::load_from_memory(image_data)?;

        let filename = format!("{}_{}.png", base_name, Uuid::new_v4());
        let path = self.output_dir.join(filename);

        self.save(img, *adjustments, &path).await?;
        tracing::info!(
            "Exported {} with {}",
            path.display(),
            adjustments.css_filter()
        );

        Ok(path)
    }
}
