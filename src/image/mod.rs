//! Post-hoc adjustments and export
//!
//! Applies brightness/contrast/saturation to a finished image and writes it
//! out as PNG.

pub mod adjust;
pub mod mock;
pub mod processor;

pub use adjust::Adjustments;
pub use mock::MockImageExporter;
pub use processor::ImageExporter;

use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait ImageService: Send + Sync {
    async fn export_image(
        &self,
        image_data: &[u8],
        adjustments: &Adjustments,
        base_name: &str,
    ) -> Result<PathBuf>;
}
