use super::{Adjustments, ImageService};
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Records exports without decoding or writing anything.
#[derive(Clone)]
pub struct MockImageExporter {
    base_path: String,
    exports: Arc<Mutex<Vec<(Vec<u8>, Adjustments)>>>,
}

impl MockImageExporter {
    pub fn new() -> Self {
        Self {
            base_path: "/tmp/mock".to_string(),
            exports: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_base_path(mut self, path: String) -> Self {
        self.base_path = path;
        self
    }

    pub fn get_exports(&self) -> Vec<(Vec<u8>, Adjustments)> {
        self.exports.lock().unwrap().clone()
    }
}

impl Default for MockImageExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageService for MockImageExporter {
    async fn export_image(
        &self,
        image_data: &[u8],
        adjustments: &Adjustments,
        base_name: &str,
    ) -> Result<PathBuf> {
        adjustments.validate()?;
        self.exports
            .lock()
            .unwrap()
            .push((image_data.to_vec(), *adjustments));

        Ok(PathBuf::from(&self.base_path).join(format!("{}_{}.png", base_name, Uuid::new_v4())))
    }
}
