use super::ImageStore;
use crate::models::{ImagePayload, Slot};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MemoryImageStore {
    images: Arc<Mutex<HashMap<Slot, ImagePayload>>>,
    save_count: Arc<Mutex<usize>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, slot: Slot, image: ImagePayload) -> Self {
        self.images.lock().unwrap().insert(slot, image);
        self
    }

    pub fn get_save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }

    pub fn get_images(&self) -> HashMap<Slot, ImagePayload> {
        self.images.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn save(&self, slot: Slot, image: &ImagePayload) -> Result<()> {
        *self.save_count.lock().unwrap() += 1;
        self.images.lock().unwrap().insert(slot, image.clone());
        Ok(())
    }

    async fn load(&self, slot: Slot) -> Result<Option<ImagePayload>> {
        Ok(self.images.lock().unwrap().get(&slot).cloned())
    }

    async fn clear(&self) -> Result<()> {
        self.images.lock().unwrap().clear();
        Ok(())
    }
}
