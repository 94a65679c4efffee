//! Local persistence for user-supplied images and the API key
//!
//! Images are kept per [`Slot`] so a session can pick up where the last one
//! left off. Saving a slot overwrites it; loading an empty slot yields `None`.

pub mod credentials;
pub mod fs;
pub mod mock;

pub use credentials::CredentialStore;
pub use fs::FsImageStore;
pub use mock::MemoryImageStore;

use crate::models::{ImagePayload, Slot};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn save(&self, slot: Slot, image: &ImagePayload) -> Result<()>;
    async fn load(&self, slot: Slot) -> Result<Option<ImagePayload>>;
    async fn clear(&self) -> Result<()>;
}
