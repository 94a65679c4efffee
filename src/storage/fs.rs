use super::ImageStore;
use crate::models::{ImagePayload, Slot, StoredImage};
use crate::{Error, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One `<slot>.json` file per slot under `dir`.
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn slot_path(&self, slot: Slot) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn save(&self, slot: Slot, image: &ImagePayload) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let record = StoredImage::new(slot, image);
        let json = serde_json::to_vec_pretty(&record)?;
        let path = self.slot_path(slot);

        // Write-then-rename keeps the replace atomic.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!("Saved {} to {}", slot, path.display());
        Ok(())
    }

    async fn load(&self, slot: Slot) -> Result<Option<ImagePayload>> {
        let path = self.slot_path(slot);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: StoredImage = serde_json::from_slice(&bytes).map_err(|e| {
            Error::Storage(format!("Could not read saved {}: {}", slot, e))
        })?;
        if record.id != slot {
            return Err(Error::Storage(format!(
                "{} holds a record for {}",
                path.display(),
                record.id
            )));
        }

        Ok(Some(record.payload()))
    }

    async fn clear(&self) -> Result<()> {
        for slot in Slot::ALL {
            match tokio::fs::remove_file(self.slot_path(slot)).await {
                Ok(()) => tracing::debug!("Cleared {}", slot),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
