use crate::{Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Plain-file holder for the Gemini API key. It only stores and returns the
/// key; checking it is [`crate::ai::ImageEditingService::validate_api_key`]'s job.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("api_key"),
        }
    }

    pub async fn load(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let key = raw.trim();
                Ok((!key.is_empty()).then(|| key.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stores the trimmed key; a blank key is refused.
    pub async fn save(&self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::InvalidInput(
                "Please enter a valid API key.".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, api_key).await?;
        restrict_permissions(&self.path).await?;

        tracing::info!("Saved API key to {}", self.path.display());
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_trims_and_loads_key() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(&dir.path().join("nested"));

        assert_eq!(store.load().await.unwrap(), None);

        store.save("  AIzaSecret \n").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("AIzaSecret"));
    }

    #[tokio::test]
    async fn test_blank_key_is_refused() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());

        let err = store.save("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_forgets_key() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());

        store.save("AIzaSecret").await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.load().await.unwrap(), None);
    }
}
