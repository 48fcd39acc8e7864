//! Persistent storage for the session token pair
//!
//! The pair is kept as a single JSON blob under a fixed name. Readers never see
//! a partially written blob: the file store writes a sibling temp file and
//! renames it into place.

use super::types::{get_sdk_data_dir, AuthError, AuthResult, TokenPair, TOKENS_KEY};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Storage backend for the token pair
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the stored pair; `None` when absent or unusable
    async fn load(&self) -> AuthResult<Option<TokenPair>>;

    /// Replace the stored pair wholesale
    async fn save(&self, tokens: &TokenPair) -> AuthResult<()>;

    /// Remove the stored pair; succeeds when nothing is stored
    async fn clear(&self) -> AuthResult<()>;
}

/// Token store backed by one JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the blob named `key` inside `data_dir`
    pub fn new(data_dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// Store under the platform data directory with the default key
    pub fn default_location() -> AuthResult<Self> {
        Ok(Self::new(get_sdk_data_dir()?, TOKENS_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> AuthResult<Option<TokenPair>> {
        let blob = match tokio::fs::read_to_string(&self.path).await {
            Ok(blob) => blob,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No token file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(AuthError::IoError(e)),
        };

        let tokens = TokenPair::from_blob(&blob);
        if tokens.is_none() {
            warn!(
                "Ignoring unusable token blob at {}",
                self.path.display()
            );
        }
        Ok(tokens)
    }

    async fn save(&self, tokens: &TokenPair) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let blob = tokens.to_blob()?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, blob).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&temp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            AuthError::StorageError(format!(
                "Failed to move tokens into {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("Stored tokens at {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> AuthResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Removed token file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::IoError(e)),
        }
    }
}

/// Process-local token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a stored pair
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> AuthResult<Option<TokenPair>> {
        Ok(self
            .tokens
            .read()
            .await
            .clone()
            .filter(TokenPair::is_usable))
    }

    async fn save(&self, tokens: &TokenPair) -> AuthResult<()> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> AuthResult<()> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested"), TOKENS_KEY);

        assert!(store.load().await.unwrap().is_none());

        let tokens = TokenPair::new("access-1", "refresh-1");
        store.save(&tokens).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(tokens));
        assert!(!store.temp_path().exists());

        let replacement = TokenPair::new("access-2", "refresh-2");
        store.save(&replacement).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn test_file_store_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path(), TOKENS_KEY);

        store.clear().await.unwrap();

        store.save(&TokenPair::new("a", "r")).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_file_store_ignores_corrupt_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path(), TOKENS_KEY);
        tokio::fs::write(store.path(), "{\"accessToken\": 42")
            .await
            .unwrap();

        assert!(store.load().await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_store_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path(), TOKENS_KEY);
        store.save(&TokenPair::new("a", "r")).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryTokenStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.save(&TokenPair::new("a", "r")).await.unwrap();
        assert_eq!(
            store.load().await.unwrap(),
            Some(TokenPair::new("a", "r"))
        );

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_hides_partial_pair() {
        let store = MemoryTokenStore::with_tokens(TokenPair::new("a", ""));
        assert!(store.load().await.unwrap().is_none());
    }
}
