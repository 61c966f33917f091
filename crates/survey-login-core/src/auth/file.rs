use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::store::{TokenStore, TOKEN_KEY};

/// On-disk record for the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    pub stored_at: DateTime<Utc>,
}

/// Token persisted as `<dir>/token.json`.
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", TOKEN_KEY))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the full record, including when it was written
    pub fn load(&self) -> Result<Option<StoredToken>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let stored: StoredToken =
            serde_json::from_str(&contents).context("Failed to parse token file")?;
        Ok(Some(stored))
    }
}

impl TokenStore for FileTokenStore {
    fn set_token(&self, token: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let stored = StoredToken {
            token: token.to_string(),
            stored_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        let path = self.path();
        std::fs::write(&path, contents).context("Failed to write token file")?;
        debug!(path = %path.display(), "Token written");
        Ok(())
    }

    fn token(&self) -> Result<Option<String>> {
        Ok(self.load()?.map(|s| s.token))
    }

    fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "survey-login-{}-{}-{}",
            name,
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_is_no_token() {
        let store = FileTokenStore::new(scratch_dir("missing"));
        assert!(store.token().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_write_overwrite_clear() {
        let dir = scratch_dir("cycle");
        let store = FileTokenStore::new(&dir);

        store.set_token("abc123").unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("abc123"));
        assert!(store.path().ends_with("token.json"));

        store.set_token("def456").unwrap();
        let stored = store.load().unwrap().expect("record present");
        assert_eq!(stored.token, "def456");
        assert!(stored.stored_at <= Utc::now());

        store.clear().unwrap();
        assert!(store.token().unwrap().is_none());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = scratch_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let store = FileTokenStore::new(&dir);
        std::fs::write(store.path(), "not json").unwrap();
        assert!(store.token().is_err());
        let _ = std::fs::remove_dir_all(dir);
    }
}
