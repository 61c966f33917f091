use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use super::store::{TokenStore, TOKEN_KEY};

/// In-memory key/value store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up any key, not just the token
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenStore for MemoryTokenStore {
    fn set_token(&self, token: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        Ok(())
    }

    fn token(&self) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        Ok(entries.get(TOKEN_KEY).cloned())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        entries.remove(TOKEN_KEY);
        Ok(())
    }
}
