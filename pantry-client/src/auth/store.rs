use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredTokens {
    access: Option<String>,
    refresh: Option<String>,
}

impl StoredTokens {
    fn get(&self, kind: TokenKind) -> Option<String> {
        match kind {
            TokenKind::Access => self.access.clone(),
            TokenKind::Refresh => self.refresh.clone(),
        }
    }

    fn set(&mut self, kind: TokenKind, token: String) {
        match kind {
            TokenKind::Access => self.access = Some(token),
            TokenKind::Refresh => self.refresh = Some(token),
        }
    }
}

/// Persistence for the access/refresh token pair. No validation happens here;
/// expiry evaluation belongs to [`crate::auth::jwt`].
///
/// `clear` removes both tokens in one step — callers never observe one token
/// without the other's fate decided.
pub trait TokenStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Option<String>;
    fn set(&self, kind: TokenKind, token: String);
    fn set_pair(&self, access: String, refresh: String);
    fn clear(&self);
}

/// In-memory store. Default for tests and embedders that persist elsewhere.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.tokens.read().unwrap().get(kind)
    }

    fn set(&self, kind: TokenKind, token: String) {
        self.tokens.write().unwrap().set(kind, token);
    }

    fn set_pair(&self, access: String, refresh: String) {
        let mut tokens = self.tokens.write().unwrap();
        tokens.access = Some(access);
        tokens.refresh = Some(refresh);
    }

    fn clear(&self) {
        *self.tokens.write().unwrap() = StoredTokens::default();
    }
}

/// Durable store backed by a JSON file, the SDK analogue of per-origin
/// browser storage: survives process restarts, cleared only explicitly.
///
/// Mutations rewrite the whole file via a temp file and rename. I/O failures
/// are logged and the in-memory view stays authoritative for the process
/// lifetime.
pub struct FileTokenStore {
    path: PathBuf,
    cache: RwLock<StoredTokens>,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        let cache = Self::load(&path).unwrap_or_default();
        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    fn load(path: &PathBuf) -> Option<StoredTokens> {
        let data = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "token file unreadable, starting empty");
                None
            }
        }
    }

    fn persist(&self, tokens: &StoredTokens) {
        let result = serde_json::to_string(tokens)
            .map_err(anyhow::Error::new)
            .and_then(|data| {
                let tmp = self.path.with_extension("tmp");
                std::fs::write(&tmp, data)?;
                std::fs::rename(&tmp, &self.path)?;
                Ok(())
            });

        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist tokens");
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.cache.read().unwrap().get(kind)
    }

    fn set(&self, kind: TokenKind, token: String) {
        let mut cache = self.cache.write().unwrap();
        cache.set(kind, token);
        self.persist(&cache);
    }

    fn set_pair(&self, access: String, refresh: String) {
        let mut cache = self.cache.write().unwrap();
        cache.access = Some(access);
        cache.refresh = Some(refresh);
        self.persist(&cache);
    }

    fn clear(&self) {
        let mut cache = self.cache.write().unwrap();
        *cache = StoredTokens::default();
        self.persist(&cache);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(TokenKind::Access), None);

        store.set_pair("A".to_string(), "R".to_string());
        assert_eq!(store.get(TokenKind::Access).as_deref(), Some("A"));
        assert_eq!(store.get(TokenKind::Refresh).as_deref(), Some("R"));

        store.set(TokenKind::Access, "A2".to_string());
        assert_eq!(store.get(TokenKind::Access).as_deref(), Some("A2"));
        assert_eq!(store.get(TokenKind::Refresh).as_deref(), Some("R"));
    }

    #[test]
    fn test_clear_removes_both() {
        let store = MemoryTokenStore::new();
        store.set_pair("A".to_string(), "R".to_string());
        store.clear();
        assert_eq!(store.get(TokenKind::Access), None);
        assert_eq!(store.get(TokenKind::Refresh), None);
    }

    #[test]
    fn test_file_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::new(path.clone());
        store.set_pair("A".to_string(), "R".to_string());
        drop(store);

        let reloaded = FileTokenStore::new(path);
        assert_eq!(reloaded.get(TokenKind::Access).as_deref(), Some("A"));
        assert_eq!(reloaded.get(TokenKind::Refresh).as_deref(), Some("R"));
    }

    #[test]
    fn test_file_store_clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::new(path.clone());
        store.set_pair("A".to_string(), "R".to_string());
        store.clear();
        drop(store);

        let reloaded = FileTokenStore::new(path);
        assert_eq!(reloaded.get(TokenKind::Access), None);
        assert_eq!(reloaded.get(TokenKind::Refresh), None);
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(path);
        assert_eq!(store.get(TokenKind::Access), None);
    }
}
